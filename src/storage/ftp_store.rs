//! FTP history storage.
//!
//! Holds one FTP value per athlete activity, as produced by
//! [`FtpProgression`](crate::metrics::analytics::FtpProgression). Ride
//! classification looks up the most recent value at or before the ride date.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::batch::{BatchError, ThresholdPowerProvider};
use crate::metrics::analytics::FtpRecord;
use crate::storage::database::DatabaseError;
use crate::storage::schema::TIMESTAMP_FORMAT;

/// FTP history store.
pub struct FtpHistoryStore<'a> {
    conn: &'a Connection,
    athlete_id: Option<String>,
}

impl<'a> FtpHistoryStore<'a> {
    /// Create a store that looks up FTP across all athletes.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            athlete_id: None,
        }
    }

    /// Restrict lookups to one athlete.
    pub fn for_athlete(conn: &'a Connection, athlete_id: impl Into<String>) -> Self {
        Self {
            conn,
            athlete_id: Some(athlete_id.into()),
        }
    }

    /// Save or replace FTP records for an athlete.
    pub fn save_records(
        &self,
        athlete_id: &str,
        records: &[FtpRecord],
    ) -> Result<usize, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                INSERT INTO ftp_history (athlete_id, activity_date, power_20m, ftp)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(athlete_id, activity_date) DO UPDATE SET
                    power_20m = excluded.power_20m,
                    ftp = excluded.ftp
                "#,
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        for record in records {
            stmt.execute(params![
                athlete_id,
                record.activity_date.format(TIMESTAMP_FORMAT).to_string(),
                record.power_20m,
                record.ftp,
            ])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        }

        tracing::info!(
            "Saved {} FTP records for athlete {}",
            records.len(),
            athlete_id
        );

        Ok(records.len())
    }

    /// Load the FTP history of an athlete, oldest first.
    pub fn load_history(&self, athlete_id: &str) -> Result<Vec<FtpRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT activity_date, power_20m, ftp FROM ftp_history
                 WHERE athlete_id = ?1 ORDER BY activity_date",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![athlete_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (date, power_20m, ftp) = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            records.push(FtpRecord {
                activity_date: parse_timestamp(&date)?,
                power_20m,
                ftp,
            });
        }

        Ok(records)
    }

    /// FTP of the most recent activity at or before `date`.
    ///
    /// A non-positive value there means no usable FTP, never an older one.
    pub fn latest_ftp_at(&self, date: NaiveDateTime) -> Result<Option<f64>, DatabaseError> {
        let date = date.format(TIMESTAMP_FORMAT).to_string();

        let result: rusqlite::Result<Option<f64>> = match &self.athlete_id {
            Some(athlete_id) => self
                .conn
                .query_row(
                    "SELECT ftp FROM ftp_history
                     WHERE activity_date <= ?1 AND athlete_id = ?2
                     ORDER BY activity_date DESC LIMIT 1",
                    params![date, athlete_id],
                    |row| row.get(0),
                )
                .optional(),
            None => self
                .conn
                .query_row(
                    "SELECT ftp FROM ftp_history
                     WHERE activity_date <= ?1
                     ORDER BY activity_date DESC LIMIT 1",
                    params![date],
                    |row| row.get(0),
                )
                .optional(),
        };

        result
            .map(|ftp| ftp.filter(|ftp| *ftp > 0.0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }
}

impl ThresholdPowerProvider for FtpHistoryStore<'_> {
    fn ftp_at(&self, date: NaiveDateTime) -> Result<Option<f64>, BatchError> {
        Ok(self.latest_ftp_at(date)?)
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| DatabaseError::DeserializationError(format!("{}: {}", value, e)))
}
