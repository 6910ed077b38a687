//! Ride classification storage.

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::batch::{BatchError, ClassifiedRide, ResultSink};
use crate::metrics::analytics::Interval;
use crate::storage::database::DatabaseError;
use crate::storage::ftp_store::parse_timestamp;
use crate::storage::schema::TIMESTAMP_FORMAT;

/// A classification row as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredClassification {
    pub activity_date: NaiveDateTime,
    pub ride_type: String,
    pub duration_minutes: f64,
    pub average_power: f64,
    pub variability: f64,
    pub intervals_detected: usize,
    pub intervals: Vec<Interval>,
    pub ftp: f64,
    pub classified_at: NaiveDateTime,
}

/// Intermediate row before JSON and date decoding.
struct ClassificationRow {
    activity_date: String,
    ride_type: String,
    duration_minutes: f64,
    average_power: f64,
    variability: f64,
    intervals_detected: i64,
    intervals_json: String,
    ftp: f64,
    classified_at: String,
}

impl ClassificationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            activity_date: row.get(0)?,
            ride_type: row.get(1)?,
            duration_minutes: row.get(2)?,
            average_power: row.get(3)?,
            variability: row.get(4)?,
            intervals_detected: row.get(5)?,
            intervals_json: row.get(6)?,
            ftp: row.get(7)?,
            classified_at: row.get(8)?,
        })
    }

    fn decode(self) -> Result<StoredClassification, DatabaseError> {
        let intervals = serde_json::from_str(&self.intervals_json)
            .map_err(|e| DatabaseError::DeserializationError(e.to_string()))?;

        Ok(StoredClassification {
            activity_date: parse_timestamp(&self.activity_date)?,
            ride_type: self.ride_type,
            duration_minutes: self.duration_minutes,
            average_power: self.average_power,
            variability: self.variability,
            intervals_detected: self.intervals_detected.max(0) as usize,
            intervals,
            ftp: self.ftp,
            classified_at: parse_timestamp(&self.classified_at)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT activity_date, ride_type, duration_minutes, average_power,
     variability, intervals_detected, intervals_json, ftp, classified_at
     FROM ride_classifications";

/// Classification store keyed by ride start time.
pub struct ClassificationStore<'a> {
    conn: &'a Connection,
}

impl<'a> ClassificationStore<'a> {
    /// Create a new classification store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Save or replace the classification of a ride.
    pub fn save(&self, ride: &ClassifiedRide) -> Result<(), DatabaseError> {
        let intervals_json = serde_json::to_string(&ride.result.intervals)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();

        self.conn
            .execute(
                r#"
                INSERT INTO ride_classifications (activity_date, ride_type, duration_minutes,
                    average_power, variability, intervals_detected, intervals_json, ftp, classified_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(activity_date) DO UPDATE SET
                    ride_type = excluded.ride_type,
                    duration_minutes = excluded.duration_minutes,
                    average_power = excluded.average_power,
                    variability = excluded.variability,
                    intervals_detected = excluded.intervals_detected,
                    intervals_json = excluded.intervals_json,
                    ftp = excluded.ftp,
                    classified_at = excluded.classified_at
                "#,
                params![
                    ride.started_at.format(TIMESTAMP_FORMAT).to_string(),
                    ride.result.ride_type.label(),
                    ride.result.duration_minutes,
                    ride.result.average_power,
                    ride.result.variability,
                    ride.result.intervals_detected() as i64,
                    intervals_json,
                    ride.ftp,
                    now,
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Get the classification of the ride started at `activity_date`.
    pub fn get(
        &self,
        activity_date: NaiveDateTime,
    ) -> Result<Option<StoredClassification>, DatabaseError> {
        let sql = format!("{} WHERE activity_date = ?1", SELECT_COLUMNS);
        let row = self
            .conn
            .query_row(
                &sql,
                params![activity_date.format(TIMESTAMP_FORMAT).to_string()],
                ClassificationRow::from_row,
            )
            .optional()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        row.map(ClassificationRow::decode).transpose()
    }

    /// List all classifications, oldest ride first.
    pub fn list(&self) -> Result<Vec<StoredClassification>, DatabaseError> {
        let sql = format!("{} ORDER BY activity_date", SELECT_COLUMNS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], ClassificationRow::from_row)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(
                row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
                    .decode()?,
            );
        }

        Ok(results)
    }

    /// Number of stored classifications.
    pub fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ride_classifications", [], |row| {
                row.get(0)
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count.max(0) as usize)
    }

    /// Number of stored rides per ride type label.
    pub fn count_by_type(&self) -> Result<BTreeMap<String, usize>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ride_type, COUNT(*) FROM ride_classifications GROUP BY ride_type")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (ride_type, count) = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            counts.insert(ride_type, count.max(0) as usize);
        }

        Ok(counts)
    }
}

impl ResultSink for ClassificationStore<'_> {
    fn record(&mut self, ride: &ClassifiedRide) -> Result<(), BatchError> {
        self.save(ride)?;
        Ok(())
    }
}
