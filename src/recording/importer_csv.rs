//! CSV import of recorded rides.
//!
//! Expects a header row naming the columns. `secs` and `power` are required;
//! `km`, `hr`, `cad` and `alt` are optional and may have empty cells. Column
//! order is free and unknown columns are ignored.

use crate::recording::types::{ImportError, PowerSample, RideSeries};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const TIME_COLUMN: &str = "secs";
const POWER_COLUMN: &str = "power";
const DISTANCE_COLUMN: &str = "km";
const HEART_RATE_COLUMN: &str = "hr";
const CADENCE_COLUMN: &str = "cad";
const ALTITUDE_COLUMN: &str = "alt";

/// Positions of the known columns in the header.
#[derive(Debug)]
struct ColumnMap {
    time: usize,
    power: usize,
    distance: Option<usize>,
    heart_rate: Option<usize>,
    cadence: Option<usize>,
    altitude: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| header.iter().position(|n| n.eq_ignore_ascii_case(name));
        let require =
            |name: &str| find(name).ok_or_else(|| ImportError::MissingColumn(name.to_string()));

        Ok(Self {
            time: require(TIME_COLUMN)?,
            power: require(POWER_COLUMN)?,
            distance: find(DISTANCE_COLUMN),
            heart_rate: find(HEART_RATE_COLUMN),
            cadence: find(CADENCE_COLUMN),
            altitude: find(ALTITUDE_COLUMN),
        })
    }
}

/// Parse ride samples from CSV text.
pub fn parse_csv(content: &str) -> Result<Vec<PowerSample>, ImportError> {
    read_samples(content.as_bytes())
}

/// Read a ride CSV file.
pub fn import_csv_file(path: &Path) -> Result<RideSeries, ImportError> {
    let samples = read_samples(File::open(path)?)?;

    tracing::debug!("Read {} samples from {}", samples.len(), path.display());

    Ok(RideSeries {
        started_at: None,
        source: Some(path.to_path_buf()),
        samples,
    })
}

fn read_samples<R: Read>(input: R) -> Result<Vec<PowerSample>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);

    let header = reader.headers()?;
    if header.iter().all(str::is_empty) {
        return Err(ImportError::NoData);
    }
    let columns = ColumnMap::from_header(header)?;

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);

        let required = |column: usize, name: &str| -> Result<f64, ImportError> {
            let value = record.get(column).unwrap_or("");
            parse_number(value).ok_or_else(|| ImportError::InvalidValue {
                line,
                column: name.to_string(),
                value: value.to_string(),
            })
        };
        let optional = |column: Option<usize>, name: &str| -> Result<Option<f64>, ImportError> {
            match column.and_then(|c| record.get(c)) {
                Some(value) if !value.is_empty() => parse_number(value)
                    .map(Some)
                    .ok_or_else(|| ImportError::InvalidValue {
                        line,
                        column: name.to_string(),
                        value: value.to_string(),
                    }),
                _ => Ok(None),
            }
        };

        samples.push(PowerSample {
            time_seconds: required(columns.time, TIME_COLUMN)?,
            power_watts: required(columns.power, POWER_COLUMN)?,
            distance_km: optional(columns.distance, DISTANCE_COLUMN)?,
            heart_rate_bpm: optional(columns.heart_rate, HEART_RATE_COLUMN)?,
            cadence_rpm: optional(columns.cadence, CADENCE_COLUMN)?,
            altitude_m: optional(columns.altitude, ALTITUDE_COLUMN)?,
        });
    }

    if samples.is_empty() {
        return Err(ImportError::NoData);
    }

    Ok(samples)
}

/// Parse a finite number.
fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
