//! Recorded ride data as consumed by the classifier.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A single data point of a recorded ride.
///
/// Only `time_seconds` and `power_watts` feed the classifier; the remaining
/// channels are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    /// Seconds since the start of the recording
    pub time_seconds: f64,
    /// Instantaneous power in watts
    pub power_watts: f64,
    /// Heart rate in BPM
    pub heart_rate_bpm: Option<f64>,
    /// Cumulative distance in kilometers
    pub distance_km: Option<f64>,
    /// Cadence in RPM
    pub cadence_rpm: Option<f64>,
    /// Altitude in meters
    pub altitude_m: Option<f64>,
}

impl PowerSample {
    /// Create a sample with only time and power.
    pub fn new(time_seconds: f64, power_watts: f64) -> Self {
        Self {
            time_seconds,
            power_watts,
            heart_rate_bpm: None,
            distance_km: None,
            cadence_rpm: None,
            altitude_m: None,
        }
    }
}

/// An ordered series of samples for one ride.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RideSeries {
    /// When the ride started, if known
    pub started_at: Option<NaiveDateTime>,
    /// File the series was read from, if any
    pub source: Option<PathBuf>,
    /// Samples in recording order
    pub samples: Vec<PowerSample>,
}

impl RideSeries {
    /// Wrap a sample vector.
    pub fn new(samples: Vec<PowerSample>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Errors that can occur while reading ride files.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not well-formed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File is not valid JSON or has the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File has no header or no data rows
    #[error("File has no ride data")]
    NoData,

    /// A required column is absent from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A cell could not be parsed as a number
    #[error("Invalid value {value:?} in column {column} at line {line}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
}

/// Errors that can occur while writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write report data
    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),
}
