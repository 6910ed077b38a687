//! Batch classification seams and records.

use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

use crate::metrics::analytics::{AnalyticsError, ClassificationResult};
use crate::recording::types::{ImportError, ReportError, RideSeries};
use crate::storage::database::DatabaseError;

/// A ride known to a provider but not yet loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RideSource {
    /// Where the ride is stored
    pub path: PathBuf,
    /// Ride start time, if the provider could determine it
    pub started_at: Option<NaiveDateTime>,
}

/// A ride with its classification and the FTP it was classified against.
#[derive(Debug, Clone)]
pub struct ClassifiedRide {
    /// File or key the ride was loaded from
    pub source: PathBuf,
    /// Ride start time
    pub started_at: NaiveDateTime,
    /// FTP in watts used for the zones
    pub ftp: f64,
    /// Classifier output
    pub result: ClassificationResult,
}

/// Supplies ride series to classify.
///
/// Loading runs on the rayon pool, so providers must be `Sync`.
pub trait RideSeriesProvider: Sync {
    /// List every ride the provider knows about.
    fn rides(&self) -> Result<Vec<RideSource>, BatchError>;

    /// Load the samples of one ride.
    fn load(&self, source: &RideSource) -> Result<RideSeries, BatchError>;
}

/// Supplies the FTP in effect at a point in time.
pub trait ThresholdPowerProvider {
    /// FTP at `date`, or `None` if no value is known yet.
    fn ftp_at(&self, date: NaiveDateTime) -> Result<Option<f64>, BatchError>;
}

/// Receives classified rides.
pub trait ResultSink {
    /// Record one classified ride.
    fn record(&mut self, ride: &ClassifiedRide) -> Result<(), BatchError>;

    /// Called once after the last ride.
    fn finish(&mut self) -> Result<(), BatchError> {
        Ok(())
    }
}

/// Errors that can occur while processing a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read ride date from file name: {0}")]
    InvalidFileName(String),
}
