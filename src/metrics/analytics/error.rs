//! Analytics error types.

use thiserror::Error;

/// Errors that can occur while classifying a ride.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Input cannot be classified: too few samples, non-finite values,
    /// time running backwards or a non-positive FTP.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every power value is zero or negative, so average power is undefined.
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// No FTP could be resolved for the ride.
    #[error("Missing threshold: {0}")]
    MissingThreshold(String),
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
