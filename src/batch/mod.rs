//! Batch module for classifying a folder of rides.

pub mod driver;
pub mod sources;
pub mod types;

pub use driver::{BatchClassifier, BatchSummary, RideFailure};
pub use sources::{ride_date_from_path, CsvFolder, FixedFtp};
pub use types::{
    BatchError, ClassifiedRide, ResultSink, RideSeriesProvider, RideSource, ThresholdPowerProvider,
};
