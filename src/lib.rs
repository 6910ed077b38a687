//! RideType - Cycling Ride Classifier
//!
//! Classifies recorded rides from their power data into structured interval
//! sessions, recovery rides, endurance rides and race or group rides. Provides
//! the FTP-based zone model, interval detection, FTP history tracking and a
//! batch driver that classifies a folder of rides into SQLite and a text report.

pub mod batch;
pub mod metrics;
pub mod recording;
pub mod storage;

// Re-export commonly used types
pub use batch::{BatchClassifier, BatchSummary, CsvFolder, FixedFtp};
pub use metrics::analytics::{ClassificationResult, RideClassifier, RideType};
pub use metrics::zones::{PowerZone, PowerZones};
pub use recording::types::{PowerSample, RideSeries};
pub use storage::config::AppConfig;
pub use storage::database::Database;
