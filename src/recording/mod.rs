//! Recording module for ride import and result reports.

pub mod importer_csv;
pub mod importer_log;
pub mod report;
pub mod types;

pub use importer_csv::{import_csv_file, parse_csv};
pub use importer_log::{import_training_log, parse_training_log, AthleteLog};
pub use report::TextReport;
pub use types::{ImportError, PowerSample, ReportError, RideSeries};
