//! Plain-text classification report.

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::batch::{BatchError, ClassifiedRide, ResultSink};
use crate::recording::types::ReportError;

const TITLE: &str = "RIDE CLASSIFICATION RESULTS";
const RULE_WIDTH: usize = 60;

/// Collects one line per classified ride and writes them on `finish`.
#[derive(Debug)]
pub struct TextReport {
    path: PathBuf,
    entries: Vec<(NaiveDateTime, String)>,
}

impl TextReport {
    /// Create a report that will be written to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Add a ride.
    pub fn add(&mut self, started_at: NaiveDateTime, label: impl Into<String>) {
        self.entries.push((started_at, label.into()));
    }

    /// Render the report text.
    pub fn render(&self) -> String {
        let mut output = format!("{TITLE}\n{}\n\n", "=".repeat(RULE_WIDTH));
        for (started_at, label) in &self.entries {
            output.push_str(&format!(
                "{} - {}\n",
                started_at.format("%Y-%m-%d %H:%M:%S"),
                label
            ));
        }
        output
    }

    /// Write the report to its path. Nothing is written for an empty report.
    pub fn write(&self) -> Result<(), ReportError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        std::fs::write(&self.path, self.render())?;
        tracing::info!("Results saved to {}", self.path.display());
        Ok(())
    }
}

impl ResultSink for TextReport {
    fn record(&mut self, ride: &ClassifiedRide) -> Result<(), BatchError> {
        self.add(ride.started_at, ride.result.ride_type.label());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), BatchError> {
        self.write()?;
        Ok(())
    }
}
