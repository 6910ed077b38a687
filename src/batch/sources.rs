//! Ride and FTP providers.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::batch::types::{BatchError, RideSeriesProvider, RideSource, ThresholdPowerProvider};
use crate::recording::importer_csv::import_csv_file;
use crate::recording::types::RideSeries;

/// File name layout of exported rides, e.g. `2017_01_31_18_36_44.csv`.
const FILE_DATE_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// A folder tree of ride CSV files.
#[derive(Debug, Clone)]
pub struct CsvFolder {
    root: PathBuf,
}

impl CsvFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RideSeriesProvider for CsvFolder {
    fn rides(&self) -> Result<Vec<RideSource>, BatchError> {
        let mut paths = Vec::new();
        collect_csv_files(&self.root, &mut paths)?;
        paths.sort();

        tracing::info!(
            "Found {} ride files under {}",
            paths.len(),
            self.root.display()
        );

        Ok(paths
            .into_iter()
            .map(|path| RideSource {
                started_at: ride_date_from_path(&path),
                path,
            })
            .collect())
    }

    fn load(&self, source: &RideSource) -> Result<RideSeries, BatchError> {
        let mut series = import_csv_file(&source.path)?;
        series.started_at = source.started_at;
        Ok(series)
    }
}

fn collect_csv_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BatchError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_csv_files(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Ride start time encoded in the file stem.
pub fn ride_date_from_path(path: &Path) -> Option<NaiveDateTime> {
    let stem = path.file_stem()?.to_str()?;
    NaiveDateTime::parse_from_str(stem, FILE_DATE_FORMAT).ok()
}

/// The same FTP for every ride.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFtp(pub f64);

impl ThresholdPowerProvider for FixedFtp {
    fn ftp_at(&self, _date: NaiveDateTime) -> Result<Option<f64>, BatchError> {
        Ok(Some(self.0))
    }
}
