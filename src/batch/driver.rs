//! Batch classification of many rides.
//!
//! Runs in three passes:
//! 1. Resolve each ride's date and FTP on the calling thread
//! 2. Load and classify on the rayon pool
//! 3. Hand results to every sink in ride order
//!
//! A failing ride is logged and counted and the batch carries on.

use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::batch::types::{
    BatchError, ClassifiedRide, ResultSink, RideSeriesProvider, RideSource, ThresholdPowerProvider,
};
use crate::metrics::analytics::{AnalyticsError, IntervalSettings, RideClassifier};

/// A ride that could not be classified or stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideFailure {
    /// Ride file
    pub path: PathBuf,
    /// Error message
    pub error: String,
}

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Rides classified and recorded by every sink
    pub successful: usize,
    /// Rides skipped because of an error
    pub failed: usize,
    /// Number of rides per ride type label
    pub ride_types: BTreeMap<String, usize>,
    /// Failed rides, sorted by path
    pub failures: Vec<RideFailure>,
}

impl BatchSummary {
    fn fail(&mut self, path: PathBuf, error: BatchError) {
        tracing::warn!("Error processing {}: {}", path.display(), error);
        self.failed += 1;
        self.failures.push(RideFailure {
            path,
            error: error.to_string(),
        });
    }

    fn succeed(&mut self, label: String) {
        self.successful += 1;
        *self.ride_types.entry(label).or_insert(0) += 1;
    }
}

/// Ride ready for classification.
struct Job {
    source: RideSource,
    started_at: NaiveDateTime,
    ftp: f64,
}

/// Classifies every ride of a provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchClassifier {
    interval_settings: IntervalSettings,
}

impl BatchClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(interval_settings: IntervalSettings) -> Self {
        Self { interval_settings }
    }

    /// Classify all rides and pass results to `sinks`.
    ///
    /// Sinks see each ride in slice order. When one fails the ride is counted
    /// as failed and later sinks never see it.
    ///
    /// Only listing the rides and finishing the sinks can fail the whole run.
    pub fn run<P, T>(
        &self,
        provider: &P,
        thresholds: &T,
        sinks: &mut [&mut dyn ResultSink],
    ) -> Result<BatchSummary, BatchError>
    where
        P: RideSeriesProvider + ?Sized,
        T: ThresholdPowerProvider + ?Sized,
    {
        let sources = provider.rides()?;
        let mut summary = BatchSummary::default();

        let mut jobs = Vec::with_capacity(sources.len());
        for source in sources {
            match resolve(source, thresholds) {
                Ok(job) => jobs.push(job),
                Err((path, error)) => summary.fail(path, error),
            }
        }

        let outcomes: Vec<(PathBuf, Result<ClassifiedRide, BatchError>)> = jobs
            .into_par_iter()
            .map(|job| {
                let path = job.source.path.clone();
                (path, self.classify(provider, job))
            })
            .collect();

        for (path, outcome) in outcomes {
            let stored = outcome.and_then(|ride| {
                for sink in sinks.iter_mut() {
                    sink.record(&ride)?;
                }
                Ok(ride)
            });

            match stored {
                Ok(ride) => {
                    tracing::debug!("{} -> {}", path.display(), ride.result.ride_type);
                    summary.succeed(ride.result.ride_type.label());
                }
                Err(error) => summary.fail(path, error),
            }
        }

        for sink in sinks.iter_mut() {
            sink.finish()?;
        }

        summary.failures.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(
            "Processing complete: {} successful, {} failed",
            summary.successful,
            summary.failed
        );

        Ok(summary)
    }

    fn classify<P>(&self, provider: &P, job: Job) -> Result<ClassifiedRide, BatchError>
    where
        P: RideSeriesProvider + ?Sized,
    {
        let series = provider.load(&job.source)?;
        let classifier = RideClassifier::with_settings(job.ftp, self.interval_settings)?;
        let result = classifier.classify(&series.samples)?;

        Ok(ClassifiedRide {
            source: job.source.path,
            started_at: job.started_at,
            ftp: job.ftp,
            result,
        })
    }
}

fn resolve<T>(source: RideSource, thresholds: &T) -> Result<Job, (PathBuf, BatchError)>
where
    T: ThresholdPowerProvider + ?Sized,
{
    let Some(started_at) = source.started_at else {
        let name = source.path.display().to_string();
        return Err((source.path, BatchError::InvalidFileName(name)));
    };

    match thresholds.ftp_at(started_at) {
        Ok(Some(ftp)) => Ok(Job {
            source,
            started_at,
            ftp,
        }),
        Ok(None) => Err((
            source.path,
            AnalyticsError::MissingThreshold(format!("no FTP recorded on or before {}", started_at))
                .into(),
        )),
        Err(error) => Err((source.path, error)),
    }
}
