//! High-intensity interval detection.
//!
//! Finds sustained above-tempo efforts in a ride:
//! 1. Smooth power with a centered moving average
//! 2. Mark smoothed samples above the tempo minimum as "high"
//! 3. Collect contiguous high runs and merge runs separated by short gaps
//! 4. Validate each merged span against the raw (unsmoothed) power

use serde::{Deserialize, Serialize};

use crate::metrics::smoothing::{CenteredAverage, DEFAULT_WINDOW};
use crate::metrics::zones::{PowerZone, PowerZones};

/// Tunable limits for interval detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalSettings {
    /// Smoothing window in samples
    pub smoothing_window: usize,
    /// Runs separated by at most this many seconds are merged
    pub merge_gap_secs: f64,
    /// An interval must last longer than this
    pub min_duration_secs: f64,
    /// Share of raw samples above the tempo minimum (0-100) an interval must exceed
    pub min_percent_above: f64,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            smoothing_window: DEFAULT_WINDOW,
            merge_gap_secs: 60.0,
            min_duration_secs: 120.0,
            min_percent_above: 60.0,
        }
    }
}

/// A validated high-intensity effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Ride time at which the effort starts, in seconds
    pub start_time: f64,
    /// Effort length in seconds
    pub duration: f64,
    /// Mean raw power over the effort
    pub avg_power: f64,
    /// Highest raw power sample in the effort
    pub peak_power: f64,
    /// Percentage (0-100) of samples above the tempo minimum
    pub percent_above_threshold: f64,
    /// Zone of the average power
    pub zone: PowerZone,
}

/// Sample index span `[start, end]`, both inclusive.
type Span = (usize, usize);

/// Detects intervals against one set of power zones.
#[derive(Debug, Clone, Copy)]
pub struct IntervalDetector<'a> {
    zones: &'a PowerZones,
    settings: IntervalSettings,
}

impl<'a> IntervalDetector<'a> {
    /// Create a detector with default settings.
    pub fn new(zones: &'a PowerZones) -> Self {
        Self::with_settings(zones, IntervalSettings::default())
    }

    /// Create a detector with custom settings.
    pub fn with_settings(zones: &'a PowerZones, settings: IntervalSettings) -> Self {
        Self { zones, settings }
    }

    /// Find intervals in a ride.
    ///
    /// `power` and `time` must have the same length and `time` must be
    /// non-decreasing; the classifier checks both before calling in.
    pub fn detect(&self, power: &[f64], time: &[f64]) -> Vec<Interval> {
        debug_assert_eq!(power.len(), time.len());

        let threshold = self.zones.tempo_min();
        let smoothed = CenteredAverage::new(self.settings.smoothing_window).smooth(power);
        let high: Vec<bool> = smoothed.iter().map(|&p| p > threshold).collect();

        let runs = candidate_runs(&high);
        let merged = self.merge_runs(&runs, time);

        merged
            .into_iter()
            .filter_map(|span| self.evaluate(span, power, time))
            .collect()
    }

    /// Join runs whose gap (end of one to start of the next) is short.
    fn merge_runs(&self, runs: &[Span], time: &[f64]) -> Vec<Span> {
        let mut merged: Vec<Span> = Vec::with_capacity(runs.len());

        for &(start, end) in runs {
            match merged.last_mut() {
                Some(current) if time[start] - time[current.1] <= self.settings.merge_gap_secs => {
                    current.1 = end;
                }
                _ => merged.push((start, end)),
            }
        }

        merged
    }

    /// Measure a span on raw power and keep it only if it is a real effort.
    fn evaluate(&self, (start, end): Span, power: &[f64], time: &[f64]) -> Option<Interval> {
        let threshold = self.zones.tempo_min();
        let window = &power[start..=end];

        let duration = time[end] - time[start];
        let avg_power = window.iter().sum::<f64>() / window.len() as f64;
        let peak_power = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let above = window.iter().filter(|&&p| p > threshold).count();
        let percent_above_threshold = above as f64 / window.len() as f64 * 100.0;

        let valid = duration > self.settings.min_duration_secs
            && avg_power > threshold
            && percent_above_threshold > self.settings.min_percent_above;

        if !valid {
            tracing::trace!(
                "Discarded span {}..={} ({:.0}s, {:.0}W, {:.0}% above)",
                start,
                end,
                duration,
                avg_power,
                percent_above_threshold
            );
            return None;
        }

        Some(Interval {
            start_time: time[start],
            duration,
            avg_power,
            peak_power,
            percent_above_threshold,
            zone: self.zones.zone_for(avg_power),
        })
    }
}

/// Contiguous runs of high samples.
///
/// A run's end is the index of the first low sample after it; a run still
/// open when the series ends closes at the last index.
fn candidate_runs(high: &[bool]) -> Vec<Span> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &is_high) in high.iter().enumerate() {
        match (is_high, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push((start, i));
                open = None;
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        runs.push((start, high.len() - 1));
    }

    runs
}
