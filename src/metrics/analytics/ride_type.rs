//! Ride type classification.
//!
//! Combines interval detection, time in zone and power variability into a
//! single label. Rules are checked in a fixed order and the first match
//! wins:
//! - Structured Intervals: 3+ consistent efforts
//! - Recovery Ride: short, easy, mostly in Zone 1
//! - Endurance Ride: long, steady, mostly Zone 2-3
//! - Race or Group Ride: highly variable or hard
//! - otherwise Endurance or Recovery by duration
//!
//! Conditions overlap (a structured session can also look like a race), so
//! the order is part of the result.

use serde::{Serialize, Serializer};

use super::error::{AnalyticsError, AnalyticsResult};
use super::intervals::{Interval, IntervalDetector, IntervalSettings};
use super::variability::{coefficient_of_variation, positive_mean};
use super::zone_time::{ZoneTimeAccumulator, ZoneTimeBreakdown};
use crate::metrics::zones::{PowerZone, PowerZones};
use crate::recording::types::PowerSample;

/// Minimum number of intervals for a structured session.
const MIN_STRUCTURED_INTERVALS: usize = 3;
/// Maximum relative spread of interval durations in a structured session.
const MAX_DURATION_SPREAD: f64 = 0.3;
/// Maximum relative spread of interval powers in a structured session.
const MAX_POWER_SPREAD: f64 = 0.15;

/// Workout category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RideType {
    /// Repeated, consistent efforts; carries the dominant interval zone.
    StructuredIntervals(PowerZone),
    /// Short and easy.
    Recovery,
    /// Long and steady aerobic riding.
    Endurance,
    /// Variable, hard riding.
    RaceOrGroup,
}

impl RideType {
    /// Display label, e.g. "Zone 4 Interval Training".
    pub fn label(&self) -> String {
        match self {
            RideType::StructuredIntervals(zone) => {
                format!("{} Interval Training", zone.short_label())
            }
            RideType::Recovery => "Recovery Ride".to_string(),
            RideType::Endurance => "Endurance Ride".to_string(),
            RideType::RaceOrGroup => "Race or Group Ride".to_string(),
        }
    }

    /// Get a brief description of this ride type.
    pub fn description(&self) -> &'static str {
        match self {
            RideType::StructuredIntervals(_) => "Repeated efforts of similar length and power",
            RideType::Recovery => "Short, easy spin spent mostly in the recovery zone",
            RideType::Endurance => "Long, steady aerobic ride",
            RideType::RaceOrGroup => "Highly variable or hard riding",
        }
    }
}

impl std::fmt::Display for RideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for RideType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Outcome of classifying one ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Assigned category
    pub ride_type: RideType,
    /// Elapsed time from first to last sample, in minutes
    pub duration_minutes: f64,
    /// Mean of the positive power samples
    pub average_power: f64,
    /// Coefficient of variation of the positive power samples
    pub variability: f64,
    /// Validated efforts in ride order
    pub intervals: Vec<Interval>,
    /// Time spent in each zone
    pub zone_breakdown: ZoneTimeBreakdown,
}

impl ClassificationResult {
    /// Number of intervals kept by detection.
    pub fn intervals_detected(&self) -> usize {
        self.intervals.len()
    }
}

/// Classifies rides for one rider FTP.
///
/// Holds no mutable state; the same classifier may be shared between
/// threads and classifying the same input twice yields the same result.
#[derive(Debug, Clone)]
pub struct RideClassifier {
    zones: PowerZones,
    interval_settings: IntervalSettings,
}

impl RideClassifier {
    /// Create classifier with rider's FTP.
    pub fn new(ftp: f64) -> AnalyticsResult<Self> {
        Self::with_settings(ftp, IntervalSettings::default())
    }

    /// Create classifier with custom interval detection settings.
    pub fn with_settings(ftp: f64, interval_settings: IntervalSettings) -> AnalyticsResult<Self> {
        Ok(Self {
            zones: PowerZones::from_ftp(ftp)?,
            interval_settings,
        })
    }

    /// Zones used by this classifier.
    pub fn zones(&self) -> &PowerZones {
        &self.zones
    }

    /// Classify a recorded ride.
    pub fn classify(&self, samples: &[PowerSample]) -> AnalyticsResult<ClassificationResult> {
        let power: Vec<f64> = samples.iter().map(|s| s.power_watts).collect();
        let time: Vec<f64> = samples.iter().map(|s| s.time_seconds).collect();
        self.classify_series(&power, &time)
    }

    /// Classify from parallel power and time columns.
    pub fn classify_series(
        &self,
        power: &[f64],
        time: &[f64],
    ) -> AnalyticsResult<ClassificationResult> {
        validate_series(power, time)?;

        let average_power = positive_mean(power).ok_or_else(|| {
            AnalyticsError::DegenerateSeries(
                "no positive power samples, average power is undefined".to_string(),
            )
        })?;

        let duration_minutes = (time[time.len() - 1] - time[0]) / 60.0;
        let intervals =
            IntervalDetector::with_settings(&self.zones, self.interval_settings).detect(power, time);
        let zone_breakdown = ZoneTimeAccumulator::new(&self.zones).accumulate(power, time);
        let variability = coefficient_of_variation(power);

        let ride_type = self.decide(
            duration_minutes,
            average_power,
            variability,
            &intervals,
            &zone_breakdown,
        );

        tracing::debug!(
            "Classified {:.1} min ride at {:.0}W (CV {:.2}, {} intervals) as {}",
            duration_minutes,
            average_power,
            variability,
            intervals.len(),
            ride_type
        );

        Ok(ClassificationResult {
            ride_type,
            duration_minutes,
            average_power,
            variability,
            intervals,
            zone_breakdown,
        })
    }

    /// Apply the ordered rules.
    fn decide(
        &self,
        duration_minutes: f64,
        average_power: f64,
        variability: f64,
        intervals: &[Interval],
        zone_time: &ZoneTimeBreakdown,
    ) -> RideType {
        // Structured intervals
        if let Some(zone) = structured_interval_zone(intervals) {
            return RideType::StructuredIntervals(zone);
        }

        // Recovery: easy, under 90 minutes, >70% in Zone 1
        let recovery_share = zone_time.share(&[PowerZone::Recovery]);
        if average_power < self.zones.recovery_max() * 1.1
            && duration_minutes < 90.0
            && recovery_share > 0.7
        {
            return RideType::Recovery;
        }

        // Endurance: over an hour, steady, >60% in Zone 2-3
        let endurance_share = zone_time.share(&[PowerZone::Endurance, PowerZone::Tempo]);
        if duration_minutes > 60.0
            && variability < 0.25
            && endurance_share > 0.6
            && intervals.len() < MIN_STRUCTURED_INTERVALS
        {
            return RideType::Endurance;
        }

        // Race or group ride: surgy, lots of hard time, or hard on average
        let high_intensity_share = zone_time.share(&[
            PowerZone::Threshold,
            PowerZone::Vo2max,
            PowerZone::Anaerobic,
        ]);
        if variability > 0.3
            || high_intensity_share > 0.3
            || average_power > self.zones.tempo_max()
        {
            return RideType::RaceOrGroup;
        }

        if duration_minutes > 60.0 {
            RideType::Endurance
        } else {
            RideType::Recovery
        }
    }
}

/// Reject input the classifier cannot reason about.
fn validate_series(power: &[f64], time: &[f64]) -> AnalyticsResult<()> {
    if power.len() != time.len() {
        return Err(AnalyticsError::InvalidInput(format!(
            "power has {} samples but time has {}",
            power.len(),
            time.len()
        )));
    }
    if power.len() < 2 {
        return Err(AnalyticsError::InvalidInput(format!(
            "need at least 2 samples, got {}",
            power.len()
        )));
    }
    if let Some(i) = power.iter().position(|p| !p.is_finite()) {
        return Err(AnalyticsError::InvalidInput(format!(
            "power at sample {i} is not a finite number"
        )));
    }
    if let Some(i) = time.iter().position(|t| !t.is_finite()) {
        return Err(AnalyticsError::InvalidInput(format!(
            "time at sample {i} is not a finite number"
        )));
    }
    if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
        return Err(AnalyticsError::InvalidInput(format!(
            "time goes backwards at sample {}",
            i + 1
        )));
    }
    Ok(())
}

/// Dominant zone if the intervals form a structured session.
fn structured_interval_zone(intervals: &[Interval]) -> Option<PowerZone> {
    if intervals.len() < MIN_STRUCTURED_INTERVALS {
        return None;
    }

    let durations: Vec<f64> = intervals.iter().map(|i| i.duration).collect();
    let powers: Vec<f64> = intervals.iter().map(|i| i.avg_power).collect();

    if relative_spread(&durations) < MAX_DURATION_SPREAD && relative_spread(&powers) < MAX_POWER_SPREAD
    {
        most_common_zone(intervals)
    } else {
        None
    }
}

/// Mean absolute deviation divided by the mean.
fn relative_spread(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mean_abs_dev = values.iter().map(|v| (v - mean).abs()).sum::<f64>() / n;
    mean_abs_dev / mean
}

/// Most frequent zone; ties go to the zone seen first.
fn most_common_zone(intervals: &[Interval]) -> Option<PowerZone> {
    let mut counts: Vec<(PowerZone, usize)> = Vec::new();
    for interval in intervals {
        match counts.iter_mut().find(|(zone, _)| *zone == interval.zone) {
            Some((_, count)) => *count += 1,
            None => counts.push((interval.zone, 1)),
        }
    }

    let mut best: Option<(PowerZone, usize)> = None;
    for (zone, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((zone, count));
        }
    }
    best.map(|(zone, _)| zone)
}
