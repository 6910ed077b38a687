//! FTP history from best 20-minute power.
//!
//! Derives a dated FTP for every activity from the rider's recent best
//! 20-minute efforts. FTP follows new bests upwards straight away, but only
//! drops once the longer window confirms real detraining:
//! - rise: best 20-minute power over the last 45 days beats current FTP
//! - hold: the 45-day best dips, but the 90-day best still reaches FTP
//! - drop: the 90-day best is also below FTP, so FTP falls to it

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Best 20-minute power recorded for one activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityPower {
    /// When the activity took place.
    pub activity_date: NaiveDateTime,
    /// Best 20-minute power in watts, if the activity had a power meter.
    pub power_20m: Option<f64>,
}

/// FTP in effect from one activity onwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FtpRecord {
    /// Activity start time
    pub activity_date: NaiveDateTime,
    /// Best 20-minute power of this activity in watts
    pub power_20m: Option<f64>,
    /// FTP in watts; 0 before any power data and once the detraining window has none.
    pub ftp: f64,
}

/// Progressive FTP calculator.
#[derive(Debug, Clone, Copy)]
pub struct FtpProgression {
    /// Window (days) for the best effort that can raise FTP.
    rise_window_days: i64,
    /// Window (days) for the best effort that must also fall short before FTP drops.
    detraining_window_days: i64,
}

impl FtpProgression {
    /// Create with default 45/90-day windows.
    pub fn new() -> Self {
        Self {
            rise_window_days: 45,
            detraining_window_days: 90,
        }
    }

    /// Create with custom windows.
    pub fn with_windows(rise_window_days: i64, detraining_window_days: i64) -> Self {
        Self {
            rise_window_days,
            detraining_window_days,
        }
    }

    /// Compute the FTP in effect at each activity, in date order.
    pub fn compute(&self, activities: &[ActivityPower]) -> Vec<FtpRecord> {
        let mut ordered = activities.to_vec();
        ordered.sort_by_key(|a| a.activity_date);

        let mut records = Vec::with_capacity(ordered.len());
        let mut previous_ftp = 0.0;

        for (i, activity) in ordered.iter().enumerate() {
            let recent_best = window_best(&ordered[..=i], self.rise_window_days);

            let ftp = if i == 0 || recent_best >= previous_ftp {
                recent_best
            } else {
                let long_best = window_best(&ordered[..=i], self.detraining_window_days);
                if long_best < previous_ftp {
                    long_best
                } else {
                    previous_ftp
                }
            };

            records.push(FtpRecord {
                activity_date: activity.activity_date,
                power_20m: activity.power_20m,
                ftp,
            });
            previous_ftp = ftp;
        }

        records
    }
}

impl Default for FtpProgression {
    fn default() -> Self {
        Self::new()
    }
}

/// Best 20-minute power within `days` of the last activity in `history`
/// (inclusive); 0 if there is none.
fn window_best(history: &[ActivityPower], days: i64) -> f64 {
    let Some(latest) = history.last() else {
        return 0.0;
    };
    let cutoff = latest.activity_date - Duration::days(days);

    history
        .iter()
        .rev()
        .take_while(|a| a.activity_date >= cutoff)
        .filter_map(|a| a.power_20m)
        .fold(0.0, f64::max)
}
