//! Time-in-zone accounting.
//!
//! Buckets elapsed time by raw power using each zone's *maximum* as an
//! exclusive ceiling, checked from the bottom up. `PowerZones::zone_for`
//! walks zone minimums from the top down instead; the two disagree for
//! power falling in the gaps between ranges (e.g. 0.555 x FTP).

use serde::{Deserialize, Serialize};

use crate::metrics::zones::{PowerZone, PowerZones};

/// Seconds spent in each zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneTimeBreakdown {
    /// Zone 1 (Active Recovery)
    pub recovery: f64,
    /// Zone 2 (Endurance)
    pub endurance: f64,
    /// Zone 3 (Tempo)
    pub tempo: f64,
    /// Zone 4 (Threshold)
    pub threshold: f64,
    /// Zone 5 (VO2 Max)
    pub vo2max: f64,
    /// Zone 6 (Anaerobic), including everything above it
    pub anaerobic: f64,
}

impl ZoneTimeBreakdown {
    /// Seconds credited to one zone.
    pub fn get(&self, zone: PowerZone) -> f64 {
        match zone {
            PowerZone::Recovery => self.recovery,
            PowerZone::Endurance => self.endurance,
            PowerZone::Tempo => self.tempo,
            PowerZone::Threshold => self.threshold,
            PowerZone::Vo2max => self.vo2max,
            PowerZone::Anaerobic => self.anaerobic,
        }
    }

    fn add(&mut self, zone: PowerZone, seconds: f64) {
        let bucket = match zone {
            PowerZone::Recovery => &mut self.recovery,
            PowerZone::Endurance => &mut self.endurance,
            PowerZone::Tempo => &mut self.tempo,
            PowerZone::Threshold => &mut self.threshold,
            PowerZone::Vo2max => &mut self.vo2max,
            PowerZone::Anaerobic => &mut self.anaerobic,
        };
        *bucket += seconds;
    }

    /// Sum of all six buckets.
    pub fn total(&self) -> f64 {
        PowerZone::ALL.iter().map(|&zone| self.get(zone)).sum()
    }

    /// Fraction (0-1) of total time spent in the given zones; 0 when no time
    /// was recorded at all.
    pub fn share(&self, zones: &[PowerZone]) -> f64 {
        let total = self.total();
        if total > 0.0 {
            zones.iter().map(|&zone| self.get(zone)).sum::<f64>() / total
        } else {
            0.0
        }
    }
}

/// Accumulates time in zone for one FTP.
#[derive(Debug, Clone, Copy)]
pub struct ZoneTimeAccumulator<'a> {
    zones: &'a PowerZones,
}

impl<'a> ZoneTimeAccumulator<'a> {
    pub fn new(zones: &'a PowerZones) -> Self {
        Self { zones }
    }

    /// Bucket a power value against the zone ceilings.
    pub fn bucket_for(&self, power: f64) -> PowerZone {
        PowerZone::ALL
            .into_iter()
            .find(|&zone| power < self.zones.range(zone).ceiling())
            .unwrap_or(PowerZone::Anaerobic)
    }

    /// Credit each sample's time delta to its zone.
    ///
    /// The first sample has no predecessor and is credited one second, so
    /// the breakdown totals `time[last] - time[0] + 1`.
    pub fn accumulate(&self, power: &[f64], time: &[f64]) -> ZoneTimeBreakdown {
        let mut breakdown = ZoneTimeBreakdown::default();

        for (i, (&p, &t)) in power.iter().zip(time).enumerate() {
            let delta = if i == 0 { 1.0 } else { t - time[i - 1] };
            breakdown.add(self.bucket_for(p), delta);
        }

        breakdown
    }
}
