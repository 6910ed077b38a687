//! Power zone model derived from FTP.
//!
//! Six Coggan-style zones expressed as fractions of Functional Threshold
//! Power. A `PowerZones` value is computed once per FTP and never changes
//! afterwards; a ride classified at a different FTP needs its own instance.

use serde::{Deserialize, Serialize};

use crate::metrics::analytics::error::{AnalyticsError, AnalyticsResult};

/// One of the six training zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerZone {
    /// Zone 1: Recovery (up to 55% FTP)
    Recovery,
    /// Zone 2: Endurance (56-75% FTP)
    Endurance,
    /// Zone 3: Tempo (76-90% FTP)
    Tempo,
    /// Zone 4: Threshold (91-105% FTP)
    Threshold,
    /// Zone 5: VO2max (106-120% FTP)
    Vo2max,
    /// Zone 6: Anaerobic (121% FTP and above)
    Anaerobic,
}

impl PowerZone {
    /// All zones, lowest intensity first.
    pub const ALL: [PowerZone; 6] = [
        PowerZone::Recovery,
        PowerZone::Endurance,
        PowerZone::Tempo,
        PowerZone::Threshold,
        PowerZone::Vo2max,
        PowerZone::Anaerobic,
    ];

    /// Zone number (1-6).
    pub fn number(&self) -> u8 {
        match self {
            PowerZone::Recovery => 1,
            PowerZone::Endurance => 2,
            PowerZone::Tempo => 3,
            PowerZone::Threshold => 4,
            PowerZone::Vo2max => 5,
            PowerZone::Anaerobic => 6,
        }
    }

    /// Zone name without the number.
    pub fn name(&self) -> &'static str {
        match self {
            PowerZone::Recovery => "Recovery",
            PowerZone::Endurance => "Endurance",
            PowerZone::Tempo => "Tempo",
            PowerZone::Threshold => "Threshold",
            PowerZone::Vo2max => "VO2max",
            PowerZone::Anaerobic => "Anaerobic",
        }
    }

    /// Full label, e.g. "Zone 3 (Tempo)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.short_label(), self.name())
    }

    /// Label with the parenthetical name stripped, e.g. "Zone 3".
    pub fn short_label(&self) -> String {
        format!("Zone {}", self.number())
    }
}

impl std::fmt::Display for PowerZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A power zone range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRange {
    /// Which zone this range describes
    pub zone: PowerZone,
    /// Minimum as a fraction of FTP
    pub min_fraction: f64,
    /// Maximum as a fraction of FTP (`None` = no upper limit)
    pub max_fraction: Option<f64>,
    /// Minimum watts for this zone
    pub min_watts: f64,
    /// Maximum watts for this zone (`None` = no upper limit)
    pub max_watts: Option<f64>,
}

impl ZoneRange {
    fn new(zone: PowerZone, ftp: f64, min_fraction: f64, max_fraction: Option<f64>) -> Self {
        Self {
            zone,
            min_fraction,
            max_fraction,
            min_watts: ftp * min_fraction,
            max_watts: max_fraction.map(|fraction| ftp * fraction),
        }
    }

    /// Upper bound in watts, infinite for the open-ended top zone.
    pub fn ceiling(&self) -> f64 {
        self.max_watts.unwrap_or(f64::INFINITY)
    }
}

/// Six-zone power model for one FTP value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerZones {
    /// Functional Threshold Power the zones were derived from
    pub ftp: f64,
    /// Zone 1: Recovery (0-55% FTP)
    pub z1_recovery: ZoneRange,
    /// Zone 2: Endurance (56-75% FTP)
    pub z2_endurance: ZoneRange,
    /// Zone 3: Tempo (76-90% FTP)
    pub z3_tempo: ZoneRange,
    /// Zone 4: Threshold (91-105% FTP)
    pub z4_threshold: ZoneRange,
    /// Zone 5: VO2max (106-120% FTP)
    pub z5_vo2max: ZoneRange,
    /// Zone 6: Anaerobic (>=121% FTP)
    pub z6_anaerobic: ZoneRange,
}

impl PowerZones {
    /// Calculate power zones from FTP.
    ///
    /// FTP must be positive and finite; there is no default substitute.
    pub fn from_ftp(ftp: f64) -> AnalyticsResult<Self> {
        if !ftp.is_finite() || ftp <= 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "FTP must be a positive number of watts, got {ftp}"
            )));
        }

        Ok(Self {
            ftp,
            z1_recovery: ZoneRange::new(PowerZone::Recovery, ftp, 0.0, Some(0.55)),
            z2_endurance: ZoneRange::new(PowerZone::Endurance, ftp, 0.56, Some(0.75)),
            z3_tempo: ZoneRange::new(PowerZone::Tempo, ftp, 0.76, Some(0.90)),
            z4_threshold: ZoneRange::new(PowerZone::Threshold, ftp, 0.91, Some(1.05)),
            z5_vo2max: ZoneRange::new(PowerZone::Vo2max, ftp, 1.06, Some(1.20)),
            z6_anaerobic: ZoneRange::new(PowerZone::Anaerobic, ftp, 1.21, None),
        })
    }

    /// Get the zone for a given power value.
    ///
    /// Minimums are checked from the top down, so power falling in the
    /// narrow gap between two ranges belongs to the lower zone.
    pub fn zone_for(&self, power: f64) -> PowerZone {
        if power >= self.z6_anaerobic.min_watts {
            PowerZone::Anaerobic
        } else if power >= self.z5_vo2max.min_watts {
            PowerZone::Vo2max
        } else if power >= self.z4_threshold.min_watts {
            PowerZone::Threshold
        } else if power >= self.z3_tempo.min_watts {
            PowerZone::Tempo
        } else if power >= self.z2_endurance.min_watts {
            PowerZone::Endurance
        } else {
            PowerZone::Recovery
        }
    }

    /// Get the range for a zone.
    pub fn range(&self, zone: PowerZone) -> &ZoneRange {
        match zone {
            PowerZone::Recovery => &self.z1_recovery,
            PowerZone::Endurance => &self.z2_endurance,
            PowerZone::Tempo => &self.z3_tempo,
            PowerZone::Threshold => &self.z4_threshold,
            PowerZone::Vo2max => &self.z5_vo2max,
            PowerZone::Anaerobic => &self.z6_anaerobic,
        }
    }

    /// Get all zones, lowest first.
    pub fn all_zones(&self) -> [&ZoneRange; 6] {
        [
            &self.z1_recovery,
            &self.z2_endurance,
            &self.z3_tempo,
            &self.z4_threshold,
            &self.z5_vo2max,
            &self.z6_anaerobic,
        ]
    }

    /// Upper edge of the recovery zone in watts.
    pub fn recovery_max(&self) -> f64 {
        self.z1_recovery.ceiling()
    }

    /// Lower edge of the tempo zone; the cutoff for "high intensity" samples.
    pub fn tempo_min(&self) -> f64 {
        self.z3_tempo.min_watts
    }

    /// Upper edge of the tempo zone in watts.
    pub fn tempo_max(&self) -> f64 {
        self.z3_tempo.ceiling()
    }
}
