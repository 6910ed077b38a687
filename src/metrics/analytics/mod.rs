//! Ride analytics.
//!
//! This module turns a recorded power series into a ride classification:
//! - Interval detection
//! - Time in zone
//! - Power variability
//! - Ride type decision
//! - FTP progression from best 20-minute power

pub mod error;
pub mod ftp_progression;
pub mod intervals;
pub mod ride_type;
pub mod variability;
pub mod zone_time;

// Re-exports for convenience
pub use error::{AnalyticsError, AnalyticsResult};
pub use ftp_progression::{ActivityPower, FtpProgression, FtpRecord};
pub use intervals::{Interval, IntervalDetector, IntervalSettings};
pub use ride_type::{ClassificationResult, RideClassifier, RideType};
pub use variability::{coefficient_of_variation, positive_mean};
pub use zone_time::{ZoneTimeAccumulator, ZoneTimeBreakdown};
