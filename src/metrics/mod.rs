//! Metrics module for power zones, smoothing and ride analytics.

pub mod analytics;
pub mod smoothing;
pub mod zones;

pub use smoothing::CenteredAverage;
pub use zones::{PowerZone, PowerZones, ZoneRange};

// Re-export key analytics types for convenience
pub use analytics::{
    AnalyticsError, AnalyticsResult, ClassificationResult, Interval, IntervalSettings,
    RideClassifier, RideType, ZoneTimeBreakdown,
};
