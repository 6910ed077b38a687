//! Import of training-log metric exports.
//!
//! A log file holds one athlete and a summary of each activity. Only the
//! activity date and the best 20-minute power are read; they feed the FTP
//! history. Metric values appear as plain numbers, numeric strings or
//! `[value, sample_count]` pairs depending on the exporting tool version.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::metrics::analytics::ftp_progression::ActivityPower;
use crate::recording::types::ImportError;

/// Metric key holding best 20-minute power.
const POWER_20M_METRIC: &str = "20m_critical_power";

/// Date formats seen in exports, most common first.
const DATE_FORMATS: [&str; 3] = ["%Y/%m/%d %H:%M:%S UTC", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Deserialize)]
struct TrainingLog {
    #[serde(rename = "ATHLETE")]
    athlete: Athlete,
    #[serde(rename = "RIDES", default)]
    rides: Vec<LoggedRide>,
}

#[derive(Debug, Deserialize)]
struct Athlete {
    id: Value,
}

#[derive(Debug, Deserialize)]
struct LoggedRide {
    date: String,
    #[serde(rename = "METRICS", default)]
    metrics: HashMap<String, Value>,
}

/// Activities of one athlete.
#[derive(Debug, Clone)]
pub struct AthleteLog {
    pub athlete_id: String,
    pub activities: Vec<ActivityPower>,
}

/// Parse a training log from JSON text.
pub fn parse_training_log(content: &str) -> Result<AthleteLog, ImportError> {
    let log: TrainingLog = serde_json::from_str(content)?;

    let athlete_id = match log.athlete.id {
        Value::String(id) => id,
        other => other.to_string(),
    };

    let activities = log
        .rides
        .iter()
        .enumerate()
        .map(|(i, ride)| {
            let activity_date =
                parse_log_date(&ride.date).ok_or_else(|| ImportError::InvalidValue {
                    line: i + 1,
                    column: "date".to_string(),
                    value: ride.date.clone(),
                })?;
            Ok(ActivityPower {
                activity_date,
                power_20m: ride.metrics.get(POWER_20M_METRIC).and_then(metric_value),
            })
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    Ok(AthleteLog {
        athlete_id,
        activities,
    })
}

/// Read a training log file.
pub fn import_training_log(path: &Path) -> Result<AthleteLog, ImportError> {
    let content = std::fs::read_to_string(path)?;
    let log = parse_training_log(&content)?;

    tracing::debug!(
        "Read {} activities for athlete {} from {}",
        log.activities.len(),
        log.athlete_id,
        path.display()
    );

    Ok(log)
}

fn parse_log_date(date: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(date.trim(), format).ok())
}

/// Numeric value of a metric entry.
fn metric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(metric_value),
        _ => None,
    }
}
