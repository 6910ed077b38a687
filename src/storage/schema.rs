//! Database schema definitions for the classification store.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- FTP history, one row per athlete activity
CREATE TABLE IF NOT EXISTS ftp_history (
    athlete_id TEXT NOT NULL,
    activity_date TEXT NOT NULL,
    power_20m REAL,
    ftp REAL NOT NULL,
    PRIMARY KEY (athlete_id, activity_date)
);

CREATE INDEX IF NOT EXISTS idx_ftp_history_date ON ftp_history(activity_date);

-- Ride classification results
CREATE TABLE IF NOT EXISTS ride_classifications (
    activity_date TEXT PRIMARY KEY,
    ride_type TEXT NOT NULL,
    duration_minutes REAL NOT NULL,
    average_power REAL NOT NULL,
    variability REAL NOT NULL,
    intervals_detected INTEGER NOT NULL,
    intervals_json TEXT NOT NULL,
    ftp REAL NOT NULL,
    classified_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ride_classifications_type ON ride_classifications(ride_type);
"#;

/// SQL for creating the schema version table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;

/// Text format for dates stored in the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
