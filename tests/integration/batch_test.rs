//! Integration tests for batch classification of a ride folder.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

use ridetype::batch::{BatchClassifier, CsvFolder, FixedFtp, ResultSink};
use ridetype::metrics::analytics::FtpRecord;
use ridetype::recording::TextReport;
use ridetype::storage::{ClassificationStore, Database, FtpHistoryStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
}

/// Write a 1 Hz ride CSV produced by `power(t)`.
fn write_ride(dir: &Path, name: &str, secs: usize, power: impl Fn(usize) -> f64) {
    let mut csv = String::from("secs,km,power\n");
    for t in 0..secs {
        csv.push_str(&format!("{},{:.3},{}\n", t, t as f64 * 0.008, power(t)));
    }
    std::fs::write(dir.join(name), csv).unwrap();
}

/// Folder with two good rides and three that fail for different reasons.
fn create_test_folder(dir: &Path) {
    write_ride(dir, "2017_02_01_07_00_00.csv", 3 * 3600, |t| {
        if t % 2 == 0 {
            80.0
        } else {
            400.0
        }
    });
    write_ride(dir, "2017_02_02_07_00_00.csv", 45 * 60, |_| 150.0);

    // Dated before any FTP is known
    write_ride(dir, "2016_12_01_07_00_00.csv", 45 * 60, |_| 150.0);
    // No date in the name
    write_ride(dir, "morning_ride.csv", 45 * 60, |_| 150.0);
    // Unreadable power
    std::fs::write(
        dir.join("2017_02_03_07_00_00.csv"),
        "secs,power\n0,abc\n1,200\n",
    )
    .unwrap();
}

fn setup_db() -> Database {
    let db = Database::open_in_memory().expect("Failed to create test database");
    FtpHistoryStore::new(db.connection())
        .save_records(
            "athlete-1",
            &[FtpRecord {
                activity_date: date(2017, 1, 1),
                power_20m: Some(263.0),
                ftp: 250.0,
            }],
        )
        .unwrap();
    db
}

#[test]
fn test_batch_with_ftp_history() {
    let rides = tempfile::tempdir().unwrap();
    create_test_folder(rides.path());
    let out = tempfile::tempdir().unwrap();
    let report_path = out.path().join("results.txt");

    let db = setup_db();
    let thresholds = FtpHistoryStore::new(db.connection());
    let mut store = ClassificationStore::new(db.connection());
    let mut report = TextReport::new(&report_path);

    let summary = BatchClassifier::new()
        .run(
            &CsvFolder::new(rides.path()),
            &thresholds,
            &mut [&mut store as &mut dyn ResultSink, &mut report],
        )
        .unwrap();

    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.failures.len(), 3);
    assert_eq!(summary.ride_types.get("Race or Group Ride"), Some(&1));
    assert_eq!(summary.ride_types.get("Recovery Ride"), Some(&1));

    let store = ClassificationStore::new(db.connection());
    assert_eq!(store.count().unwrap(), 2);
    let race = store.get(date(2017, 2, 1)).unwrap().unwrap();
    assert_eq!(race.ride_type, "Race or Group Ride");
    assert_eq!(race.ftp, 250.0);

    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.starts_with("RIDE CLASSIFICATION RESULTS"));
    assert!(text.contains("2017-02-01 07:00:00 - Race or Group Ride"));
    assert!(text.contains("2017-02-02 07:00:00 - Recovery Ride"));
    assert!(!text.contains("2016-12-01"));
}

#[test]
fn test_batch_with_fixed_ftp() {
    let rides = tempfile::tempdir().unwrap();
    create_test_folder(rides.path());
    let out = tempfile::tempdir().unwrap();
    let mut report = TextReport::new(out.path().join("results.txt"));

    let summary = BatchClassifier::new()
        .run(
            &CsvFolder::new(rides.path()),
            &FixedFtp(250.0),
            &mut [&mut report as &mut dyn ResultSink],
        )
        .unwrap();

    // The undated and unreadable rides still fail
    assert_eq!(summary.successful, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.ride_types.get("Recovery Ride"), Some(&2));
}

#[test]
fn test_rerun_replaces_stored_results() {
    let rides = tempfile::tempdir().unwrap();
    write_ride(rides.path(), "2017_02_02_07_00_00.csv", 45 * 60, |_| 150.0);

    let db = setup_db();
    let folder = CsvFolder::new(rides.path());

    for _ in 0..2 {
        let mut store = ClassificationStore::new(db.connection());
        BatchClassifier::new()
            .run(&folder, &FixedFtp(250.0), &mut [&mut store as &mut dyn ResultSink])
            .unwrap();
    }

    assert_eq!(ClassificationStore::new(db.connection()).count().unwrap(), 1);
}

#[test]
fn test_ride_after_detraining_fails() {
    let rides = tempfile::tempdir().unwrap();
    write_ride(rides.path(), "2017_07_01_07_00_00.csv", 45 * 60, |_| 150.0);

    let db = setup_db();
    FtpHistoryStore::new(db.connection())
        .save_records(
            "athlete-1",
            &[FtpRecord {
                activity_date: date(2017, 6, 1),
                power_20m: None,
                ftp: 0.0,
            }],
        )
        .unwrap();

    let summary = BatchClassifier::new()
        .run(
            &CsvFolder::new(rides.path()),
            &FtpHistoryStore::new(db.connection()),
            &mut [],
        )
        .unwrap();

    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 1);
    assert!(summary.failures[0].error.contains("FTP"));
}

#[test]
fn test_missing_folder_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let result = BatchClassifier::new().run(
        &CsvFolder::new(dir.path().join("missing")),
        &FixedFtp(250.0),
        &mut [],
    );
    assert!(result.is_err());
}
