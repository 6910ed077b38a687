//! Integration tests for building and querying the FTP history.

use chrono::{NaiveDate, NaiveDateTime};

use ridetype::batch::ThresholdPowerProvider;
use ridetype::metrics::analytics::FtpProgression;
use ridetype::recording::parse_training_log;
use ridetype::storage::{Database, FtpHistoryStore};

const LOG: &str = r#"{
    "ATHLETE": { "id": "rider-7" },
    "RIDES": [
        { "date": "2017/01/01 08:00:00 UTC", "METRICS": { "20m_critical_power": ["240", "1200"] } },
        { "date": "2017/01/20 08:00:00 UTC", "METRICS": { "20m_critical_power": "255" } },
        { "date": "2017/02/10 08:00:00 UTC", "METRICS": { "20m_critical_power": 230 } },
        { "date": "2017/08/01 08:00:00 UTC", "METRICS": { "20m_critical_power": 220 } }
    ]
}"#;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[test]
fn test_training_log_to_ftp_lookup() {
    let log = parse_training_log(LOG).unwrap();
    let records = FtpProgression::new().compute(&log.activities);

    // Rise, hold through a dip, then detraining after 90 quiet days
    let ftps: Vec<f64> = records.iter().map(|r| r.ftp).collect();
    assert_eq!(ftps, vec![240.0, 255.0, 255.0, 220.0]);

    let db = Database::open_in_memory().unwrap();
    let store = FtpHistoryStore::new(db.connection());
    store.save_records(&log.athlete_id, &records).unwrap();

    assert_eq!(store.ftp_at(at(2016, 12, 31, 8)).unwrap(), None);
    assert_eq!(store.ftp_at(at(2017, 1, 1, 8)).unwrap(), Some(240.0));
    assert_eq!(store.ftp_at(at(2017, 3, 1, 8)).unwrap(), Some(255.0));
    assert_eq!(store.ftp_at(at(2017, 6, 1, 8)).unwrap(), Some(255.0));
    assert_eq!(store.ftp_at(at(2017, 9, 1, 8)).unwrap(), Some(220.0));

    let history = store.load_history("rider-7").unwrap();
    assert_eq!(history, records);
}
