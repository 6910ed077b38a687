//! Unit tests for interval detection.

use ridetype::metrics::analytics::{IntervalDetector, IntervalSettings};
use ridetype::metrics::zones::{PowerZone, PowerZones};

const FTP: f64 = 250.0;

/// 1 Hz ride at `base` watts with `(start_sec, len_sec, watts)` efforts.
fn create_test_ride(total_secs: usize, base: f64, efforts: &[(usize, usize, f64)]) -> (Vec<f64>, Vec<f64>) {
    let mut power = vec![base; total_secs];
    for &(start, len, watts) in efforts {
        for p in &mut power[start..start + len] {
            *p = watts;
        }
    }
    let time = (0..total_secs).map(|t| t as f64).collect();
    (power, time)
}

#[test]
fn test_detected_intervals_pass_every_filter() {
    let zones = PowerZones::from_ftp(FTP).unwrap();
    let detector = IntervalDetector::new(&zones);
    let settings = IntervalSettings::default();

    let rides = [
        create_test_ride(3600, 150.0, &[(600, 300, 260.0), (1500, 90, 320.0), (2400, 600, 210.0)]),
        create_test_ride(3600, 100.0, &[(100, 200, 400.0), (330, 200, 400.0)]),
        create_test_ride(1800, 195.0, &[(300, 150, 240.0)]),
    ];

    for (power, time) in &rides {
        for interval in detector.detect(power, time) {
            assert!(interval.duration > settings.min_duration_secs);
            assert!(interval.avg_power > zones.tempo_min());
            assert!(interval.percent_above_threshold > settings.min_percent_above);
            assert!(interval.peak_power >= interval.avg_power);
        }
    }
}

#[test]
fn test_three_minute_efforts_detected_in_vo2max() {
    let zones = PowerZones::from_ftp(FTP).unwrap();
    let (power, time) = create_test_ride(
        10800,
        150.0,
        &[(1800, 180, 300.0), (3600, 180, 300.0), (5400, 180, 300.0), (7200, 180, 300.0)],
    );

    let intervals = IntervalDetector::new(&zones).detect(&power, &time);

    assert_eq!(intervals.len(), 4);
    for interval in &intervals {
        assert_eq!(interval.zone, PowerZone::Vo2max);
        assert!(interval.duration > 180.0 && interval.duration < 200.0);
        assert_eq!(interval.peak_power, 300.0);
    }
}

#[test]
fn test_short_effort_needs_lower_minimum() {
    let zones = PowerZones::from_ftp(FTP).unwrap();
    let (power, time) = create_test_ride(1800, 150.0, &[(600, 90, 300.0)]);

    assert!(IntervalDetector::new(&zones).detect(&power, &time).is_empty());

    let settings = IntervalSettings {
        min_duration_secs: 60.0,
        ..Default::default()
    };
    let intervals = IntervalDetector::with_settings(&zones, settings).detect(&power, &time);
    assert_eq!(intervals.len(), 1);
}

#[test]
fn test_steady_ride_below_tempo_has_no_intervals() {
    let zones = PowerZones::from_ftp(FTP).unwrap();
    let (power, time) = create_test_ride(7200, 185.0, &[]);

    assert!(IntervalDetector::new(&zones).detect(&power, &time).is_empty());
}

#[test]
fn test_empty_series() {
    let zones = PowerZones::from_ftp(FTP).unwrap();
    assert!(IntervalDetector::new(&zones).detect(&[], &[]).is_empty());
}
