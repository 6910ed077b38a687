//! Unit tests for the FTP zone model.

use ridetype::metrics::zones::{PowerZone, PowerZones};

const FTPS: [f64; 6] = [100.0, 180.0, 200.0, 250.0, 287.0, 400.0];

#[test]
fn test_zone_boundaries_strictly_increasing() {
    for ftp in FTPS {
        let zones = PowerZones::from_ftp(ftp).unwrap();
        let ranges = zones.all_zones();

        for range in ranges {
            assert!(range.min_watts < range.ceiling(), "ftp {ftp}: {range:?}");
        }
        for pair in ranges.windows(2) {
            assert!(pair[0].min_watts < pair[1].min_watts, "ftp {ftp}");
            assert!(pair[0].ceiling() < pair[1].min_watts, "ftp {ftp}");
        }
    }
}

#[test]
fn test_zone_for_is_monotone() {
    for ftp in FTPS {
        let zones = PowerZones::from_ftp(ftp).unwrap();
        let mut previous = PowerZone::Recovery;

        for step in 0..=(ftp as usize * 4) {
            let power = step as f64 * 0.5;
            let zone = zones.zone_for(power);
            assert!(
                zone.number() >= previous.number(),
                "ftp {ftp}: {power} W went from {previous} to {zone}"
            );
            previous = zone;
        }
        assert_eq!(previous, PowerZone::Anaerobic);
    }
}

#[test]
fn test_zone_for_lands_at_or_above_zone_minimum() {
    let zones = PowerZones::from_ftp(250.0).unwrap();

    for step in 0..1000 {
        let power = step as f64 * 0.7;
        let zone = zones.zone_for(power);
        assert!(power >= zones.range(zone).min_watts);
    }
}

#[test]
fn test_zone_lookup_at_ftp_250() {
    let zones = PowerZones::from_ftp(250.0).unwrap();

    assert_eq!(zones.zone_for(100.0), PowerZone::Recovery);
    assert_eq!(zones.zone_for(150.0), PowerZone::Endurance);
    assert_eq!(zones.zone_for(200.0), PowerZone::Tempo);
    assert_eq!(zones.zone_for(250.0), PowerZone::Threshold);
    assert_eq!(zones.zone_for(290.0), PowerZone::Vo2max);
    assert_eq!(zones.zone_for(400.0), PowerZone::Anaerobic);
}

#[test]
fn test_invalid_ftp_rejected() {
    assert!(PowerZones::from_ftp(0.0).is_err());
    assert!(PowerZones::from_ftp(-200.0).is_err());
    assert!(PowerZones::from_ftp(f64::NAN).is_err());
    assert!(PowerZones::from_ftp(f64::INFINITY).is_err());
}

#[test]
fn test_zone_labels() {
    assert_eq!(PowerZone::Tempo.label(), "Zone 3 (Tempo)");
    assert_eq!(PowerZone::Vo2max.label(), "Zone 5 (VO2max)");
    assert_eq!(PowerZone::Anaerobic.short_label(), "Zone 6");
    assert_eq!(PowerZone::ALL.len(), 6);
}
