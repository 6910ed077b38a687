//! Unit tests for zone time, variability, smoothing and classification
//! invariants.

use ridetype::metrics::analytics::{
    coefficient_of_variation, positive_mean, AnalyticsError, RideClassifier, ZoneTimeAccumulator,
};
use ridetype::metrics::smoothing::CenteredAverage;
use ridetype::metrics::zones::{PowerZone, PowerZones};
use ridetype::recording::types::PowerSample;

/// Deterministic pseudo-random power in 0..600 W.
fn create_test_power(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 600) as f64
        })
        .collect()
}

#[test]
fn test_zone_time_sums_to_elapsed_plus_first_sample() {
    let zones = PowerZones::from_ftp(240.0).unwrap();
    let accumulator = ZoneTimeAccumulator::new(&zones);

    for seed in 1..6 {
        let power = create_test_power(500, seed);
        // Irregular sampling with a few pauses
        let mut time = Vec::with_capacity(power.len());
        let mut t = 12.0;
        for i in 0..power.len() {
            time.push(t);
            t += if i % 97 == 0 { 30.0 } else { 1.0 + (i % 3) as f64 };
        }

        let breakdown = accumulator.accumulate(&power, &time);
        let expected = 1.0 + (time[time.len() - 1] - time[0]);
        assert!((breakdown.total() - expected).abs() < 1e-6);

        let share_sum: f64 = PowerZone::ALL
            .iter()
            .map(|&zone| breakdown.share(&[zone]))
            .sum();
        assert!((share_sum - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_zone_time_all_in_one_bucket() {
    let zones = PowerZones::from_ftp(200.0).unwrap();
    let power = vec![100.0; 60];
    let time: Vec<f64> = (0..60).map(|t| t as f64).collect();

    let breakdown = ZoneTimeAccumulator::new(&zones).accumulate(&power, &time);

    assert_eq!(breakdown.get(PowerZone::Recovery), 60.0);
    assert_eq!(breakdown.share(&[PowerZone::Recovery]), 1.0);
    assert_eq!(breakdown.share(&[PowerZone::Tempo]), 0.0);
}

#[test]
fn test_variability_zero_for_constant_power() {
    for watts in [1.0, 95.0, 250.0, 1200.0] {
        assert_eq!(coefficient_of_variation(&vec![watts; 100]), 0.0);
    }
}

#[test]
fn test_variability_zero_without_positive_samples() {
    assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0]), 0.0);
    assert_eq!(coefficient_of_variation(&[]), 0.0);
    assert_eq!(positive_mean(&[0.0, -5.0]), None);
}

#[test]
fn test_variability_alternating_power() {
    let power: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 80.0 } else { 400.0 }).collect();
    // mean 240, population std 160
    assert!((coefficient_of_variation(&power) - 160.0 / 240.0).abs() < 1e-9);
}

#[test]
fn test_smoothing_keeps_length_and_constants() {
    let smoother = CenteredAverage::thirty_second();

    for n in [1, 2, 15, 31, 200] {
        let power = vec![210.0; n];
        let smoothed = smoother.smooth(&power);
        assert_eq!(smoothed.len(), n);
        assert!(smoothed.iter().all(|p| (p - 210.0).abs() < 1e-9));
    }
}

#[test]
fn test_smoothing_stays_within_input_range() {
    let power = create_test_power(300, 42);
    let min = power.iter().copied().fold(f64::INFINITY, f64::min);
    let max = power.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    for p in CenteredAverage::new(30).smooth(&power) {
        assert!(p >= min - 1e-9 && p <= max + 1e-9);
    }
}

#[test]
fn test_classification_is_idempotent() {
    let classifier = RideClassifier::new(230.0).unwrap();
    let samples: Vec<PowerSample> = create_test_power(3600, 7)
        .into_iter()
        .enumerate()
        .map(|(t, p)| PowerSample::new(t as f64, p))
        .collect();

    let first = classifier.classify(&samples).unwrap();
    let second = classifier.classify(&samples).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_classifier_rejects_bad_input() {
    let classifier = RideClassifier::new(250.0).unwrap();

    let single = [PowerSample::new(0.0, 200.0)];
    assert!(matches!(
        classifier.classify(&single),
        Err(AnalyticsError::InvalidInput(_))
    ));

    let zeros: Vec<PowerSample> = (0..100).map(|t| PowerSample::new(t as f64, 0.0)).collect();
    assert!(matches!(
        classifier.classify(&zeros),
        Err(AnalyticsError::DegenerateSeries(_))
    ));

    assert!(RideClassifier::new(-1.0).is_err());
}
