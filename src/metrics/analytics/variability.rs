//! Power variability.
//!
//! Zero and negative samples (coasting, sensor dropouts) are ignored by
//! both the mean and the coefficient of variation.

/// Mean of the positive samples, `None` if there are none.
pub fn positive_mean(power: &[f64]) -> Option<f64> {
    let (sum, count) = power
        .iter()
        .filter(|&&p| p > 0.0)
        .fold((0.0, 0usize), |(sum, count), &p| (sum + p, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Coefficient of variation (population standard deviation / mean) of the
/// positive samples.
///
/// Returns 0 when there are no positive samples; callers that need to treat
/// that case as an error check `positive_mean` first.
pub fn coefficient_of_variation(power: &[f64]) -> f64 {
    let Some(mean) = positive_mean(power) else {
        return 0.0;
    };

    let (sum_sq, count) = power
        .iter()
        .filter(|&&p| p > 0.0)
        .fold((0.0, 0usize), |(sum_sq, count), &p| {
            (sum_sq + (p - mean).powi(2), count + 1)
        });

    let variance = sum_sq / count as f64;
    variance.sqrt() / mean
}
