//! Power smoothing for interval detection.
//!
//! A centered moving average with no edge padding: near both ends of the
//! series the window is clipped, so fewer samples contribute to the mean.

/// Default window size in samples.
pub const DEFAULT_WINDOW: usize = 30;

/// Centered moving average over a whole power series.
#[derive(Debug, Clone, Copy)]
pub struct CenteredAverage {
    /// Window size in samples
    window_size: usize,
}

impl CenteredAverage {
    /// Create a smoother with the given window size.
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Create a 30-sample smoother (the interval detection default).
    pub fn thirty_second() -> Self {
        Self::new(DEFAULT_WINDOW)
    }

    /// Smooth a power series.
    ///
    /// Output `i` is the mean of `power[max(0, i - W/2) .. min(n, i + W/2)]`.
    /// The half-open upper bound makes the window asymmetric: it covers
    /// `W/2` samples before `i` but only `W/2 - 1` after it. A window that
    /// would be empty (W < 2) falls back to the sample itself.
    pub fn smooth(&self, power: &[f64]) -> Vec<f64> {
        let n = power.len();
        let half = self.window_size / 2;

        // prefix[k] = sum of power[..k]
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0.0);
        let mut running = 0.0;
        for &p in power {
            running += p;
            prefix.push(running);
        }

        (0..n)
            .map(|i| {
                let start = i.saturating_sub(half);
                let end = (i + half).min(n).max(start + 1);
                (prefix[end] - prefix[start]) / (end - start) as f64
            })
            .collect()
    }
}

impl Default for CenteredAverage {
    fn default() -> Self {
        Self::thirty_second()
    }
}
