// src/mc/statistics.rs
//! Running Sample Statistics
//!
//! Welford's online update keeps the mean and the sum of squared deviations
//! without storing samples:
//! ```text
//! δ = x - mean_{n-1}
//! mean_n = mean_{n-1} + δ / n
//! M2_n = M2_{n-1} + δ (x - mean_n)
//! ```
//! The unbiased variance is `M2 / (n - 1)` and the Monte Carlo error
//! estimate of the mean is `sqrt(variance / n)`.

use crate::math_utils::norm_inv_cdf;

/// Reducer side of the sampling loop
pub trait Accumulator {
    fn add(&mut self, value: f64);
    fn samples(&self) -> usize;
    fn mean(&self) -> f64;
    /// Standard error of the mean; absent below two samples
    fn error_estimate(&self) -> Option<f64>;
    fn reset(&mut self);
}

#[derive(Debug, Clone)]
pub struct SampleAccumulator {
    samples: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for SampleAccumulator {
    fn default() -> Self {
        SampleAccumulator {
            samples: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variance(&self) -> Option<f64> {
        if self.samples < 2 {
            None
        } else {
            Some(self.m2 / (self.samples - 1) as f64)
        }
    }

    pub fn standard_deviation(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn min(&self) -> Option<f64> {
        (self.samples > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.samples > 0).then_some(self.max)
    }

    /// Two-sided normal confidence interval for the mean at `level`
    pub fn confidence_interval(&self, level: f64) -> Option<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return None;
        }
        let error = self.error_estimate()?;
        let z = norm_inv_cdf(0.5 + 0.5 * level);
        Some((self.mean - z * error, self.mean + z * error))
    }
}

impl Accumulator for SampleAccumulator {
    fn add(&mut self, value: f64) {
        self.samples += 1;
        let delta = value - self.mean;
        self.mean += delta / self.samples as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn samples(&self) -> usize {
        self.samples
    }

    fn mean(&self) -> f64 {
        if self.samples == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    fn error_estimate(&self) -> Option<f64> {
        self.variance()
            .map(|variance| (variance / self.samples as f64).sqrt())
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matches_two_pass_statistics() {
        let data = [3.0, 7.5, -1.25, 4.0, 10.0, 0.5];
        let mut acc = SampleAccumulator::new();
        for &x in &data {
            acc.add(x);
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert_eq!(acc.samples(), 6);
        assert_relative_eq!(acc.mean(), mean, epsilon = 1e-12);
        assert_relative_eq!(acc.variance().unwrap(), variance, epsilon = 1e-12);
        assert_relative_eq!(acc.error_estimate().unwrap(), (variance / n).sqrt(), epsilon = 1e-12);
        assert_eq!(acc.min(), Some(-1.25));
        assert_eq!(acc.max(), Some(10.0));
    }

    #[test]
    fn test_error_estimate_needs_two_samples() {
        let mut acc = SampleAccumulator::new();
        assert!(acc.mean().is_nan());
        acc.add(1.0);
        assert_eq!(acc.mean(), 1.0);
        assert!(acc.error_estimate().is_none());
        acc.add(1.0);
        assert_eq!(acc.error_estimate(), Some(0.0));
    }

    #[test]
    fn test_confidence_interval_is_symmetric() {
        let mut acc = SampleAccumulator::new();
        for x in [1.0, 2.0, 3.0, 4.0] {
            acc.add(x);
        }
        let (lo, hi) = acc.confidence_interval(0.95).unwrap();
        assert_relative_eq!(acc.mean() - lo, hi - acc.mean(), epsilon = 1e-12);
        assert!(acc.confidence_interval(1.0).is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut acc = SampleAccumulator::new();
        acc.add(5.0);
        acc.add(6.0);
        acc.reset();
        assert_eq!(acc.samples(), 0);
        assert!(acc.min().is_none());
    }
}
