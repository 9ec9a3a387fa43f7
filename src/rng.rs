// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design
//!
//! Two independent random drivers feed a pricing run:
//! 1. **Gaussian sequences** drive the path generator, one standard normal
//!    variate per time step. Either pseudo-random or low-discrepancy.
//! 2. **Uniform sequences** drive the barrier continuity correction, one
//!    uniform draw per time step, always pseudo-random.
//!
//! Both are seeded exactly once when a pricing run starts and then consumed
//! in order, so the same seed and configuration reproduce the same result
//! bit for bit.
//!
//! # Low-discrepancy points
//!
//! The Halton sequence uses the first `d` primes as radical-inverse bases:
//! ```text
//! h_b(i) = Σ_k a_k(i) b^{-(k+1)}   where i = Σ_k a_k(i) b^k
//! ```
//! Points are mapped to normals through Φ⁻¹. Quasi-random points carry no
//! sampling error estimate, which is why the policy reports it.

use crate::math_utils::norm_inv_cdf;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Splitmix64 mixing of a base seed and a stream index
///
/// ```text
/// z = base_seed + stream + 1
/// z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
/// z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
/// output = z ⊕ (z >> 31)
/// ```
pub fn derive_seed(base_seed: u64, stream: u64) -> u64 {
    let mut z = base_seed.wrapping_add(stream).wrapping_add(1);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
    z ^ (z >> 31)
}

/// Source of standard normal vectors, one variate per time step
pub trait GaussianSequenceGenerator {
    fn dimension(&self) -> usize;
    fn next_sequence(&mut self) -> &[f64];
}

/// Source of uniform vectors in (0, 1), one draw per time step
pub trait UniformSequenceGenerator {
    fn dimension(&self) -> usize;
    fn next_sequence(&mut self) -> &[f64];
}

/// Seeded pseudo-random normals (Ziggurat sampling through `rand_distr`)
#[derive(Debug, Clone)]
pub struct PseudoRandomGaussian {
    rng: StdRng,
    buffer: Vec<f64>,
}

impl PseudoRandomGaussian {
    pub fn new(dimension: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            buffer: vec![0.0; dimension],
        }
    }
}

impl GaussianSequenceGenerator for PseudoRandomGaussian {
    fn dimension(&self) -> usize {
        self.buffer.len()
    }

    fn next_sequence(&mut self) -> &[f64] {
        for z in self.buffer.iter_mut() {
            *z = StandardNormal.sample(&mut self.rng);
        }
        &self.buffer
    }
}

/// Halton low-discrepancy normals
#[derive(Debug, Clone)]
pub struct HaltonGaussian {
    bases: Vec<u64>,
    index: u64,
    buffer: Vec<f64>,
}

impl HaltonGaussian {
    pub fn new(dimension: usize) -> Self {
        Self {
            bases: first_primes(dimension),
            index: 0,
            buffer: vec![0.0; dimension],
        }
    }

    /// Radical inverse of `index` in the given base.
    fn halton(index: u64, base: u64) -> f64 {
        let mut result = 0.0;
        let mut f = 1.0 / base as f64;
        let mut i = index;
        while i > 0 {
            result += f * (i % base) as f64;
            i /= base;
            f /= base as f64;
        }
        result
    }
}

impl GaussianSequenceGenerator for HaltonGaussian {
    fn dimension(&self) -> usize {
        self.buffer.len()
    }

    fn next_sequence(&mut self) -> &[f64] {
        // index 0 maps every coordinate to 0, which has no finite quantile
        self.index += 1;
        for (z, &base) in self.buffer.iter_mut().zip(self.bases.iter()) {
            *z = norm_inv_cdf(Self::halton(self.index, base));
        }
        &self.buffer
    }
}

/// Seeded pseudo-random uniforms on the open interval (0, 1)
#[derive(Debug, Clone)]
pub struct PseudoRandomUniform {
    rng: StdRng,
    buffer: Vec<f64>,
}

impl PseudoRandomUniform {
    pub fn new(dimension: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            buffer: vec![0.0; dimension],
        }
    }
}

impl UniformSequenceGenerator for PseudoRandomUniform {
    fn dimension(&self) -> usize {
        self.buffer.len()
    }

    fn next_sequence(&mut self) -> &[f64] {
        for u in self.buffer.iter_mut() {
            *u = self.rng.sample(Open01);
        }
        &self.buffer
    }
}

/// Choice of Gaussian driver for the path generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomPolicy {
    #[default]
    PseudoRandom,
    LowDiscrepancy,
}

impl RandomPolicy {
    /// Whether the driver supports a statistical error estimate
    pub fn allows_error_estimate(&self) -> bool {
        matches!(self, RandomPolicy::PseudoRandom)
    }

    pub fn gaussian_generator(
        &self,
        dimension: usize,
        seed: u64,
    ) -> Box<dyn GaussianSequenceGenerator> {
        match self {
            RandomPolicy::PseudoRandom => Box::new(PseudoRandomGaussian::new(dimension, seed)),
            RandomPolicy::LowDiscrepancy => Box::new(HaltonGaussian::new(dimension)),
        }
    }
}

/// The first `n` prime numbers, by trial division
fn first_primes(n: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(n);
    let mut candidate = 2u64;
    while primes.len() < n {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_reproducibility() {
        let mut g1 = PseudoRandomGaussian::new(16, 42);
        let mut g2 = PseudoRandomGaussian::new(16, 42);

        for _ in 0..50 {
            assert_eq!(g1.next_sequence().to_vec(), g2.next_sequence().to_vec());
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut gen = PseudoRandomGaussian::new(10, 7);
        let samples: Vec<f64> = (0..2_000)
            .flat_map(|_| gen.next_sequence().to_vec())
            .collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "Mean should be close to 0, got {}", mean);
        assert!((variance - 1.0).abs() < 0.05, "Variance should be close to 1, got {}", variance);
    }

    #[test]
    fn test_uniform_draws_in_open_interval() {
        let mut gen = PseudoRandomUniform::new(8, 5);
        assert_eq!(gen.dimension(), 8);
        for _ in 0..1_000 {
            assert!(gen.next_sequence().iter().all(|&u| u > 0.0 && u < 1.0));
        }
    }

    #[test]
    fn test_halton_first_points() {
        assert_eq!(HaltonGaussian::halton(1, 2), 0.5);
        assert_eq!(HaltonGaussian::halton(2, 2), 0.25);
        assert_eq!(HaltonGaussian::halton(3, 2), 0.75);
        assert!((HaltonGaussian::halton(1, 3) - 1.0 / 3.0).abs() < 1e-15);

        // median of the first coordinate maps to zero
        let mut gen = HaltonGaussian::new(3);
        let first = gen.next_sequence().to_vec();
        assert!(first[0].abs() < 1e-12);
        assert!(first.iter().all(|z| z.is_finite()));
    }

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(8), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert!(first_primes(0).is_empty());
    }

    #[test]
    fn test_derived_seeds_differ_per_stream() {
        assert_eq!(derive_seed(42, 1), derive_seed(42, 1));
        assert_ne!(derive_seed(42, 1), derive_seed(42, 2));
        assert_ne!(derive_seed(42, 1), derive_seed(43, 1));
    }

    #[test]
    fn test_error_estimate_policy() {
        assert!(RandomPolicy::PseudoRandom.allows_error_estimate());
        assert!(!RandomPolicy::LowDiscrepancy.allows_error_estimate());
        assert_eq!(RandomPolicy::LowDiscrepancy.gaussian_generator(4, 0).dimension(), 4);
    }
}
