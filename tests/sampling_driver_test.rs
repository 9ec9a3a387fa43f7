// tests/sampling_driver_test.rs
use phoenix_mc::mc::simulation::{PathPricer, PathSource, MIN_ADAPTIVE_SAMPLES};
use phoenix_mc::mc::{Accumulator, MonteCarloModel, Path, SamplingPlan};
use phoenix_mc::PhoenixResult;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Two-node paths ending at a uniform draw in [0, scale)
struct UniformSource {
    rng: StdRng,
    scale: f64,
    last: f64,
}

impl UniformSource {
    fn new(seed: u64, scale: f64) -> Self {
        UniformSource {
            rng: StdRng::seed_from_u64(seed),
            scale,
            last: 0.0,
        }
    }
}

impl PathSource for UniformSource {
    fn next(&mut self) -> PhoenixResult<Path> {
        self.last = self.rng.gen::<f64>() * self.scale;
        Path::uniform(1.0, vec![0.0, self.last])
    }

    fn antithetic(&mut self) -> PhoenixResult<Path> {
        Path::uniform(1.0, vec![0.0, self.scale - self.last])
    }
}

struct Terminal;

impl PathPricer for Terminal {
    fn price(&mut self, path: &Path) -> PhoenixResult<f64> {
        Ok(path.back())
    }
}

#[test]
fn test_antithetic_uniform_pairs_have_no_variance() {
    let mut model: MonteCarloModel<_, _> =
        MonteCarloModel::new(UniformSource::new(1, 10.0), Terminal, true);
    model.run(&SamplingPlan::Fixed { samples: 500 }, false).unwrap();
    let acc = model.sample_accumulator();
    assert!((acc.mean() - 5.0).abs() < 1e-12);
    assert!(acc.error_estimate().unwrap() < 1e-12);
}

proptest! {
    #[test]
    fn prop_adaptive_never_exceeds_maximum(
        seed in 0u64..1_000,
        tolerance in 1e-4f64..0.5,
        max_samples in 1usize..6_000,
    ) {
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(UniformSource::new(seed, 1.0), Terminal, false);
        let plan = SamplingPlan::Adaptive { tolerance, max_samples: Some(max_samples) };
        let outcome = model.run(&plan, false).unwrap();

        prop_assert!(outcome.samples <= max_samples);
        prop_assert!(outcome.samples >= MIN_ADAPTIVE_SAMPLES.min(max_samples));
        prop_assert_eq!(outcome.samples, model.sample_accumulator().samples());
        if outcome.converged {
            prop_assert!(model.sample_accumulator().error_estimate().unwrap() <= tolerance);
        } else {
            prop_assert_eq!(outcome.samples, max_samples);
        }
    }
}
