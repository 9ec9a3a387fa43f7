// src/mc/simulation.rs
//! Sampling Driver
//!
//! The loop is a producer feeding a reducer:
//! ```text
//! PathSource::next ─▶ PathPricer::price ─▶ Accumulator::add
//! ```
//! Only this module decides how many samples are drawn. Two plans exist:
//!
//! - **Fixed**: exactly `samples` draws.
//! - **Adaptive**: a first batch of `min(1023, max)` draws, then batches
//!   sized from the current error until `error ≤ tolerance` or the maximum
//!   is reached. The next batch follows the `1/√n` decay of the error:
//!   ```text
//!   next = max(n · (err / tol)² · 0.8 − n, 1023),  capped at max − n
//!   ```
//!
//! With antithetic variates each sample is the average of the payoff on a
//! path and on its mirror, so the pair counts as one sample.

use super::path::Path;
use super::statistics::{Accumulator, SampleAccumulator};
use crate::error::PhoenixResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Minimum size of an adaptive batch
pub const MIN_ADAPTIVE_SAMPLES: usize = 1023;

/// Producer side of the sampling loop
pub trait PathSource {
    fn next(&mut self) -> PhoenixResult<Path>;
    /// Mirror of the most recent `next` path
    fn antithetic(&mut self) -> PhoenixResult<Path>;
}

pub trait PathPricer {
    fn price(&mut self, path: &Path) -> PhoenixResult<f64>;
}

/// How many samples a run draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SamplingPlan {
    Fixed {
        samples: usize,
    },
    Adaptive {
        tolerance: f64,
        max_samples: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingOutcome {
    pub samples: usize,
    /// False only when an adaptive run stopped at its maximum
    pub converged: bool,
}

pub struct MonteCarloModel<S, P, A = SampleAccumulator> {
    source: S,
    pricer: P,
    accumulator: A,
    antithetic: bool,
}

impl<S, P, A> MonteCarloModel<S, P, A>
where
    S: PathSource,
    P: PathPricer,
    A: Accumulator + Default,
{
    pub fn new(source: S, pricer: P, antithetic: bool) -> Self {
        Self::with_accumulator(source, pricer, A::default(), antithetic)
    }
}

impl<S, P, A> MonteCarloModel<S, P, A>
where
    S: PathSource,
    P: PathPricer,
    A: Accumulator,
{
    pub fn with_accumulator(source: S, pricer: P, mut accumulator: A, antithetic: bool) -> Self {
        accumulator.reset();
        MonteCarloModel {
            source,
            pricer,
            accumulator,
            antithetic,
        }
    }

    pub fn sample_accumulator(&self) -> &A {
        &self.accumulator
    }

    /// Draw, price and accumulate `samples` more samples
    ///
    /// Any failure aborts the whole batch; nothing is skipped.
    pub fn add_samples(&mut self, samples: usize) -> PhoenixResult<()> {
        for _ in 0..samples {
            let path = self.source.next()?;
            let mut value = self.pricer.price(&path)?;
            if self.antithetic {
                let mirror = self.source.antithetic()?;
                value = 0.5 * (value + self.pricer.price(&mirror)?);
            }
            self.accumulator.add(value);
        }
        Ok(())
    }

    pub fn run(&mut self, plan: &SamplingPlan, biased: bool) -> PhoenixResult<SamplingOutcome> {
        match *plan {
            SamplingPlan::Fixed { samples } => {
                let remaining = samples.saturating_sub(self.accumulator.samples());
                self.add_samples(remaining)?;
                Ok(SamplingOutcome {
                    samples: self.accumulator.samples(),
                    converged: true,
                })
            }
            SamplingPlan::Adaptive {
                tolerance,
                max_samples,
            } => self.run_to_tolerance(tolerance, max_samples.unwrap_or(usize::MAX), biased),
        }
    }

    fn run_to_tolerance(
        &mut self,
        tolerance: f64,
        max_samples: usize,
        biased: bool,
    ) -> PhoenixResult<SamplingOutcome> {
        let first_batch = MIN_ADAPTIVE_SAMPLES.min(max_samples);
        let drawn = self.accumulator.samples();
        if drawn < first_batch {
            self.add_samples(first_batch - drawn)?;
        }

        loop {
            let n = self.accumulator.samples();
            let error = self.accumulator.error_estimate();
            debug!(samples = n, error = ?error, tolerance, "adaptive batch finished");

            if let Some(err) = error {
                if err <= tolerance {
                    return Ok(SamplingOutcome {
                        samples: n,
                        converged: true,
                    });
                }
            }
            if n >= max_samples {
                if biased {
                    debug!(samples = n, error = ?error, tolerance, "maximum samples reached, tolerance not met");
                } else {
                    warn!(samples = n, error = ?error, tolerance, "maximum samples reached, tolerance not met");
                }
                return Ok(SamplingOutcome {
                    samples: n,
                    converged: false,
                });
            }

            let next = match error {
                Some(err) => {
                    let order = (err * err) / (tolerance * tolerance);
                    let wanted = n as f64 * order * 0.8 - n as f64;
                    wanted.max(MIN_ADAPTIVE_SAMPLES as f64) as usize
                }
                None => MIN_ADAPTIVE_SAMPLES,
            };
            self.add_samples(next.min(max_samples - n))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhoenixError;
    use crate::mc::time_grid::TimeGrid;
    use std::sync::Arc;

    /// Emits single-node paths whose value cycles through `values`.
    struct CyclingSource {
        grid: Arc<TimeGrid>,
        values: Vec<f64>,
        cursor: usize,
        drawn: usize,
        fail_at: Option<usize>,
    }

    impl CyclingSource {
        fn new(values: Vec<f64>) -> Self {
            CyclingSource {
                grid: Arc::new(TimeGrid::from_times(vec![0.0]).unwrap()),
                values,
                cursor: 0,
                drawn: 0,
                fail_at: None,
            }
        }
    }

    impl PathSource for CyclingSource {
        fn next(&mut self) -> PhoenixResult<Path> {
            if Some(self.drawn) == self.fail_at {
                return Err(PhoenixError::domain("generator exhausted"));
            }
            self.drawn += 1;
            let v = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            Path::new(Arc::clone(&self.grid), vec![v])
        }

        fn antithetic(&mut self) -> PhoenixResult<Path> {
            let v = self.values[(self.cursor - 1) % self.values.len()];
            Path::new(Arc::clone(&self.grid), vec![-v])
        }
    }

    struct Identity;

    impl PathPricer for Identity {
        fn price(&mut self, path: &Path) -> PhoenixResult<f64> {
            Ok(path.front())
        }
    }

    #[test]
    fn test_fixed_plan_draws_exactly() {
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(CyclingSource::new(vec![1.0, 3.0]), Identity, false);
        let outcome = model.run(&SamplingPlan::Fixed { samples: 10 }, false).unwrap();
        assert_eq!(outcome.samples, 10);
        assert!(outcome.converged);
        assert_eq!(model.sample_accumulator().mean(), 2.0);
    }

    #[test]
    fn test_antithetic_pairs_count_once() {
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(CyclingSource::new(vec![4.0, 8.0]), Identity, true);
        model.run(&SamplingPlan::Fixed { samples: 6 }, false).unwrap();
        let acc = model.sample_accumulator();
        assert_eq!(acc.samples(), 6);
        assert_eq!(acc.mean(), 0.0);
    }

    #[test]
    fn test_adaptive_stops_after_first_batch_when_exact() {
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(CyclingSource::new(vec![7.0]), Identity, false);
        let plan = SamplingPlan::Adaptive {
            tolerance: 1e-6,
            max_samples: None,
        };
        let outcome = model.run(&plan, false).unwrap();
        assert_eq!(outcome.samples, MIN_ADAPTIVE_SAMPLES);
        assert!(outcome.converged);
    }

    #[test]
    fn test_adaptive_respects_maximum() {
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(CyclingSource::new(vec![0.0, 100.0]), Identity, false);
        let plan = SamplingPlan::Adaptive {
            tolerance: 1e-3,
            max_samples: Some(5_000),
        };
        let outcome = model.run(&plan, false).unwrap();
        assert_eq!(outcome.samples, 5_000);
        assert!(!outcome.converged);
    }

    #[test]
    fn test_adaptive_maximum_below_first_batch() {
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(CyclingSource::new(vec![0.0, 1.0]), Identity, false);
        let plan = SamplingPlan::Adaptive {
            tolerance: 1e-9,
            max_samples: Some(10),
        };
        assert_eq!(model.run(&plan, true).unwrap().samples, 10);
    }

    #[test]
    fn test_adaptive_converges_between_batches() {
        // ±1 payoffs: error after n samples is about 1/√n
        let mut model: MonteCarloModel<_, _> =
            MonteCarloModel::new(CyclingSource::new(vec![-1.0, 1.0]), Identity, false);
        let plan = SamplingPlan::Adaptive {
            tolerance: 0.01,
            max_samples: Some(1_000_000),
        };
        let outcome = model.run(&plan, false).unwrap();
        assert!(outcome.converged);
        assert!(outcome.samples > MIN_ADAPTIVE_SAMPLES);
        assert!(model.sample_accumulator().error_estimate().unwrap() <= 0.01);
    }

    #[test]
    fn test_failure_aborts_the_run() {
        let mut source = CyclingSource::new(vec![1.0]);
        source.fail_at = Some(3);
        let mut model: MonteCarloModel<_, _> = MonteCarloModel::new(source, Identity, false);
        let result = model.run(&SamplingPlan::Fixed { samples: 10 }, false);
        assert!(matches!(result, Err(PhoenixError::Domain { .. })));
    }
}
