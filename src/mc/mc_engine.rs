// src/mc/mc_engine.rs
use super::config::{PhoenixEngineConfig, StepSpec};
use super::path_generator::PathGenerator;
use super::phoenix_pricer::{ContinuityCorrectedPricer, PhoenixPathPricer};
use super::simulation::MonteCarloModel;
use super::statistics::Accumulator;
use super::time_grid::TimeGrid;
use crate::error::{PhoenixError, PhoenixResult};
use crate::instruments::{ExerciseType, PhoenixArguments, PhoenixTerms};
use crate::math_utils::Timer;
use crate::models::{BlackScholesProcess, DiscountCurve, StochasticProcess};
use crate::rng::PseudoRandomUniform;
use std::sync::Arc;
use tracing::{debug, info};

/// Published outcome of one pricing call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhoenixResults {
    pub value: f64,
    /// Standard error of `value`; absent for low-discrepancy drivers
    pub error_estimate: Option<f64>,
    pub samples: usize,
    /// False when an adaptive run stopped at its maximum sample count
    pub converged: bool,
}

/// Monte Carlo engine for European Phoenix options
///
/// # Pricing run
///
/// 1. Validate the contract and reject non-European exercise.
/// 2. Build the time grid from the residual time `T` to the last exercise
///    date and the discount schedule `D_i = P(0, t_i)` on its nodes.
/// 3. Seed the Gaussian driver from the configured seed and the
///    continuity-correction uniforms (one per grid interval) once.
/// 4. Loop path → pricer → accumulator until the sampling plan is met.
///
/// The engine holds no per-run state; every `calculate` starts from fresh
/// generators and an empty accumulator, so equal inputs give bit-identical
/// results.
#[derive(Clone)]
pub struct McPhoenixEngine {
    process: Arc<dyn StochasticProcess>,
    curve: Arc<dyn DiscountCurve>,
    config: PhoenixEngineConfig,
}

impl McPhoenixEngine {
    pub fn new(
        process: Arc<dyn StochasticProcess>,
        curve: Arc<dyn DiscountCurve>,
        config: PhoenixEngineConfig,
    ) -> Self {
        McPhoenixEngine {
            process,
            curve,
            config,
        }
    }

    /// Engine discounting on the process's own risk-free curve
    pub fn black_scholes(process: BlackScholesProcess, config: PhoenixEngineConfig) -> Self {
        let curve = Arc::new(*process.risk_free_rate());
        Self::new(Arc::new(process), curve, config)
    }

    pub fn config(&self) -> &PhoenixEngineConfig {
        &self.config
    }

    /// Simulation grid from today to the last exercise date
    pub fn time_grid(&self, arguments: &PhoenixArguments) -> PhoenixResult<TimeGrid> {
        self.grid_for(&arguments.checked()?)
    }

    fn grid_for(&self, terms: &PhoenixTerms) -> PhoenixResult<TimeGrid> {
        let last_date = terms
            .exercise
            .last_date()
            .ok_or_else(|| PhoenixError::validation("exercise", "empty exercise schedule"))?;
        let residual_time = self.process.time(last_date);
        match self.config.step_spec() {
            StepSpec::Steps(steps) => TimeGrid::new(residual_time, steps),
            StepSpec::StepsPerYear(steps) => TimeGrid::from_steps_per_year(residual_time, steps),
        }
    }

    /// Continuity-correction uniforms, one draw per grid interval
    fn continuity_sequence(&self, grid: &TimeGrid) -> PseudoRandomUniform {
        PseudoRandomUniform::new(grid.steps(), self.config.continuity_seed_value())
    }

    pub fn calculate(&self, arguments: &PhoenixArguments) -> PhoenixResult<PhoenixResults> {
        let timer = Timer::new();
        let terms = arguments.checked()?;
        if terms.exercise.exercise_type() != ExerciseType::European {
            return Err(PhoenixError::UnsupportedExercise {
                exercise: terms.exercise.exercise_type().to_string(),
            });
        }
        let spot = self.process.x0();
        if !(spot > 0.0) {
            return Err(PhoenixError::validation(
                "underlying",
                "negative or null underlying given",
            ));
        }

        let grid = self.grid_for(&terms)?;
        let discounts: Vec<f64> = grid.times().iter().map(|&t| self.curve.discount(t)).collect();
        debug!(
            steps = grid.steps(),
            maturity = grid.last(),
            final_discount = ?discounts.last(),
            "time grid and discount schedule built"
        );

        let steps = grid.steps();
        let uniforms = self.continuity_sequence(&grid);
        let policy = self.config.random_policy();
        let generator = PathGenerator::new(
            Arc::clone(&self.process),
            grid,
            policy.gaussian_generator(steps, self.config.seed()),
            self.config.brownian_bridge(),
        )?;
        let pricer = PhoenixPathPricer::new(
            terms.barrier,
            &terms.payoff,
            discounts,
            Arc::clone(&self.process),
            self.config.knock_policy(),
        )?;

        let mut model: MonteCarloModel<_, _> = MonteCarloModel::new(
            generator,
            ContinuityCorrectedPricer::new(pricer, uniforms),
            self.config.antithetic_variate(),
        );
        let outcome = model.run(&self.config.sampling_plan(), self.config.biased())?;

        let stats = model.sample_accumulator();
        let value = stats.mean();
        if !value.is_finite() {
            return Err(PhoenixError::NumericalInstability {
                method: "Monte Carlo phoenix engine".to_string(),
                reason: format!("non-finite estimate {} after {} samples", value, outcome.samples),
            });
        }
        let error_estimate = if policy.allows_error_estimate() {
            stats.error_estimate()
        } else {
            None
        };

        info!(
            value,
            error_estimate = ?error_estimate,
            samples = outcome.samples,
            converged = outcome.converged,
            elapsed_ms = timer.elapsed_ms(),
            "phoenix option priced"
        );

        Ok(PhoenixResults {
            value,
            error_estimate,
            samples: outcome.samples,
            converged: outcome.converged,
        })
    }
}
