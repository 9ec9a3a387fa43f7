// src/mc/config.rs
//! Engine configuration
//!
//! `PhoenixEngineConfig` is immutable and only comes out of
//! `PhoenixEngineConfigBuilder::build`, which validates everything once.
//! The serde form of the config is the builder form, so a deserialized
//! config goes through the same checks.

use super::phoenix_pricer::KnockPolicy;
use super::simulation::SamplingPlan;
use crate::error::{PhoenixError, PhoenixResult};
use crate::rng::{derive_seed, RandomPolicy};
use serde::{Deserialize, Serialize};

/// Stream index of the continuity-correction sequence under `ContinuitySeed::Derived`
const CONTINUITY_STREAM: u64 = 1;

/// How the time grid is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSpec {
    Steps(usize),
    StepsPerYear(usize),
}

/// Seed of the continuity-correction uniforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuitySeed {
    /// Same draws whatever the configured seed
    Fixed(u64),
    /// Mixed from the configured seed
    Derived,
}

impl Default for ContinuitySeed {
    fn default() -> Self {
        ContinuitySeed::Fixed(5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "PhoenixEngineConfigBuilder",
    into = "PhoenixEngineConfigBuilder"
)]
pub struct PhoenixEngineConfig {
    step_spec: StepSpec,
    brownian_bridge: bool,
    antithetic_variate: bool,
    sampling: SamplingPlan,
    biased: bool,
    seed: u64,
    random_policy: RandomPolicy,
    knock_policy: KnockPolicy,
    continuity_seed: ContinuitySeed,
}

impl PhoenixEngineConfig {
    pub fn builder() -> PhoenixEngineConfigBuilder {
        PhoenixEngineConfigBuilder::default()
    }

    pub fn step_spec(&self) -> StepSpec {
        self.step_spec
    }

    pub fn brownian_bridge(&self) -> bool {
        self.brownian_bridge
    }

    pub fn antithetic_variate(&self) -> bool {
        self.antithetic_variate
    }

    pub fn sampling_plan(&self) -> SamplingPlan {
        self.sampling
    }

    pub fn biased(&self) -> bool {
        self.biased
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_policy(&self) -> RandomPolicy {
        self.random_policy
    }

    pub fn knock_policy(&self) -> KnockPolicy {
        self.knock_policy
    }

    pub fn continuity_seed(&self) -> ContinuitySeed {
        self.continuity_seed
    }

    /// Seed handed to the continuity-correction uniform sequence
    pub fn continuity_seed_value(&self) -> u64 {
        match self.continuity_seed {
            ContinuitySeed::Fixed(seed) => seed,
            ContinuitySeed::Derived => derive_seed(self.seed, CONTINUITY_STREAM),
        }
    }
}

/// Accumulates engine settings; `build` reports the first problem found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoenixEngineConfigBuilder {
    steps: Option<usize>,
    steps_per_year: Option<usize>,
    brownian_bridge: bool,
    antithetic_variate: bool,
    samples: Option<usize>,
    tolerance: Option<f64>,
    max_samples: Option<usize>,
    biased: bool,
    seed: u64,
    random_policy: RandomPolicy,
    knock_policy: KnockPolicy,
    continuity_seed: ContinuitySeed,
    #[serde(skip)]
    conflict: Option<PhoenixError>,
}

impl PhoenixEngineConfigBuilder {
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn steps_per_year(mut self, steps: usize) -> Self {
        self.steps_per_year = Some(steps);
        self
    }

    pub fn brownian_bridge(mut self, enabled: bool) -> Self {
        self.brownian_bridge = enabled;
        self
    }

    pub fn antithetic_variate(mut self, enabled: bool) -> Self {
        self.antithetic_variate = enabled;
        self
    }

    pub fn samples(mut self, samples: usize) -> Self {
        if self.tolerance.is_some() {
            self.record_conflict("samples", "tolerance already set");
        }
        self.samples = Some(samples);
        self
    }

    pub fn absolute_tolerance(mut self, tolerance: f64) -> Self {
        if self.samples.is_some() {
            self.record_conflict("tolerance", "number of samples already set");
        }
        self.tolerance = Some(tolerance);
        self
    }

    pub fn max_samples(mut self, samples: usize) -> Self {
        self.max_samples = Some(samples);
        self
    }

    pub fn bias(mut self, biased: bool) -> Self {
        self.biased = biased;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn random_policy(mut self, policy: RandomPolicy) -> Self {
        self.random_policy = policy;
        self
    }

    pub fn knock_policy(mut self, policy: KnockPolicy) -> Self {
        self.knock_policy = policy;
        self
    }

    pub fn continuity_seed(mut self, seed: ContinuitySeed) -> Self {
        self.continuity_seed = seed;
        self
    }

    fn record_conflict(&mut self, field: &str, reason: &str) {
        if self.conflict.is_none() {
            self.conflict = Some(PhoenixError::configuration(field, reason));
        }
    }

    pub fn build(self) -> PhoenixResult<PhoenixEngineConfig> {
        if let Some(conflict) = self.conflict {
            return Err(conflict);
        }

        let step_spec = match (self.steps, self.steps_per_year) {
            (None, None) => {
                return Err(PhoenixError::configuration(
                    "steps",
                    "number of steps not given",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(PhoenixError::configuration(
                    "steps",
                    "number of steps overspecified",
                ))
            }
            (Some(0), None) | (None, Some(0)) => {
                return Err(PhoenixError::configuration(
                    "steps",
                    "number of steps must be positive",
                ))
            }
            (Some(steps), None) => StepSpec::Steps(steps),
            (None, Some(steps)) => StepSpec::StepsPerYear(steps),
        };

        let sampling = match (self.samples, self.tolerance) {
            (None, None) => {
                return Err(PhoenixError::configuration(
                    "samples",
                    "neither number of samples nor tolerance given",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(PhoenixError::configuration(
                    "samples",
                    "both number of samples and tolerance given",
                ))
            }
            (Some(samples), None) => {
                if samples == 0 {
                    return Err(PhoenixError::configuration(
                        "samples",
                        "number of samples must be positive",
                    ));
                }
                SamplingPlan::Fixed { samples }
            }
            (None, Some(tolerance)) => {
                if !(tolerance > 0.0 && tolerance.is_finite()) {
                    return Err(PhoenixError::configuration(
                        "tolerance",
                        format!("tolerance must be positive and finite, got {}", tolerance),
                    ));
                }
                SamplingPlan::Adaptive {
                    tolerance,
                    max_samples: self.max_samples,
                }
            }
        };
        if self.max_samples == Some(0) {
            return Err(PhoenixError::configuration(
                "max_samples",
                "maximum number of samples must be positive",
            ));
        }

        if matches!(sampling, SamplingPlan::Adaptive { .. })
            && !self.random_policy.allows_error_estimate()
        {
            return Err(PhoenixError::configuration(
                "tolerance",
                "chosen random generator policy does not allow an error estimate",
            ));
        }

        Ok(PhoenixEngineConfig {
            step_spec,
            brownian_bridge: self.brownian_bridge,
            antithetic_variate: self.antithetic_variate,
            sampling,
            biased: self.biased,
            seed: self.seed,
            random_policy: self.random_policy,
            knock_policy: self.knock_policy,
            continuity_seed: self.continuity_seed,
        })
    }
}

impl TryFrom<PhoenixEngineConfigBuilder> for PhoenixEngineConfig {
    type Error = PhoenixError;

    fn try_from(builder: PhoenixEngineConfigBuilder) -> PhoenixResult<Self> {
        builder.build()
    }
}

impl From<PhoenixEngineConfig> for PhoenixEngineConfigBuilder {
    fn from(config: PhoenixEngineConfig) -> Self {
        let (steps, steps_per_year) = match config.step_spec {
            StepSpec::Steps(n) => (Some(n), None),
            StepSpec::StepsPerYear(n) => (None, Some(n)),
        };
        let (samples, tolerance, max_samples) = match config.sampling {
            SamplingPlan::Fixed { samples } => (Some(samples), None, None),
            SamplingPlan::Adaptive {
                tolerance,
                max_samples,
            } => (None, Some(tolerance), max_samples),
        };
        PhoenixEngineConfigBuilder {
            steps,
            steps_per_year,
            brownian_bridge: config.brownian_bridge,
            antithetic_variate: config.antithetic_variate,
            samples,
            tolerance,
            max_samples,
            biased: config.biased,
            seed: config.seed,
            random_policy: config.random_policy,
            knock_policy: config.knock_policy,
            continuity_seed: config.continuity_seed,
            conflict: None,
        }
    }
}
