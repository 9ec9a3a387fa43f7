// src/instruments/phoenix_option.rs
//! Phoenix Option Contract
//!
//! A double-barrier contract on one underlying. Over the life of the trade
//! the underlying is watched against an upper and a lower barrier:
//!
//! - never touched, or touched the upper barrier: pays
//!   `rebate × principal`, discounted from the knock node
//! - touched only the lower barrier: pays the terminal spread
//!   `S_T − S_0`
//!
//! The payoff field carries the option type and strike; only the plain
//! vanilla shape is priceable.

use super::exercise::{Exercise, ExerciseType};
use super::payoff::Payoff;
use crate::error::{validation::*, PhoenixError, PhoenixResult};
use crate::mc::config::PhoenixEngineConfig;
use crate::mc::mc_engine::{McPhoenixEngine, PhoenixResults};
use crate::models::BlackScholesProcess;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Barrier and rebate terms of a Phoenix contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarrierTerms {
    pub principal: f64,
    pub up_barrier: f64,
    pub down_barrier: f64,
    pub rebate: f64,
}

/// Contract data handed to a pricing engine
///
/// Fields are optional so that an incompletely set-up contract can be
/// detected by `validate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoenixArguments {
    pub principal: Option<f64>,
    pub up_barrier: Option<f64>,
    pub down_barrier: Option<f64>,
    pub rebate: Option<f64>,
    pub payoff: Option<Payoff>,
    pub exercise: Option<Exercise>,
}

/// Validated contract data
#[derive(Debug, Clone, PartialEq)]
pub struct PhoenixTerms {
    pub barrier: BarrierTerms,
    pub payoff: Payoff,
    pub exercise: Exercise,
}

impl PhoenixArguments {
    pub fn validate(&self) -> PhoenixResult<()> {
        self.checked().map(|_| ())
    }

    /// Validate and return the terms
    ///
    /// Missing fields are reported in the order principal, upbarrier,
    /// downbarrier, rebate, payoff, exercise.
    pub fn checked(&self) -> PhoenixResult<PhoenixTerms> {
        let principal = require_field("principal", &self.principal)?;
        let up_barrier = require_field("upbarrier", &self.up_barrier)?;
        let down_barrier = require_field("downbarrier", &self.down_barrier)?;
        let rebate = require_field("rebate", &self.rebate)?;
        let payoff = require_field("payoff", &self.payoff)?;
        let exercise = require_field("exercise", &self.exercise)?;

        validate_finite("principal", principal)?;
        validate_finite("upbarrier", up_barrier)?;
        validate_finite("downbarrier", down_barrier)?;
        validate_finite("rebate", rebate)?;
        validate_positive("upbarrier", up_barrier)?;
        validate_non_negative("strike", payoff.strike())?;
        if exercise.last_date().is_none() {
            return Err(PhoenixError::validation("exercise", "empty exercise schedule"));
        }

        Ok(PhoenixTerms {
            barrier: BarrierTerms {
                principal,
                up_barrier,
                down_barrier,
                rebate,
            },
            payoff,
            exercise,
        })
    }
}

/// Search settings for `PhoenixOption::implied_volatility`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolatilityParams {
    /// Width of the final volatility bracket
    pub accuracy: f64,
    pub max_evaluations: usize,
    pub min_vol: f64,
    pub max_vol: f64,
}

impl Default for ImpliedVolatilityParams {
    fn default() -> Self {
        ImpliedVolatilityParams {
            accuracy: 1.0e-4,
            max_evaluations: 100,
            min_vol: 1.0e-7,
            max_vol: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhoenixOption {
    pub barrier: BarrierTerms,
    pub payoff: Payoff,
    pub exercise: Exercise,
}

impl PhoenixOption {
    pub fn new(
        principal: f64,
        up_barrier: f64,
        down_barrier: f64,
        rebate: f64,
        payoff: Payoff,
        exercise: Exercise,
    ) -> Self {
        PhoenixOption {
            barrier: BarrierTerms {
                principal,
                up_barrier,
                down_barrier,
                rebate,
            },
            payoff,
            exercise,
        }
    }

    pub fn arguments(&self) -> PhoenixArguments {
        PhoenixArguments {
            principal: Some(self.barrier.principal),
            up_barrier: Some(self.barrier.up_barrier),
            down_barrier: Some(self.barrier.down_barrier),
            rebate: Some(self.barrier.rebate),
            payoff: Some(self.payoff),
            exercise: Some(self.exercise.clone()),
        }
    }

    pub fn price(&self, engine: &McPhoenixEngine) -> PhoenixResult<PhoenixResults> {
        engine.calculate(&self.arguments())
    }

    /// Volatility at which the Monte Carlo price matches `target_price`
    ///
    /// Every trial re-prices with the same configuration and seeds, so the
    /// price is a deterministic function of volatility. The root is
    /// bracketed by `[min_vol, max_vol]` and refined by bisection.
    pub fn implied_volatility(
        &self,
        target_price: f64,
        process: &BlackScholesProcess,
        config: &PhoenixEngineConfig,
        params: ImpliedVolatilityParams,
    ) -> PhoenixResult<f64> {
        if self.exercise.exercise_type() != ExerciseType::European {
            return Err(PhoenixError::UnsupportedExercise {
                exercise: self.exercise.exercise_type().to_string(),
            });
        }
        validate_finite("price", target_price)?;
        if !(params.min_vol >= 0.0 && params.min_vol < params.max_vol) {
            return Err(PhoenixError::configuration(
                "volatility_range",
                format!("invalid bracket [{}, {}]", params.min_vol, params.max_vol),
            ));
        }
        validate_positive("accuracy", params.accuracy)?;

        let arguments = self.arguments();
        let mut evaluations = 0usize;
        let mut objective = |vol: f64| -> PhoenixResult<f64> {
            evaluations += 1;
            if evaluations > params.max_evaluations {
                return Err(PhoenixError::NumericalInstability {
                    method: "implied volatility".to_string(),
                    reason: format!(
                        "maximum number of function evaluations ({}) exceeded",
                        params.max_evaluations
                    ),
                });
            }
            let engine = McPhoenixEngine::black_scholes(process.with_volatility(vol)?, config.clone());
            Ok(engine.calculate(&arguments)?.value - target_price)
        };

        let mut lo = params.min_vol;
        let mut hi = params.max_vol;
        let f_lo = objective(lo)?;
        let f_hi = objective(hi)?;
        if f_lo == 0.0 {
            return Ok(lo);
        }
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(PhoenixError::domain(format!(
                "target price {} not bracketed by volatilities [{}, {}]",
                target_price, lo, hi
            )));
        }

        let lo_sign = f_lo.signum();
        while hi - lo > params.accuracy {
            let mid = 0.5 * (lo + hi);
            let f_mid = objective(mid)?;
            debug!(vol = mid, residual = f_mid, "implied volatility trial");
            if f_mid == 0.0 {
                return Ok(mid);
            }
            if f_mid.signum() == lo_sign {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}
