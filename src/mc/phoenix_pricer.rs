// src/mc/phoenix_pricer.rs
//! Phoenix Path Pricer
//!
//! # Barrier scan with continuity correction
//!
//! A discretely sampled path can cross a barrier between two nodes without
//! either node being beyond it. For a log-normal bridge between `S_i` and
//! `S_{i+1}` over `Δt` with local volatility σ, the extreme of the log
//! return `x = ln(S_{i+1}/S_i)` has a closed-form distribution which inverts
//! to
//! ```text
//! y = ½ (x − √(x² − 2σ²Δt ln u)),   u ~ U(0, 1)
//! level = S_i · e^y
//! ```
//! One uniform draw per step gives one sampled intra-step level, which is
//! classified against the barriers:
//!
//! | level              | effect                                          |
//! |--------------------|-------------------------------------------------|
//! | `> up_barrier`     | up touched, knock node fixed, scan stops        |
//! | `≤ down_barrier`   | down touched, survival counter per `KnockPolicy`|
//! | otherwise          | survival counter advances                       |
//!
//! # Payoff
//!
//! ```text
//! down touched, up not touched  →  S_T − S_0
//! otherwise                     →  rebate · principal · D(knock node)
//! ```

use super::path::Path;
use super::simulation::PathPricer;
use crate::error::{PhoenixError, PhoenixResult};
use crate::instruments::{BarrierTerms, OptionType, Payoff};
use crate::models::StochasticProcess;
use crate::rng::UniformSequenceGenerator;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

bitflags! {
    /// Barriers touched during a scan
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KnockEvents: u8 {
        const DOWN = 1 << 0;
        const UP   = 1 << 1;
    }
}

/// What a down-touch does to the survival counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnockPolicy {
    /// Counter restarts at node 0
    #[default]
    ResetOnDownTouch,
    /// Down-touch steps count like any surviving step
    AccumulateThroughDownTouch,
}

/// Result of scanning one path against the barriers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierScan {
    pub events: KnockEvents,
    pub knock_node: Option<usize>,
    /// Number of intervals looked at before the scan ended
    pub steps_examined: usize,
}

/// Sampled intra-step level of the log-normal bridge from `start` to `end`
pub fn continuity_corrected_level(start: f64, end: f64, vol: f64, dt: f64, u: f64) -> f64 {
    let x = (end / start).ln();
    let y = 0.5 * (x - (x * x - 2.0 * vol * vol * dt * u.ln()).sqrt());
    start * y.exp()
}

/// Discounted Phoenix cash flow of one path
///
/// Pricing is a pure function of the path, the per-step uniform draws and
/// the terms fixed at construction.
#[derive(Clone)]
pub struct PhoenixPathPricer {
    terms: BarrierTerms,
    option_type: OptionType,
    strike: f64,
    discounts: Vec<f64>,
    process: Arc<dyn StochasticProcess>,
    policy: KnockPolicy,
}

impl PhoenixPathPricer {
    pub fn new(
        terms: BarrierTerms,
        payoff: &Payoff,
        discounts: Vec<f64>,
        process: Arc<dyn StochasticProcess>,
        policy: KnockPolicy,
    ) -> PhoenixResult<Self> {
        let (option_type, strike) = match *payoff {
            Payoff::PlainVanilla {
                option_type,
                strike,
            } => (option_type, strike),
            _ => {
                return Err(PhoenixError::configuration(
                    "payoff",
                    format!("non-plain payoff given ({})", payoff.name()),
                ))
            }
        };
        if !(strike >= 0.0) {
            return Err(PhoenixError::configuration(
                "strike",
                "strike less than zero not allowed",
            ));
        }
        if !(terms.up_barrier > 0.0) {
            return Err(PhoenixError::configuration(
                "upbarrier",
                "up barrier less or equal to zero not allowed",
            ));
        }
        Ok(PhoenixPathPricer {
            terms,
            option_type,
            strike,
            discounts,
            process,
            policy,
        })
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn terms(&self) -> &BarrierTerms {
        &self.terms
    }

    /// Walk the path pairwise until the up barrier is hit or nodes run out
    pub fn scan(&self, path: &Path, draws: &[f64]) -> PhoenixResult<BarrierScan> {
        let n = path.len();
        if n <= 1 {
            return Err(PhoenixError::domain("the path cannot be empty"));
        }
        if draws.len() != n - 1 {
            return Err(PhoenixError::domain(format!(
                "{} continuity draws for a path of {} steps",
                draws.len(),
                n - 1
            )));
        }

        let mut events = KnockEvents::empty();
        let mut knock_node: Option<usize> = None;
        let mut steps_examined = 0;

        for i in 0..n - 1 {
            steps_examined += 1;
            let price = path[i];
            let vol = self.process.diffusion(path.time(i), price);
            let dt = path.grid().dt(i);
            let level = continuity_corrected_level(price, path[i + 1], vol, dt, draws[i]);

            if level > self.terms.up_barrier {
                events |= KnockEvents::UP;
                knock_node.get_or_insert(i + 1);
                break;
            } else if level <= self.terms.down_barrier {
                events |= KnockEvents::DOWN;
                match self.policy {
                    KnockPolicy::ResetOnDownTouch => knock_node = Some(0),
                    KnockPolicy::AccumulateThroughDownTouch => advance(&mut knock_node, i),
                }
            } else {
                advance(&mut knock_node, i);
            }
        }

        Ok(BarrierScan {
            events,
            knock_node,
            steps_examined,
        })
    }

    pub fn price(&self, path: &Path, draws: &[f64]) -> PhoenixResult<f64> {
        let scan = self.scan(path, draws)?;

        if scan.events == KnockEvents::DOWN {
            return Ok(path.back() - path.front());
        }

        let node = scan
            .knock_node
            .ok_or_else(|| PhoenixError::domain("scan finished without a knock node"))?;
        let discount = self.discounts.get(node).ok_or_else(|| {
            PhoenixError::domain(format!(
                "no discount factor for node {} ({} available)",
                node,
                self.discounts.len()
            ))
        })?;
        Ok(self.terms.rebate * self.terms.principal * discount)
    }
}

/// Survival counter step: first surviving step sets node `i + 1`
fn advance(knock_node: &mut Option<usize>, i: usize) {
    match knock_node {
        Some(node) => *node += 1,
        None => *knock_node = Some(i + 1),
    }
}

/// Stateful adapter feeding the pricer one fresh draw sequence per path
pub struct ContinuityCorrectedPricer<U> {
    pricer: PhoenixPathPricer,
    sequence: U,
}

impl<U: UniformSequenceGenerator> ContinuityCorrectedPricer<U> {
    pub fn new(pricer: PhoenixPathPricer, sequence: U) -> Self {
        ContinuityCorrectedPricer { pricer, sequence }
    }
}

impl<U: UniformSequenceGenerator> PathPricer for ContinuityCorrectedPricer<U> {
    fn price(&mut self, path: &Path) -> PhoenixResult<f64> {
        let draws = self.sequence.next_sequence();
        self.pricer.price(path, draws)
    }
}
