// src/models/black_scholes.rs
//! Generalized Black-Scholes Process
//!
//! # Mathematical Framework
//!
//! The spot follows
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//! and is discretised in log space, `x = ln S`:
//! ```text
//! dx_t = (r - q - σ²/2) dt + σ dW_t
//! ```
//! so `diffusion(t, S)` is the log-price volatility σ and `evolve` applies
//! the exact transition
//! ```text
//! S_{t+dt} = S_t * exp((r - q - σ²/2) dt + σ √dt Z)
//! ```

use super::flat_forward::{year_fraction, FlatForward};
use super::model::{DiscountCurve, StochasticProcess};
use crate::error::{validation::*, PhoenixResult};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct BlackScholesProcess {
    spot: f64,
    reference_date: NaiveDate,
    risk_free: FlatForward,
    dividend: FlatForward,
    volatility: f64,
}

impl BlackScholesProcess {
    pub fn new(
        spot: f64,
        reference_date: NaiveDate,
        risk_free_rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> PhoenixResult<Self> {
        validate_finite("spot", spot)?;
        validate_finite("volatility", volatility)?;
        validate_non_negative("volatility", volatility)?;
        Ok(BlackScholesProcess {
            spot,
            reference_date,
            risk_free: FlatForward::new(reference_date, risk_free_rate)?,
            dividend: FlatForward::new(reference_date, dividend_yield)?,
            volatility,
        })
    }

    /// Same market with another volatility
    pub fn with_volatility(&self, volatility: f64) -> PhoenixResult<Self> {
        Self::new(
            self.spot,
            self.reference_date,
            self.risk_free.rate,
            self.dividend.rate,
            volatility,
        )
    }

    pub fn risk_free_rate(&self) -> &FlatForward {
        &self.risk_free
    }

    pub fn dividend_yield(&self) -> &FlatForward {
        &self.dividend
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }
}

impl StochasticProcess for BlackScholesProcess {
    fn x0(&self) -> f64 {
        self.spot
    }

    fn drift(&self, _t: f64, _x: f64) -> f64 {
        self.risk_free.rate - self.dividend.rate - 0.5 * self.volatility * self.volatility
    }

    fn diffusion(&self, _t: f64, _x: f64) -> f64 {
        self.volatility
    }

    fn evolve(&self, t: f64, x: f64, dt: f64, dw: f64) -> f64 {
        x * (self.drift(t, x) * dt + self.diffusion(t, x) * dt.sqrt() * dw).exp()
    }

    fn time(&self, date: NaiveDate) -> f64 {
        year_fraction(self.reference_date, date)
    }
}

impl DiscountCurve for BlackScholesProcess {
    fn discount(&self, t: f64) -> f64 {
        self.risk_free.discount(t)
    }
}
