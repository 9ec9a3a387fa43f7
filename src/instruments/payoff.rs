// src/instruments/payoff.rs
//! Striked Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **Plain vanilla**: max(ω(S - K), 0), ω = +1 for calls, -1 for puts
//! - **Cash-or-nothing**: C · 1{ω(S - K) > 0}
//! - **Asset-or-nothing**: S · 1{ω(S - K) > 0}
//!
//! The Phoenix engine only accepts the plain vanilla shape; the others exist
//! so that contracts carrying them can be represented and rejected cleanly.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// ω in the payoff definitions
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Payoff {
    PlainVanilla {
        option_type: OptionType,
        strike: f64,
    },
    CashOrNothing {
        option_type: OptionType,
        strike: f64,
        cash: f64,
    },
    AssetOrNothing {
        option_type: OptionType,
        strike: f64,
    },
}

impl Payoff {
    pub fn plain_vanilla(option_type: OptionType, strike: f64) -> Self {
        Payoff::PlainVanilla {
            option_type,
            strike,
        }
    }

    pub fn option_type(&self) -> OptionType {
        match *self {
            Payoff::PlainVanilla { option_type, .. }
            | Payoff::CashOrNothing { option_type, .. }
            | Payoff::AssetOrNothing { option_type, .. } => option_type,
        }
    }

    pub fn strike(&self) -> f64 {
        match *self {
            Payoff::PlainVanilla { strike, .. }
            | Payoff::CashOrNothing { strike, .. }
            | Payoff::AssetOrNothing { strike, .. } => strike,
        }
    }

    pub fn is_plain_vanilla(&self) -> bool {
        matches!(self, Payoff::PlainVanilla { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Payoff::PlainVanilla { .. } => "PlainVanilla",
            Payoff::CashOrNothing { .. } => "CashOrNothing",
            Payoff::AssetOrNothing { .. } => "AssetOrNothing",
        }
    }

    /// Payoff at underlying price `price`
    pub fn value(&self, price: f64) -> f64 {
        let omega = self.option_type().sign();
        let in_the_money = omega * (price - self.strike()) > 0.0;
        match *self {
            Payoff::PlainVanilla { strike, .. } => (omega * (price - strike)).max(0.0),
            Payoff::CashOrNothing { cash, .. } => {
                if in_the_money {
                    cash
                } else {
                    0.0
                }
            }
            Payoff::AssetOrNothing { .. } => {
                if in_the_money {
                    price
                } else {
                    0.0
                }
            }
        }
    }
}
