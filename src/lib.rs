//! # phoenix-mc: Monte Carlo Pricing of Phoenix Options
//!
//! A Phoenix option watches one underlying against an upper and a lower
//! barrier. It pays a principal-scaled rebate discounted from the node at
//! which the knock condition is met, or the terminal spread `S_T - S_0` when
//! only the lower barrier was touched.
//!
//! ## Key Features
//!
//! - **Continuity-corrected barriers**: one uniform draw per step samples the
//!   bridge extreme between nodes, so crossings between monitoring dates count
//! - **Early termination**: the scan stops at the first upper touch
//! - **Fixed or adaptive sampling**: exactly N samples, or batches until the
//!   standard error meets a tolerance
//! - **Reproducible**: identical seed and configuration give a bit-identical
//!   price
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use phoenix_mc::instruments::{Exercise, OptionType, Payoff, PhoenixOption};
//! use phoenix_mc::mc::{McPhoenixEngine, PhoenixEngineConfig};
//! use phoenix_mc::models::BlackScholesProcess;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let process = BlackScholesProcess::new(100.0, today, 0.05, 0.0, 0.2).unwrap();
//! let config = PhoenixEngineConfig::builder()
//!     .steps(12)
//!     .samples(2_000)
//!     .seed(42)
//!     .build()
//!     .expect("Valid configuration");
//!
//! let option = PhoenixOption::new(
//!     1_000_000.0, // principal
//!     120.0,       // up barrier
//!     80.0,        // down barrier
//!     0.01,        // rebate
//!     Payoff::plain_vanilla(OptionType::Call, 100.0),
//!     Exercise::European { date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() },
//! );
//!
//! let engine = McPhoenixEngine::black_scholes(process, config);
//! let results = option.price(&engine).expect("Priceable option");
//! println!("Phoenix price: {:.4} ± {:?}", results.value, results.error_estimate);
//! ```
//!
//! The library logs through `tracing` and never installs a subscriber.

// Module declarations
pub mod error;
pub mod instruments;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{PhoenixError, PhoenixResult};
pub use instruments::{PhoenixArguments, PhoenixOption};
pub use mc::{McPhoenixEngine, PhoenixEngineConfig, PhoenixResults};
