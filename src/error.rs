// src/error.rs
use thiserror::Error;

/// Error types for the phoenix-mc library
///
/// Every failure aborts the current pricing call; nothing here is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhoenixError {
    /// Conflicting or missing engine configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    Configuration { field: String, reason: String },

    /// Missing or out-of-range contract data
    #[error("Invalid contract argument '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Only European exercise has a Monte Carlo engine
    #[error("engine not available for non-European phoenix option ({exercise} exercise)")]
    UnsupportedExercise { exercise: String },

    /// Degenerate simulation input
    #[error("Domain error: {reason}")]
    Domain { reason: String },

    /// Non-finite estimate coming out of the simulation
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

impl PhoenixError {
    pub fn configuration(field: &str, reason: impl Into<String>) -> Self {
        PhoenixError::Configuration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        PhoenixError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn domain(reason: impl Into<String>) -> Self {
        PhoenixError::Domain {
            reason: reason.into(),
        }
    }
}

/// Result type alias for phoenix-mc operations
pub type PhoenixResult<T> = Result<T, PhoenixError>;

/// Validation utilities
pub mod validation {
    use super::{PhoenixError, PhoenixResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PhoenixResult<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(PhoenixError::validation(
                name,
                format!("must be positive (> 0), got {}", value),
            ))
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PhoenixResult<()> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(PhoenixError::validation(
                name,
                format!("must be non-negative (≥ 0), got {}", value),
            ))
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PhoenixResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(PhoenixError::validation(
                name,
                format!("must be finite (not NaN or infinite), got {}", value),
            ))
        }
    }

    /// Unwrap a required contract field, naming it when absent
    pub fn require_field<T: Clone>(name: &str, value: &Option<T>) -> PhoenixResult<T> {
        value
            .clone()
            .ok_or_else(|| PhoenixError::validation(name, format!("no {} given", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("upbarrier", 120.0).is_ok());
        assert!(validate_positive("upbarrier", 0.0).is_err());
        assert!(validate_positive("upbarrier", -1.0).is_err());
        assert!(validate_positive("upbarrier", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("strike", 0.0).is_ok());
        assert!(validate_non_negative("strike", -0.01).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_field_names_missing_field() {
        let missing: Option<f64> = None;
        let err = require_field("rebate", &missing).unwrap_err();
        assert_eq!(err, PhoenixError::validation("rebate", "no rebate given"));
        assert_eq!(require_field("rebate", &Some(0.01)).unwrap(), 0.01);
    }

    #[test]
    fn test_error_display() {
        let err = PhoenixError::configuration("steps", "number of steps overspecified");
        let display = err.to_string();
        assert!(display.contains("steps"));
        assert!(display.contains("overspecified"));

        let err = PhoenixError::UnsupportedExercise {
            exercise: "American".to_string(),
        };
        assert!(err.to_string().contains("American"));
    }
}
