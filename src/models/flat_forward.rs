// src/models/flat_forward.rs
use super::model::DiscountCurve;
use crate::error::{validation::*, PhoenixResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Actual/365 Fixed year fraction between two dates
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days() as f64 / 365.0
}

/// Flat continuously-compounded term structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatForward {
    pub reference_date: NaiveDate,
    pub rate: f64,
}

impl FlatForward {
    pub fn new(reference_date: NaiveDate, rate: f64) -> PhoenixResult<Self> {
        validate_finite("rate", rate)?;
        Ok(FlatForward {
            reference_date,
            rate,
        })
    }

    pub fn time(&self, date: NaiveDate) -> f64 {
        year_fraction(self.reference_date, date)
    }
}

impl DiscountCurve for FlatForward {
    fn discount(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_discount_factors() {
        let curve = FlatForward::new(date(2024, 1, 1), 0.05).unwrap();
        assert_eq!(curve.discount(0.0), 1.0);
        assert_relative_eq!(curve.discount(2.0), (-0.1f64).exp(), epsilon = 1e-15);
        assert!(curve.discount(1.0) > curve.discount(1.5));
    }

    #[test]
    fn test_actual_365_year_fraction() {
        assert_relative_eq!(year_fraction(date(2024, 1, 1), date(2025, 1, 1)), 366.0 / 365.0);
        let curve = FlatForward::new(date(2023, 1, 1), 0.0).unwrap();
        assert_eq!(curve.time(date(2024, 1, 1)), 1.0);
    }

    #[test]
    fn test_rejects_non_finite_rate() {
        assert!(FlatForward::new(date(2024, 1, 1), f64::NAN).is_err());
    }
}
