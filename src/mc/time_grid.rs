// src/mc/time_grid.rs
use crate::error::{PhoenixError, PhoenixResult};
use std::ops::Index;

/// Ordered simulation times, starting at 0
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Uniform grid on `[0, end]` with `steps` intervals
    pub fn new(end: f64, steps: usize) -> PhoenixResult<Self> {
        if !(end > 0.0 && end.is_finite()) {
            return Err(PhoenixError::validation(
                "maturity",
                format!("residual time must be positive and finite, got {}", end),
            ));
        }
        if steps == 0 {
            return Err(PhoenixError::configuration("steps", "must be greater than 0"));
        }
        let dt = end / steps as f64;
        let mut times: Vec<f64> = (0..steps).map(|i| i as f64 * dt).collect();
        times.push(end);
        Ok(TimeGrid { times })
    }

    /// Uniform grid with `max(floor(steps_per_year * end), 1)` intervals
    pub fn from_steps_per_year(end: f64, steps_per_year: usize) -> PhoenixResult<Self> {
        if steps_per_year == 0 {
            return Err(PhoenixError::configuration(
                "steps_per_year",
                "must be greater than 0",
            ));
        }
        let steps = (steps_per_year as f64 * end).floor().max(1.0) as usize;
        Self::new(end, steps)
    }

    /// Grid from explicit, strictly increasing, non-negative times
    pub fn from_times(times: Vec<f64>) -> PhoenixResult<Self> {
        if times.is_empty() {
            return Err(PhoenixError::domain("time grid needs at least one node"));
        }
        if times[0] < 0.0 || times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PhoenixError::domain(
                "time grid must be non-negative and strictly increasing",
            ));
        }
        Ok(TimeGrid { times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of intervals
    pub fn steps(&self) -> usize {
        self.times.len().saturating_sub(1)
    }

    /// Length of the interval starting at node `i`
    pub fn dt(&self, i: usize) -> f64 {
        self.times[i + 1] - self.times[i]
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }
}

impl Index<usize> for TimeGrid {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.times[i]
    }
}
