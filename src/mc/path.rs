// src/mc/path.rs
use super::time_grid::TimeGrid;
use crate::error::{PhoenixError, PhoenixResult};
use std::ops::Index;
use std::sync::Arc;

/// Simulated underlying prices, one per time-grid node
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    grid: Arc<TimeGrid>,
    values: Vec<f64>,
}

impl Path {
    pub fn new(grid: Arc<TimeGrid>, values: Vec<f64>) -> PhoenixResult<Self> {
        if grid.len() != values.len() {
            return Err(PhoenixError::domain(format!(
                "path has {} values for a grid of {} nodes",
                values.len(),
                grid.len()
            )));
        }
        Ok(Path { grid, values })
    }

    /// Path on a uniform grid over `[0, maturity]`
    pub fn uniform(maturity: f64, values: Vec<f64>) -> PhoenixResult<Self> {
        let grid = if values.len() > 1 {
            TimeGrid::new(maturity, values.len() - 1)?
        } else {
            TimeGrid::from_times(vec![0.0])?
        };
        Self::new(Arc::new(grid), values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn front(&self) -> f64 {
        self.values[0]
    }

    pub fn back(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn time(&self, i: usize) -> f64 {
        self.grid[i]
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Index<usize> for Path {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.values[i]
    }
}
