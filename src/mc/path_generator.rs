// src/mc/path_generator.rs
//! Path Generation
//!
//! Each call to `next` draws one Gaussian vector (one variate per grid
//! interval), optionally reorders it through a Brownian bridge, and evolves
//! the process node by node:
//! ```text
//! S_{i+1} = evolve(t_i, S_i, Δt_i, Z_i)
//! ```
//! `antithetic` replays the last vector with every innovation negated,
//! `Z → -Z`. The continuity-correction draws are not touched here.

use super::brownian_bridge::BrownianBridge;
use super::path::Path;
use super::simulation::PathSource;
use super::time_grid::TimeGrid;
use crate::error::{PhoenixError, PhoenixResult};
use crate::models::StochasticProcess;
use crate::rng::GaussianSequenceGenerator;
use std::sync::Arc;

pub struct PathGenerator {
    process: Arc<dyn StochasticProcess>,
    grid: Arc<TimeGrid>,
    gaussians: Box<dyn GaussianSequenceGenerator>,
    bridge: Option<BrownianBridge>,
    last_draws: Option<Vec<f64>>,
}

impl PathGenerator {
    pub fn new(
        process: Arc<dyn StochasticProcess>,
        grid: TimeGrid,
        gaussians: Box<dyn GaussianSequenceGenerator>,
        brownian_bridge: bool,
    ) -> PhoenixResult<Self> {
        if gaussians.dimension() != grid.steps() {
            return Err(PhoenixError::configuration(
                "gaussians",
                format!(
                    "sequence dimension {} does not match {} time steps",
                    gaussians.dimension(),
                    grid.steps()
                ),
            ));
        }
        let bridge = if brownian_bridge {
            Some(BrownianBridge::new(&grid))
        } else {
            None
        };
        Ok(PathGenerator {
            process,
            grid: Arc::new(grid),
            gaussians,
            bridge,
            last_draws: None,
        })
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    fn build(&self, draws: &[f64], sign: f64) -> PhoenixResult<Path> {
        let signed: Vec<f64> = draws.iter().map(|z| sign * z).collect();
        let innovations = match &self.bridge {
            Some(bridge) => bridge.transform(&signed),
            None => signed,
        };

        let mut values = Vec::with_capacity(self.grid.len());
        let mut x = self.process.x0();
        values.push(x);
        for (i, &dw) in innovations.iter().enumerate() {
            x = self.process.evolve(self.grid[i], x, self.grid.dt(i), dw);
            values.push(x);
        }
        Path::new(Arc::clone(&self.grid), values)
    }
}

impl PathSource for PathGenerator {
    fn next(&mut self) -> PhoenixResult<Path> {
        let draws = self.gaussians.next_sequence().to_vec();
        let path = self.build(&draws, 1.0)?;
        self.last_draws = Some(draws);
        Ok(path)
    }

    fn antithetic(&mut self) -> PhoenixResult<Path> {
        match &self.last_draws {
            Some(draws) => self.build(draws, -1.0),
            None => Err(PhoenixError::domain(
                "antithetic path requested before any path was drawn",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlackScholesProcess;
    use crate::rng::PseudoRandomGaussian;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn generator(steps: usize, bridge: bool) -> PathGenerator {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let process = BlackScholesProcess::new(100.0, today, 0.02, 0.0, 0.3).unwrap();
        let grid = TimeGrid::new(1.0, steps).unwrap();
        PathGenerator::new(
            Arc::new(process),
            grid,
            Box::new(PseudoRandomGaussian::new(steps, 9)),
            bridge,
        )
        .unwrap()
    }

    #[test]
    fn test_paths_start_at_spot_and_span_grid() {
        let mut gen = generator(6, false);
        let path = gen.next().unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path.front(), 100.0);
        assert!(path.values().iter().all(|&s| s > 0.0));
    }

    #[test]
    fn test_antithetic_mirrors_log_returns() {
        let mut gen = generator(4, false);
        let path = gen.next().unwrap();
        let mirror = gen.antithetic().unwrap();

        // drift is r - σ²/2 = -0.025 per year, so the two log paths are
        // symmetric around the deterministic drift line
        for i in 1..path.len() {
            let drift = -0.025 * path.time(i);
            let up = (path[i] / 100.0).ln() - drift;
            let down = (mirror[i] / 100.0).ln() - drift;
            assert_relative_eq!(up, -down, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bridge_keeps_terminal_distribution() {
        let mut plain = generator(8, false);
        let mut bridged = generator(8, true);
        let n = 20_000;
        let mean_plain: f64 = (0..n).map(|_| plain.next().unwrap().back()).sum::<f64>() / n as f64;
        let mean_bridged: f64 =
            (0..n).map(|_| bridged.next().unwrap().back()).sum::<f64>() / n as f64;

        let forward = 100.0 * 0.02f64.exp();
        assert!((mean_plain - forward).abs() < 1.0, "plain mean {}", mean_plain);
        assert!((mean_bridged - forward).abs() < 1.0, "bridged mean {}", mean_bridged);
    }

    #[test]
    fn test_antithetic_before_next_fails() {
        let mut gen = generator(3, false);
        assert!(matches!(gen.antithetic(), Err(PhoenixError::Domain { .. })));
    }

    #[test]
    fn test_dimension_mismatch_is_configuration_error() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let process = BlackScholesProcess::new(100.0, today, 0.02, 0.0, 0.3).unwrap();
        let result = PathGenerator::new(
            Arc::new(process),
            TimeGrid::new(1.0, 5).unwrap(),
            Box::new(PseudoRandomGaussian::new(4, 1)),
            false,
        );
        assert!(matches!(result, Err(PhoenixError::Configuration { .. })));
    }
}
