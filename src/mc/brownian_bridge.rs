// src/mc/brownian_bridge.rs
//! Brownian Bridge Path Construction
//!
//! # Mathematical Framework
//!
//! Instead of building W(t₁), W(t₂), … in time order, the bridge fixes the
//! terminal value first and then fills in midpoints conditional on their
//! already-known neighbours:
//! ```text
//! W(t_l) | W(t_j), W(t_k) ~ N( w_L W(t_j) + w_R W(t_k),  (t_l - t_j)(t_k - t_l)/(t_k - t_j) )
//! w_L = (t_k - t_l)/(t_k - t_j),   w_R = (t_l - t_j)/(t_k - t_j)
//! ```
//! The first variates of each sequence then carry the coarse shape of the
//! path, which concentrates the effective dimension for low-discrepancy
//! drivers. The output is a vector of normalised increments
//! `(W(t_{i+1}) - W(t_i)) / √Δt_i`, again i.i.d. N(0, 1), so the path
//! generator consumes them exactly like raw draws.

use super::time_grid::TimeGrid;

#[derive(Debug, Clone)]
pub struct BrownianBridge {
    size: usize,
    sqrt_dt: Vec<f64>,
    bridge_index: Vec<usize>,
    left_index: Vec<usize>,
    right_index: Vec<usize>,
    left_weight: Vec<f64>,
    right_weight: Vec<f64>,
    std_dev: Vec<f64>,
}

impl BrownianBridge {
    /// Bridge over the non-zero nodes of `grid`
    pub fn new(grid: &TimeGrid) -> Self {
        let t: Vec<f64> = grid.times().iter().skip(1).copied().collect();
        let size = t.len();

        let mut bridge = BrownianBridge {
            size,
            sqrt_dt: vec![0.0; size],
            bridge_index: vec![0; size],
            left_index: vec![0; size],
            right_index: vec![0; size],
            left_weight: vec![0.0; size],
            right_weight: vec![0.0; size],
            std_dev: vec![0.0; size],
        };
        if size == 0 {
            return bridge;
        }

        bridge.sqrt_dt[0] = t[0].sqrt();
        for i in 1..size {
            bridge.sqrt_dt[i] = (t[i] - t[i - 1]).sqrt();
        }

        // map[i] == 0 marks a node not yet constructed
        let mut map = vec![0usize; size];
        map[size - 1] = 1;
        bridge.bridge_index[0] = size - 1;
        bridge.std_dev[0] = t[size - 1].sqrt();

        let mut j = 0;
        for i in 1..size {
            while map[j] != 0 {
                j += 1;
            }
            let mut k = j;
            while map[k] == 0 {
                k += 1;
            }
            // k is the next constructed node, l the midpoint of the gap
            let l = j + ((k - 1 - j) >> 1);
            map[l] = i;

            bridge.bridge_index[i] = l;
            bridge.left_index[i] = j;
            bridge.right_index[i] = k;
            if j != 0 {
                let span = t[k] - t[j - 1];
                bridge.left_weight[i] = (t[k] - t[l]) / span;
                bridge.right_weight[i] = (t[l] - t[j - 1]) / span;
                bridge.std_dev[i] = ((t[l] - t[j - 1]) * (t[k] - t[l]) / span).sqrt();
            } else {
                bridge.left_weight[i] = (t[k] - t[l]) / t[k];
                bridge.right_weight[i] = t[l] / t[k];
                bridge.std_dev[i] = (t[l] * (t[k] - t[l]) / t[k]).sqrt();
            }

            j = k + 1;
            if j >= size {
                j = 0;
            }
        }

        bridge
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Map i.i.d. normals onto normalised, bridge-ordered increments
    pub fn transform(&self, input: &[f64]) -> Vec<f64> {
        let n = self.size;
        let mut output = vec![0.0; n];
        if n == 0 {
            return output;
        }

        output[n - 1] = self.std_dev[0] * input[0];
        for i in 1..n {
            let j = self.left_index[i];
            let k = self.right_index[i];
            let l = self.bridge_index[i];
            output[l] = if j != 0 {
                self.left_weight[i] * output[j - 1]
                    + self.right_weight[i] * output[k]
                    + self.std_dev[i] * input[i]
            } else {
                self.right_weight[i] * output[k] + self.std_dev[i] * input[i]
            };
        }

        // Brownian values to increments
        for i in (1..n).rev() {
            output[i] -= output[i - 1];
            output[i] /= self.sqrt_dt[i];
        }
        output[0] /= self.sqrt_dt[0];
        output
    }
}
