// src/models/model.rs
use chrono::NaiveDate;

/// One-dimensional diffusion driving the underlying
///
/// `drift` and `diffusion` are the coefficients of the process in the
/// variable it is discretised in; `evolve` maps a standard normal variate
/// over `dt` onto the next price.
pub trait StochasticProcess {
    fn x0(&self) -> f64;
    fn drift(&self, t: f64, x: f64) -> f64;
    fn diffusion(&self, t: f64, x: f64) -> f64;

    /// Next value after `dt` given the standard normal variate `dw`
    fn evolve(&self, t: f64, x: f64, dt: f64, dw: f64) -> f64;

    /// Year fraction from the process reference date to `date`
    fn time(&self, date: NaiveDate) -> f64;
}

pub trait DiscountCurve {
    fn discount(&self, t: f64) -> f64;
}
