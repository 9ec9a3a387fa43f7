pub mod black_scholes;
pub mod flat_forward;
pub mod model;

pub use black_scholes::BlackScholesProcess;
pub use flat_forward::FlatForward;
pub use model::{DiscountCurve, StochasticProcess};
