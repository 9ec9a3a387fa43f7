pub mod brownian_bridge;
pub mod config;
pub mod mc_engine;
pub mod path;
pub mod path_generator;
pub mod phoenix_pricer;
pub mod simulation;
pub mod statistics;
pub mod time_grid;

pub use config::{ContinuitySeed, PhoenixEngineConfig, PhoenixEngineConfigBuilder, StepSpec};
pub use mc_engine::{McPhoenixEngine, PhoenixResults};
pub use path::Path;
pub use phoenix_pricer::{KnockEvents, KnockPolicy, PhoenixPathPricer};
pub use simulation::{MonteCarloModel, SamplingOutcome, SamplingPlan};
pub use statistics::{Accumulator, SampleAccumulator};
pub use time_grid::TimeGrid;
