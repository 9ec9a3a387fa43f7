pub mod exercise;
pub mod payoff;
pub mod phoenix_option;

pub use exercise::{Exercise, ExerciseType};
pub use payoff::{OptionType, Payoff};
pub use phoenix_option::{
    BarrierTerms, ImpliedVolatilityParams, PhoenixArguments, PhoenixOption, PhoenixTerms,
};
