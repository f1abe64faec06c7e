pub mod cli;
pub mod error;
pub mod exchange;
pub mod interface;
pub mod logging;
pub mod models;
pub mod optimizer;
pub mod sweep;

pub use error::{BlendError, Result};
pub use models::{Blend, BlendOutcome, Ingredient, NutritionVector, TargetSpec};
pub use optimizer::{OptimizerConfig, optimize, optimize_with_cancel, optimize_with_config};
