pub mod budget;
pub mod config;
pub mod constants;
pub mod lexicographic;
pub mod linalg;
pub mod min_norm;
pub mod objective;
pub mod solve;
pub mod validate;

pub use config::{NutrientWeights, OptimizerConfig};
pub use constants::*;
pub use objective::{Objective, relative_scale};
pub use solve::{
    check_feasible, clip_and_renormalize, optimize, optimize_with_cancel, optimize_with_config,
};
pub use validate::validate_inputs;
