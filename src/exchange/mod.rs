mod persistence;
mod request;
mod response;

pub use persistence::{STDIO_PATH, load_request, parse_request, write_json};
pub use request::{IngredientList, IngredientRecord, OptimizationRequest, TargetRecord};
pub use response::{
    ErrorResponse, IngredientEcho, NutritionReport, OptimizationResponse, OptimizationResult,
    Proportions, round_to,
};
