mod blend;
mod ingredient;
mod nutrition;

pub use blend::{Blend, BlendOutcome, CalculatedNutrition};
pub use ingredient::{Ingredient, OrderConstraint, TargetSpec};
pub use nutrition::{Nutrient, NutritionVector};
