use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::exchange::request::IngredientRecord;
use crate::models::{Blend, BlendOutcome, Ingredient, Nutrient, NutritionVector};
use crate::optimizer::constants::{
    DEVIATION_DECIMALS, NUTRITION_DECIMALS, PER_GRAM_DECIMALS, PER_GRAM_SALT_DECIMALS,
    PROPORTION_DECIMALS, SALT_DECIMALS,
};

/// Round a float to n decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Round every field, salt with its own precision.
fn round_nutrition(v: &NutritionVector, decimals: u32, salt_decimals: u32) -> NutritionVector {
    let mut out = NutritionVector::default();
    for n in Nutrient::ALL {
        let places = if n == Nutrient::Salt { salt_decimals } else { decimals };
        out.set(n, round_to(v.get(n), places));
    }
    out
}

/// Name → percentage, serialized as a JSON object in declared label order.
#[derive(Debug, Clone, PartialEq)]
pub struct Proportions(pub Vec<(String, f64)>);

impl Serialize for Proportions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<&Blend> for Proportions {
    fn from(blend: &Blend) -> Self {
        Proportions(
            blend
                .entries()
                .iter()
                .map(|(name, p)| (name.clone(), round_to(*p, PROPORTION_DECIMALS)))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionReport {
    pub per_gram: NutritionVector,
    pub total: NutritionVector,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub proportions: Proportions,
    pub calculated_nutrition: NutritionReport,
    /// Per-nutrient relative deviation of the blend from the target.
    pub deviation: NutritionVector,
    pub objective: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientEcho {
    pub ingredients: Vec<IngredientRecord>,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResponse {
    pub ingredients: IngredientEcho,
    pub optimization_result: OptimizationResult,
}

impl OptimizationResponse {
    pub fn new(ingredients: &[Ingredient], outcome: &BlendOutcome) -> Self {
        let nutrition = &outcome.nutrition;
        Self {
            ingredients: IngredientEcho {
                ingredients: ingredients.iter().map(IngredientRecord::from).collect(),
            },
            optimization_result: OptimizationResult {
                proportions: Proportions::from(&outcome.blend),
                calculated_nutrition: NutritionReport {
                    per_gram: round_nutrition(
                        &nutrition.per_gram,
                        PER_GRAM_DECIMALS,
                        PER_GRAM_SALT_DECIMALS,
                    ),
                    total: round_nutrition(&nutrition.total, NUTRITION_DECIMALS, SALT_DECIMALS),
                },
                deviation: round_nutrition(
                    &outcome.deviation,
                    DEVIATION_DECIMALS,
                    DEVIATION_DECIMALS,
                ),
                objective: outcome.objective,
                iterations: outcome.iterations,
            },
        }
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
