use serde::{Deserialize, Serialize};

use crate::models::{Ingredient, NutritionVector, TargetSpec};
use crate::optimizer::constants::{DEFAULT_TARGET, DEFAULT_TOTAL_AMOUNT};

/// One row of the ingredient profile table as produced upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub estimated_nutrition: NutritionVector,
}

impl From<&IngredientRecord> for Ingredient {
    fn from(record: &IngredientRecord) -> Self {
        Ingredient::new(record.name.trim(), record.estimated_nutrition)
            .with_category(record.category.clone())
    }
}

impl From<&Ingredient> for IngredientRecord {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            category: ingredient.category.clone(),
            estimated_nutrition: ingredient.nutrition_per_unit,
        }
    }
}

/// The ingredient table, either bare or still wrapped the way the analyzer emits it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IngredientList {
    Bare(Vec<IngredientRecord>),
    Wrapped { ingredients: Vec<IngredientRecord> },
}

impl IngredientList {
    pub fn records(&self) -> &[IngredientRecord] {
        match self {
            IngredientList::Bare(records) => records,
            IngredientList::Wrapped { ingredients } => ingredients,
        }
    }
}

/// Target nutrition per 100 mass units plus the batch size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub salt: f64,
    #[serde(default = "default_total_amount")]
    pub total_amount: f64,
}

fn default_total_amount() -> f64 {
    DEFAULT_TOTAL_AMOUNT
}

impl Default for TargetRecord {
    fn default() -> Self {
        TargetRecord::from(TargetSpec::new(DEFAULT_TARGET, DEFAULT_TOTAL_AMOUNT))
    }
}

impl From<TargetSpec> for TargetRecord {
    fn from(spec: TargetSpec) -> Self {
        Self {
            calories: spec.target.calories,
            protein: spec.target.protein,
            fat: spec.target.fat,
            carbs: spec.target.carbs,
            salt: spec.target.salt,
            total_amount: spec.total_amount,
        }
    }
}

impl From<TargetRecord> for TargetSpec {
    fn from(record: TargetRecord) -> Self {
        TargetSpec::new(
            NutritionVector::new(
                record.calories,
                record.protein,
                record.fat,
                record.carbs,
                record.salt,
            ),
            record.total_amount,
        )
    }
}

/// A full optimization request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizationRequest {
    pub ingredients: IngredientList,

    #[serde(default)]
    pub target_nutrition: Option<TargetRecord>,
}

impl OptimizationRequest {
    /// Ingredients in declared label order.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.ingredients.records().iter().map(Ingredient::from).collect()
    }

    /// The requested target, or the stock default when none was sent.
    pub fn target(&self) -> TargetSpec {
        self.target_nutrition.unwrap_or_default().into()
    }
}
