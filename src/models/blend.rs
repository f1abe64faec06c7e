use crate::models::{Ingredient, Nutrient, NutritionVector};

/// The solved proportion (percent of total mass) of each ingredient, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    entries: Vec<(String, f64)>,
}

impl Blend {
    /// Pair names with proportions. Both slices are in declared order.
    pub fn new(ingredients: &[Ingredient], proportions: &[f64]) -> Self {
        Self {
            entries: ingredients
                .iter()
                .zip(proportions)
                .map(|(ing, &p)| (ing.name.clone(), p))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn proportions(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, p)| *p).collect()
    }

    pub fn proportion_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Nutrition of a blend, derived from its proportions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatedNutrition {
    /// Per 100 mass units of the finished product.
    pub per_100: NutritionVector,
    /// Per single mass unit.
    pub per_gram: NutritionVector,
    /// For the whole batch of `total_amount` mass units.
    pub total: NutritionVector,
}

impl CalculatedNutrition {
    /// Proportion-weighted sum of each ingredient's profile, scaled to `total_amount`.
    pub fn from_proportions(ingredients: &[Ingredient], proportions: &[f64], total_amount: f64) -> Self {
        let mut per_100 = [0.0; Nutrient::COUNT];
        for (ing, p) in ingredients.iter().zip(proportions) {
            let share = p / 100.0;
            for (acc, v) in per_100.iter_mut().zip(ing.nutrition_per_unit.to_array()) {
                *acc += share * v;
            }
        }
        let per_100 = NutritionVector::from_array(per_100);

        Self {
            per_100,
            per_gram: per_100.scaled(0.01),
            total: per_100.scaled(total_amount / 100.0),
        }
    }
}

/// Everything a single optimizer call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendOutcome {
    pub blend: Blend,
    pub nutrition: CalculatedNutrition,
    /// Relative deviation of the blend from the target, per nutrient: (blend - target) / scale.
    pub deviation: NutritionVector,
    /// Weighted sum of squared relative deviations at the returned blend.
    pub objective: f64,
    /// Solver iterations spent (minimum-norm cycles plus simplex pivots).
    pub iterations: usize,
}
