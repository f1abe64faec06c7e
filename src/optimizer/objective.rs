//! Objective construction.
//!
//! The feasible proportions (sum 100, non-negative, non-increasing in label
//! order) are exactly the convex combinations of the *prefix vertices*: vertex
//! `j` spreads 100 percent evenly over the first `j + 1` ingredients. Writing a
//! blend as `p = 100 * sum_j w_j * u_j` with `w` on the probability simplex turns
//! the order-constrained problem into a plain simplex-constrained one whose
//! blended profile is `sum_j w_j * m_j`, with `m_j` the mean profile of the
//! first `j + 1` ingredients.

use crate::models::{Ingredient, Nutrient, NutritionVector};
use crate::optimizer::config::NutrientWeights;
use crate::optimizer::constants::PERCENT_TOTAL;

/// Weighted squared relative deviation from a target profile.
#[derive(Debug, Clone)]
pub struct Objective {
    target: [f64; Nutrient::COUNT],
    scales: [f64; Nutrient::COUNT],
    weights: [f64; Nutrient::COUNT],
}

impl Objective {
    pub fn new(target: &NutritionVector, weights: &NutrientWeights) -> Self {
        let target = target.to_array();
        Self {
            target,
            scales: target.map(relative_scale),
            weights: weights.to_array(),
        }
    }

    /// Per-nutrient `(blend - target) / scale`.
    pub fn deviation(&self, blend: &NutritionVector) -> NutritionVector {
        let b = blend.to_array();
        NutritionVector::from_array(std::array::from_fn(|k| (b[k] - self.target[k]) / self.scales[k]))
    }

    /// Objective value of a blended per-100 profile.
    pub fn value(&self, blend: &NutritionVector) -> f64 {
        self.deviation(blend)
            .to_array()
            .iter()
            .zip(self.weights)
            .map(|(d, w)| w * d * d)
            .sum()
    }

    /// Map a profile into the space where the objective is a squared norm.
    ///
    /// For any convex combination of profiles, the squared norm of the same
    /// combination of their points equals the objective value.
    pub fn point(&self, profile: &[f64; Nutrient::COUNT]) -> [f64; Nutrient::COUNT] {
        std::array::from_fn(|k| {
            self.weights[k].sqrt() * (profile[k] - self.target[k]) / self.scales[k]
        })
    }
}

/// Scale for relative deviation: the target itself, or 1 for a zero target.
pub fn relative_scale(target: f64) -> f64 {
    if target == 0.0 { 1.0 } else { target }
}

/// Mean profile of each declared prefix of the ingredient list.
pub fn prefix_profiles(ingredients: &[Ingredient]) -> Vec<[f64; Nutrient::COUNT]> {
    let mut sum = [0.0; Nutrient::COUNT];
    ingredients
        .iter()
        .enumerate()
        .map(|(j, ing)| {
            for (acc, v) in sum.iter_mut().zip(ing.nutrition_per_unit.to_array()) {
                *acc += v;
            }
            let len = (j + 1) as f64;
            sum.map(|s| s / len)
        })
        .collect()
}

/// Percent proportions from prefix-vertex weights.
///
/// `p_i = 100 * sum_{j >= i} w_j / (j + 1)`, so the result is non-increasing
/// and sums to `100 * sum(w)`.
pub fn proportions_from_vertex_weights(vertex_weights: &[f64]) -> Vec<f64> {
    let mut proportions = vec![0.0; vertex_weights.len()];
    let mut tail = 0.0;
    for j in (0..vertex_weights.len()).rev() {
        tail += vertex_weights[j] / (j + 1) as f64;
        proportions[j] = PERCENT_TOTAL * tail;
    }
    proportions
}
