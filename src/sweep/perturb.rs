use rand::Rng;

use crate::error::{BlendError, Result};
use crate::models::{Nutrient, NutritionVector, TargetSpec};

/// Per-nutrient multipliers applied to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    pub factors: [f64; Nutrient::COUNT],
}

impl Perturbation {
    pub fn identity() -> Self {
        Self {
            factors: [1.0; Nutrient::COUNT],
        }
    }

    /// Draw each factor uniformly from `[1 - spread, 1 + spread]`.
    pub fn random(rng: &mut impl Rng, spread: f64) -> Self {
        let mut factors = [1.0; Nutrient::COUNT];
        for f in factors.iter_mut() {
            *f = rng.gen_range((1.0 - spread)..=(1.0 + spread));
        }
        Self { factors }
    }

    /// Scale every target field; the batch size is left alone.
    pub fn apply(&self, spec: &TargetSpec) -> TargetSpec {
        let base = spec.target.to_array();
        let mut scaled = [0.0; Nutrient::COUNT];
        for (k, v) in scaled.iter_mut().enumerate() {
            *v = base[k] * self.factors[k];
        }
        TargetSpec::new(NutritionVector::from_array(scaled), spec.total_amount)
    }
}

/// Spread is a fraction in `[0, 1)`.
pub fn validate_spread(spread: f64) -> Result<()> {
    if !spread.is_finite() || !(0.0..1.0).contains(&spread) {
        return Err(BlendError::configuration(format!(
            "Spread must lie in [0, 100) percent, got {}",
            spread * 100.0
        )));
    }
    Ok(())
}
