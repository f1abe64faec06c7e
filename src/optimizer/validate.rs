use std::collections::HashSet;

use crate::error::{BlendError, Result};
use crate::models::{Ingredient, TargetSpec};

/// Check optimizer inputs before any solve is attempted.
pub fn validate_inputs(ingredients: &[Ingredient], target: &TargetSpec) -> Result<()> {
    if ingredients.is_empty() {
        return Err(BlendError::configuration("Ingredient list is empty"));
    }

    let mut seen = HashSet::new();
    for (i, ing) in ingredients.iter().enumerate() {
        let name = ing.name.trim();
        if name.is_empty() {
            return Err(BlendError::configuration(format!(
                "Ingredient #{} has a blank name",
                i + 1
            )));
        }
        if !seen.insert(name) {
            return Err(BlendError::configuration(format!(
                "Duplicate ingredient name: {}",
                name
            )));
        }
        if let Some((nutrient, value)) = ing.nutrition_per_unit.invalid_field() {
            return Err(BlendError::configuration(format!(
                "Ingredient '{}' has invalid {}: {} (must be finite and >= 0)",
                ing.name,
                nutrient.name(),
                value
            )));
        }
    }

    if !target.total_amount.is_finite() || target.total_amount <= 0.0 {
        return Err(BlendError::configuration(format!(
            "total_amount must be positive, got {}",
            target.total_amount
        )));
    }

    if let Some((nutrient, value)) = target.target.invalid_field() {
        return Err(BlendError::configuration(format!(
            "Target {} is invalid: {} (must be finite and >= 0)",
            nutrient.name(),
            value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionVector;

    fn target() -> TargetSpec {
        TargetSpec::new(NutritionVector::new(300.0, 7.0, 10.0, 35.0, 0.5), 1000.0)
    }

    fn ing(name: &str) -> Ingredient {
        Ingredient::new(name, NutritionVector::new(100.0, 1.0, 1.0, 10.0, 0.1))
    }

    fn assert_configuration(result: Result<()>) {
        assert!(matches!(result, Err(BlendError::Configuration(_))), "{:?}", result);
    }

    #[test]
    fn test_accepts_valid_input() {
        assert!(validate_inputs(&[ing("A"), ing("B")], &target()).is_ok());
    }

    #[test]
    fn test_rejects_empty_list() {
        assert_configuration(validate_inputs(&[], &target()));
    }

    #[test]
    fn test_rejects_non_positive_total() {
        let mut t = target();
        t.total_amount = 0.0;
        assert_configuration(validate_inputs(&[ing("A")], &t));
        t.total_amount = -5.0;
        assert_configuration(validate_inputs(&[ing("A")], &t));
        t.total_amount = f64::INFINITY;
        assert_configuration(validate_inputs(&[ing("A")], &t));
    }

    #[test]
    fn test_rejects_negative_nutrition() {
        let mut bad = ing("A");
        bad.nutrition_per_unit.fat = -0.5;
        assert_configuration(validate_inputs(&[bad], &target()));

        let mut t = target();
        t.target.carbs = f64::NAN;
        assert_configuration(validate_inputs(&[ing("A")], &t));
    }

    #[test]
    fn test_rejects_blank_and_duplicate_names() {
        assert_configuration(validate_inputs(&[ing("  ")], &target()));
        assert_configuration(validate_inputs(&[ing("Sugar"), ing("Sugar ")], &target()));
    }
}
