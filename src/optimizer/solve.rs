use std::sync::atomic::AtomicBool;

use tracing::{debug, info, warn};

use crate::error::{BlendError, Result};
use crate::models::{
    Blend, BlendOutcome, CalculatedNutrition, Ingredient, Nutrient, OrderConstraint, TargetSpec,
};
use crate::optimizer::budget::SolveBudget;
use crate::optimizer::config::OptimizerConfig;
use crate::optimizer::constants::{CLIP_EPSILON, PERCENT_TOTAL};
use crate::optimizer::lexicographic::lexicographic_vertex_weights;
use crate::optimizer::min_norm::min_norm_point;
use crate::optimizer::objective::{Objective, prefix_profiles, proportions_from_vertex_weights};
use crate::optimizer::validate::validate_inputs;

/// Optimize with the default configuration.
pub fn optimize(ingredients: &[Ingredient], target: &TargetSpec) -> Result<BlendOutcome> {
    optimize_with_config(ingredients, target, &OptimizerConfig::default())
}

pub fn optimize_with_config(
    ingredients: &[Ingredient],
    target: &TargetSpec,
    config: &OptimizerConfig,
) -> Result<BlendOutcome> {
    run(ingredients, target, config, None)
}

/// Optimize, giving up with a numerical error once `cancel` is raised.
pub fn optimize_with_cancel(
    ingredients: &[Ingredient],
    target: &TargetSpec,
    config: &OptimizerConfig,
    cancel: &AtomicBool,
) -> Result<BlendOutcome> {
    run(ingredients, target, config, Some(cancel))
}

#[tracing::instrument(skip_all, fields(ingredients = ingredients.len()))]
fn run(
    ingredients: &[Ingredient],
    target: &TargetSpec,
    config: &OptimizerConfig,
    cancel: Option<&AtomicBool>,
) -> Result<BlendOutcome> {
    config.validate()?;
    validate_inputs(ingredients, target)?;

    let objective = Objective::new(&target.target, &config.weights);
    let points: Vec<[f64; Nutrient::COUNT]> = prefix_profiles(ingredients)
        .iter()
        .map(|profile| objective.point(profile))
        .collect();

    let mut budget = SolveBudget::new(config, cancel);
    let optimum = min_norm_point(&points, config.tolerance, &mut budget)?;
    debug!(
        objective = optimum.norm2(),
        iterations = budget.used(),
        "minimum-norm point found"
    );

    let vertex_weights =
        lexicographic_vertex_weights(&points, &optimum.point, config.tolerance, &mut budget)?;

    let mut proportions = proportions_from_vertex_weights(&vertex_weights);
    clip_and_renormalize(&mut proportions)?;

    let constraints = OrderConstraint::chain(ingredients.len());
    check_feasible(&proportions, &constraints, config.tolerance)?;

    let nutrition =
        CalculatedNutrition::from_proportions(ingredients, &proportions, target.total_amount);
    let value = objective.value(&nutrition.per_100);

    // The tie-break must not drift off the optimum it was seeded with.
    let slack = config.tolerance * (1.0 + optimum.norm2());
    if value > optimum.norm2() + slack {
        return Err(BlendError::numerical(format!(
            "tie-break moved the objective from {:.6e} to {:.6e}",
            optimum.norm2(),
            value
        )));
    }

    if value > config.tolerance {
        warn!(objective = value, "target is not exactly reachable");
    }
    info!(objective = value, iterations = budget.used(), "blend optimized");

    Ok(BlendOutcome {
        blend: Blend::new(ingredients, &proportions),
        nutrition,
        deviation: objective.deviation(&nutrition.per_100),
        objective: value,
        iterations: budget.used(),
    })
}

/// Zero out near-zero noise and rescale so the proportions sum to exactly 100.
pub fn clip_and_renormalize(proportions: &mut [f64]) -> Result<()> {
    for p in proportions.iter_mut() {
        if p.abs() < CLIP_EPSILON {
            *p = 0.0;
        }
    }

    let sum: f64 = proportions.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(BlendError::numerical(format!(
            "proportions sum to {} after clipping",
            sum
        )));
    }

    for p in proportions.iter_mut() {
        *p = *p / sum * PERCENT_TOTAL;
    }
    Ok(())
}

/// Verify the simplex, bound, and label-order constraints within tolerance.
pub fn check_feasible(
    proportions: &[f64],
    constraints: &[OrderConstraint],
    tolerance: f64,
) -> Result<()> {
    let slack = tolerance * PERCENT_TOTAL;

    let sum: f64 = proportions.iter().sum();
    if (sum - PERCENT_TOTAL).abs() > slack {
        return Err(BlendError::numerical(format!(
            "proportions sum to {} instead of 100",
            sum
        )));
    }

    if let Some((i, p)) = proportions
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < -slack || **p > PERCENT_TOTAL + slack)
    {
        return Err(BlendError::numerical(format!(
            "proportion #{} is out of range: {}",
            i + 1,
            p
        )));
    }

    for c in constraints {
        let violation = c.violation(proportions);
        if violation > slack {
            return Err(BlendError::numerical(format!(
                "label order violated: #{} exceeds #{} by {}",
                c.lighter + 1,
                c.heavier + 1,
                violation
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionVector;

    fn scenario() -> (Vec<Ingredient>, TargetSpec) {
        let ingredients = vec![
            Ingredient::new("A", NutritionVector::new(500.0, 10.0, 20.0, 50.0, 1.0)),
            Ingredient::new("B", NutritionVector::new(100.0, 5.0, 1.0, 20.0, 0.1)),
        ];
        let target = TargetSpec::new(NutritionVector::new(300.0, 7.0, 10.0, 35.0, 0.5), 1000.0);
        (ingredients, target)
    }

    #[test]
    fn test_clip_and_renormalize() {
        let mut p = vec![60.0, 40.0 - 5e-10, 5e-10];
        clip_and_renormalize(&mut p).unwrap();
        assert_eq!(p[2], 0.0);
        assert!((p.iter().sum::<f64>() - 100.0).abs() < 1e-12);

        let mut zeros = vec![0.0, 1e-12];
        assert!(matches!(
            clip_and_renormalize(&mut zeros),
            Err(BlendError::Numerical(_))
        ));
    }

    #[test]
    fn test_check_feasible_catches_order_violation() {
        let chain = OrderConstraint::chain(3);
        assert!(check_feasible(&[50.0, 30.0, 20.0], &chain, 1e-6).is_ok());
        assert!(check_feasible(&[40.0, 40.0, 20.0], &chain, 1e-6).is_ok());

        let result = check_feasible(&[30.0, 50.0, 20.0], &chain, 1e-6);
        assert!(matches!(result, Err(BlendError::Numerical(_))));
    }

    #[test]
    fn test_check_feasible_catches_bad_sum_and_range() {
        let chain = OrderConstraint::chain(2);
        assert!(check_feasible(&[60.0, 30.0], &chain, 1e-6).is_err());
        assert!(check_feasible(&[110.0, -10.0], &chain, 1e-6).is_err());
    }

    #[test]
    fn test_scenario_splits_evenly() {
        // Every nutrient grows with A's share, and A's share cannot drop below half.
        let (ingredients, target) = scenario();
        let outcome = optimize(&ingredients, &target).unwrap();
        let p = outcome.blend.proportions();

        assert!((p[0] - 50.0).abs() < 1e-6, "{:?}", p);
        assert!((p[1] - 50.0).abs() < 1e-6, "{:?}", p);
        assert!((outcome.nutrition.total.calories - 3000.0).abs() < 1e-3);
        assert!(outcome.deviation.calories.abs() < 1e-6);
        assert!(outcome.objective > 0.0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let (ingredients, target) = scenario();
        let cancel = AtomicBool::new(true);
        let result =
            optimize_with_cancel(&ingredients, &target, &OptimizerConfig::default(), &cancel);
        assert!(matches!(result, Err(BlendError::Numerical(_))));
    }

    #[test]
    fn test_invalid_config_is_configuration_error() {
        let (ingredients, target) = scenario();
        let config = OptimizerConfig {
            tolerance: 0.0,
            ..Default::default()
        };
        let result = optimize_with_config(&ingredients, &target, &config);
        assert!(matches!(result, Err(BlendError::Configuration(_))));
    }
}
