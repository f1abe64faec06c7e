use crate::models::{BlendOutcome, Ingredient, Nutrient, TargetSpec};
use crate::optimizer::constants::PERCENT_TOTAL;

/// Mass of one ingredient in a batch of `total_amount`.
pub fn batch_mass(proportion: f64, total_amount: f64) -> f64 {
    proportion / PERCENT_TOTAL * total_amount
}

/// Display the ingredient list in label order.
pub fn display_ingredients(ingredients: &[Ingredient]) {
    if ingredients.is_empty() {
        println!("Ingredients: (none)");
        return;
    }

    println!();
    println!("=== Ingredients ({} items, label order) ===", ingredients.len());
    println!();

    let width = name_width(ingredients.iter().map(|i| i.name.as_str()));
    for (i, ing) in ingredients.iter().enumerate() {
        let n = &ing.nutrition_per_unit;
        println!(
            "{:>3}. {:<width$}  {:>7.1} kcal  P {:>5.1}  F {:>5.1}  C {:>5.1}  S {:>6.3}",
            i + 1,
            ing.name,
            n.calories,
            n.protein,
            n.fat,
            n.carbs,
            n.salt,
            width = width
        );
    }
    println!();
}

/// Display the solved blend next to the target.
pub fn display_blend(outcome: &BlendOutcome, target: &TargetSpec) {
    println!();
    println!("=== Blend ===");
    println!();

    let entries = outcome.blend.entries();
    let width = name_width(entries.iter().map(|(name, _)| name.as_str()));
    for (i, (name, p)) in entries.iter().enumerate() {
        println!(
            "{:>3}. {:<width$}  {:>8.4} %  {:>10.2} units",
            i + 1,
            name,
            p,
            batch_mass(*p, target.total_amount),
            width = width
        );
    }

    println!();
    println!("--- Nutrition per 100 ---");
    println!(
        "{:<10} {:>10} {:>10} {:>10}",
        "nutrient", "target", "blend", "deviation"
    );
    for nutrient in Nutrient::ALL {
        println!(
            "{:<10} {:>10.3} {:>10.3} {:>+10.4}",
            nutrient.name(),
            target.target.get(nutrient),
            outcome.nutrition.per_100.get(nutrient),
            outcome.deviation.get(nutrient)
        );
    }

    println!();
    println!("--- Summary ---");
    println!("Batch size: {:.2}", target.total_amount);
    println!("Total calories: {:.2}", outcome.nutrition.total.calories);
    println!("Objective: {:.6e}", outcome.objective);
    println!("Iterations: {}", outcome.iterations);
    println!();
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_mass() {
        assert_eq!(batch_mass(25.0, 200.0), 50.0);
        assert_eq!(batch_mass(100.0, 1000.0), 1000.0);
        assert_eq!(batch_mass(0.0, 1000.0), 0.0);
    }

    #[test]
    fn test_name_width() {
        assert_eq!(name_width(["Oats", "Sunflower oil"].into_iter()), 13);
        assert_eq!(name_width(std::iter::empty()), 10);
    }
}
