use dialoguer::{Confirm, Input};

use crate::error::{BlendError, Result};
use crate::models::{Nutrient, NutritionVector, TargetSpec};

/// Parse a prompt answer as a number.
pub fn parse_number(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BlendError::configuration(format!("Invalid number '{}'", trimmed)))
}

/// Prompt for a number, offering `default`.
pub fn prompt_number(prompt: &str, default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    parse_number(&input)
}

/// Prompt for every target field, then the batch size.
pub fn prompt_target(defaults: &TargetSpec) -> Result<TargetSpec> {
    let mut target = NutritionVector::default();
    for nutrient in Nutrient::ALL {
        let value = prompt_number(
            &format!("Target {} per 100", nutrient.name()),
            defaults.target.get(nutrient),
        )?;
        target.set(nutrient, value);
    }

    let total_amount = prompt_number("Batch size (mass units)", defaults.total_amount)?;
    Ok(TargetSpec::new(target, total_amount))
}

/// Prompt for a file path.
pub fn prompt_path(prompt: &str, default: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
