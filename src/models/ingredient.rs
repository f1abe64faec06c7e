use crate::models::NutritionVector;

/// An ingredient as declared on a label.
///
/// Its identity is its position in the declared sequence; the name is only
/// the key it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    /// Passed through from the profile table, unused by the optimizer.
    pub category: String,
    pub nutrition_per_unit: NutritionVector,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, nutrition_per_unit: NutritionVector) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            nutrition_per_unit,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Target nutrition (per 100 mass units) for a finished product of `total_amount` mass units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpec {
    pub target: NutritionVector,
    pub total_amount: f64,
}

impl TargetSpec {
    pub fn new(target: NutritionVector, total_amount: f64) -> Self {
        Self {
            target,
            total_amount,
        }
    }
}

/// Label-order constraint: `heavier` must hold at least the proportion of `lighter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderConstraint {
    pub heavier: usize,
    pub lighter: usize,
}

impl OrderConstraint {
    /// One constraint per adjacent pair in declared order.
    pub fn chain(len: usize) -> Vec<OrderConstraint> {
        (1..len)
            .map(|i| OrderConstraint {
                heavier: i - 1,
                lighter: i,
            })
            .collect()
    }

    /// Amount by which `proportions` violates this constraint (0 when satisfied).
    pub fn violation(&self, proportions: &[f64]) -> f64 {
        (proportions[self.lighter] - proportions[self.heavier]).max(0.0)
    }
}
