use serde::{Deserialize, Serialize};

/// The five nutrients tracked on a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Calories,
    Protein,
    Fat,
    Carbs,
    Salt,
}

impl Nutrient {
    pub const ALL: [Nutrient; 5] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbs,
        Nutrient::Salt,
    ];

    pub const COUNT: usize = 5;

    /// Field name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Carbs => "carbs",
            Nutrient::Salt => "salt",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Nutrient::Calories => 0,
            Nutrient::Protein => 1,
            Nutrient::Fat => 2,
            Nutrient::Carbs => 3,
            Nutrient::Salt => 4,
        }
    }
}

/// Nutrition per 100 mass units of a substance.
///
/// Missing fields deserialize to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionVector {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub salt: f64,
}

impl NutritionVector {
    pub fn new(calories: f64, protein: f64, fat: f64, carbs: f64, salt: f64) -> Self {
        Self {
            calories,
            protein,
            fat,
            carbs,
            salt,
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
            Nutrient::Salt => self.salt,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        match nutrient {
            Nutrient::Calories => self.calories = value,
            Nutrient::Protein => self.protein = value,
            Nutrient::Fat => self.fat = value,
            Nutrient::Carbs => self.carbs = value,
            Nutrient::Salt => self.salt = value,
        }
    }

    /// Values in `Nutrient::ALL` order.
    pub fn to_array(&self) -> [f64; Nutrient::COUNT] {
        [self.calories, self.protein, self.fat, self.carbs, self.salt]
    }

    pub fn from_array(values: [f64; Nutrient::COUNT]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4])
    }

    /// Multiply every field by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::from_array(self.to_array().map(|v| v * factor))
    }

    /// First field that is not finite or is negative.
    pub fn invalid_field(&self) -> Option<(Nutrient, f64)> {
        Nutrient::ALL
            .into_iter()
            .map(|n| (n, self.get(n)))
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_field().is_none()
    }
}
