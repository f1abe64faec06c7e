use crate::models::NutritionVector;

/// Proportions of 100 percent.
pub const PERCENT_TOTAL: f64 = 100.0;

/// Proportions closer to zero than this are clipped to exactly zero.
pub const CLIP_EPSILON: f64 = 1e-9;

/// Default per-nutrient objective weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Default feasibility / convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default cap on solver iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Pivot and reduced-cost threshold inside the simplex tie-break.
pub const PIVOT_EPSILON: f64 = 1e-10;

/// Default batch size when a request omits `total_amount`.
pub const DEFAULT_TOTAL_AMOUNT: f64 = 100.0;

/// Target used when a request carries no `target_nutrition`.
pub const DEFAULT_TARGET: NutritionVector = NutritionVector {
    calories: 299.0,
    protein: 12.0,
    fat: 7.4,
    carbs: 46.4,
    salt: 0.0,
};

// ─────────────────────────────────────────────────────────────────────────────
// Display precision (decimal places) at the response boundary
// ─────────────────────────────────────────────────────────────────────────────

pub const PROPORTION_DECIMALS: u32 = 4;
pub const NUTRITION_DECIMALS: u32 = 2;
pub const SALT_DECIMALS: u32 = 3;
pub const PER_GRAM_DECIMALS: u32 = 4;
pub const PER_GRAM_SALT_DECIMALS: u32 = 5;
pub const DEVIATION_DECIMALS: u32 = 6;
