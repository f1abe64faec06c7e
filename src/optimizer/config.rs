use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BlendError, Result};
use crate::models::Nutrient;
use crate::optimizer::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, DEFAULT_WEIGHT};

/// Per-nutrient multipliers on the squared relative deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientWeights {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub salt: f64,
}

impl Default for NutrientWeights {
    fn default() -> Self {
        Self {
            calories: DEFAULT_WEIGHT,
            protein: DEFAULT_WEIGHT,
            fat: DEFAULT_WEIGHT,
            carbs: DEFAULT_WEIGHT,
            salt: DEFAULT_WEIGHT,
        }
    }
}

impl NutrientWeights {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Carbs => self.carbs,
            Nutrient::Salt => self.salt,
        }
    }

    pub fn to_array(&self) -> [f64; Nutrient::COUNT] {
        [self.calories, self.protein, self.fat, self.carbs, self.salt]
    }
}

/// Parses `"calories,protein,fat,carbs,salt"`, e.g. `"1,2,1,1,0.5"`.
impl FromStr for NutrientWeights {
    type Err = BlendError;

    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| BlendError::configuration(format!("Invalid weight '{}'", part.trim())))
            })
            .collect::<Result<_>>()?;

        if values.len() != Nutrient::COUNT {
            return Err(BlendError::configuration(format!(
                "Expected {} comma-separated weights, got {}",
                Nutrient::COUNT,
                values.len()
            )));
        }

        Ok(Self {
            calories: values[0],
            protein: values[1],
            fat: values[2],
            carbs: values[3],
            salt: values[4],
        })
    }
}

/// Optimizer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub weights: NutrientWeights,
    /// Feasibility and convergence epsilon.
    pub tolerance: f64,
    /// Cap on solver iterations.
    pub max_iterations: usize,
    /// Wall-clock budget for one solve, in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weights: NutrientWeights::default(),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_limit_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Load a config from a JSON file; absent fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: OptimizerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Reject weights, tolerance, or iteration caps the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        for nutrient in Nutrient::ALL {
            let w = self.weights.get(nutrient);
            if !w.is_finite() || w <= 0.0 {
                return Err(BlendError::configuration(format!(
                    "Weight for {} must be finite and positive, got {}",
                    nutrient.name(),
                    w
                )));
            }
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(BlendError::configuration(format!(
                "Tolerance must lie in (0, 1), got {}",
                self.tolerance
            )));
        }

        if self.max_iterations == 0 {
            return Err(BlendError::configuration(
                "max_iterations must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.weights.to_array(), [1.0; 5]);
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_iterations, 500);
        assert!(config.time_limit().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_weights() {
        let w: NutrientWeights = "1, 2,0.5,1,3".parse().unwrap();
        assert_eq!(w.to_array(), [1.0, 2.0, 0.5, 1.0, 3.0]);

        assert!("1,2,3".parse::<NutrientWeights>().is_err());
        assert!("1,2,x,4,5".parse::<NutrientWeights>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = OptimizerConfig::default();
        config.weights.salt = 0.0;
        assert!(matches!(config.validate(), Err(BlendError::Configuration(_))));

        let config = OptimizerConfig {
            tolerance: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OptimizerConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let json = r#"{"weights": {"salt": 4.0}, "max_iterations": 50}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = OptimizerConfig::load(file.path()).unwrap();
        assert_eq!(config.weights.salt, 4.0);
        assert_eq!(config.weights.calories, 1.0);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.tolerance, 1e-6);
    }
}
