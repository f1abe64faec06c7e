use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::exchange::round_to;
use crate::models::{BlendOutcome, Ingredient, TargetSpec};
use crate::optimizer::constants::PROPORTION_DECIMALS;
use crate::optimizer::{OptimizerConfig, optimize_with_config, validate_inputs};
use crate::sweep::perturb::{Perturbation, validate_spread};

/// Configuration for a target-sensitivity sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub runs: usize,
    pub seed: u64,
    /// Fractional spread of each target factor around 1.
    pub spread: f64,
    pub optimizer: OptimizerConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            seed: 123,
            spread: 0.1,
            optimizer: OptimizerConfig::default(),
        }
    }
}

/// One successful perturbed solve.
#[derive(Debug, Clone)]
pub struct SweepRun {
    /// 1-based run number.
    pub index: usize,
    pub target: TargetSpec,
    pub outcome: BlendOutcome,
}

/// Everything a sweep produced.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub names: Vec<String>,
    pub seed: u64,
    pub spread: f64,
    /// Solve at the unperturbed target.
    pub baseline: BlendOutcome,
    pub runs: Vec<SweepRun>,
    pub failures: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionStats {
    pub name: String,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub baseline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub seed: u64,
    pub spread: f64,
    pub successes: usize,
    pub failures: usize,
    pub ingredients: Vec<ProportionStats>,
}

impl SweepReport {
    /// Per-ingredient proportion ranges over the successful runs.
    pub fn summary(&self) -> SweepSummary {
        let baseline = self.baseline.blend.proportions();
        let ingredients = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<f64> = self
                    .runs
                    .iter()
                    .map(|r| r.outcome.blend.proportions()[i])
                    .collect();
                let (min, mean, max) = if values.is_empty() {
                    (baseline[i], baseline[i], baseline[i])
                } else {
                    (
                        values.iter().copied().fold(f64::INFINITY, f64::min),
                        values.iter().sum::<f64>() / values.len() as f64,
                        values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    )
                };
                ProportionStats {
                    name: name.clone(),
                    min: round_to(min, PROPORTION_DECIMALS),
                    mean: round_to(mean, PROPORTION_DECIMALS),
                    max: round_to(max, PROPORTION_DECIMALS),
                    baseline: round_to(baseline[i], PROPORTION_DECIMALS),
                }
            })
            .collect();

        SweepSummary {
            seed: self.seed,
            spread: self.spread,
            successes: self.runs.len(),
            failures: self.failures,
            ingredients,
        }
    }
}

/// Re-solve under randomly scaled targets.
///
/// Invalid input fails up front; a run that fails to solve is counted and skipped.
pub fn run_sweep(
    ingredients: &[Ingredient],
    target: &TargetSpec,
    config: &SweepConfig,
) -> Result<SweepReport> {
    validate_spread(config.spread)?;
    config.optimizer.validate()?;
    validate_inputs(ingredients, target)?;

    let baseline = optimize_with_config(ingredients, target, &config.optimizer)?;
    info!(objective = baseline.objective, "baseline solved");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut runs = Vec::with_capacity(config.runs);
    let mut failures = 0;

    for index in 1..=config.runs {
        let perturbed = Perturbation::random(&mut rng, config.spread).apply(target);
        match optimize_with_config(ingredients, &perturbed, &config.optimizer) {
            Ok(outcome) => runs.push(SweepRun {
                index,
                target: perturbed,
                outcome,
            }),
            Err(e) => {
                warn!(run = index, error = %e, "sweep run failed");
                failures += 1;
            }
        }
    }

    info!(successes = runs.len(), failures, "sweep finished");

    Ok(SweepReport {
        names: ingredients.iter().map(|i| i.name.clone()).collect(),
        seed: config.seed,
        spread: config.spread,
        baseline,
        runs,
        failures,
    })
}
