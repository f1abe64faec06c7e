use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::Result;
use crate::exchange::STDIO_PATH;
use crate::optimizer::{NutrientWeights, OptimizerConfig};

/// label_blend - recover ingredient proportions from a product's declared nutrition.
#[derive(Parser, Debug)]
#[command(name = "label_blend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the request JSON file, or `-` for stdin.
    #[arg(short, long, default_value = STDIO_PATH, global = true)]
    pub file: String,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Solve the request and write the response JSON.
    Optimize {
        /// Write the response here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the request without solving.
    Check,

    /// Prompt for the target, solve, and show the blend as a table.
    Interactive,
}

impl Default for Command {
    fn default() -> Self {
        Command::Optimize { output: None }
    }
}

/// Solver options shared by every binary.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SolverArgs {
    /// Optimizer config JSON; flags below override its fields.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Nutrient weights as "calories,protein,fat,carbs,salt".
    #[arg(long, global = true)]
    pub weights: Option<String>,

    #[arg(long, global = true)]
    pub tolerance: Option<f64>,

    #[arg(long, global = true)]
    pub max_iterations: Option<usize>,

    /// Wall-clock limit for a single solve.
    #[arg(long, global = true)]
    pub time_limit_ms: Option<u64>,
}

impl SolverArgs {
    /// Defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => OptimizerConfig::load(path)?,
            None => OptimizerConfig::default(),
        };

        if let Some(weights) = &self.weights {
            config.weights = weights.parse::<NutrientWeights>()?;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if let Some(ms) = self.time_limit_ms {
            config.time_limit_ms = Some(ms);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlendError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_command_is_optimize_on_stdin() {
        let cli = Cli::parse_from(["label_blend"]);
        assert_eq!(cli.command.unwrap_or_default(), Command::Optimize { output: None });
        assert_eq!(cli.file, "-");
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "label_blend",
            "check",
            "--file",
            "req.json",
            "--tolerance",
            "1e-8",
            "-vv",
        ]);
        assert_eq!(cli.command, Some(Command::Check));
        assert_eq!(cli.file, "req.json");
        assert_eq!(cli.solver.tolerance, Some(1e-8));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"tolerance": 1e-7, "max_iterations": 50}"#)
            .unwrap();

        let args = SolverArgs {
            config: Some(file.path().to_path_buf()),
            weights: Some("2,1,1,1,0.5".to_string()),
            max_iterations: Some(80),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.tolerance, 1e-7);
        assert_eq!(config.max_iterations, 80);
        assert_eq!(config.weights.calories, 2.0);
        assert_eq!(config.weights.salt, 0.5);
    }

    #[test]
    fn test_bad_override_is_configuration_error() {
        let args = SolverArgs {
            weights: Some("1,1,1".to_string()),
            ..Default::default()
        };
        assert!(matches!(args.resolve(), Err(BlendError::Configuration(_))));

        let args = SolverArgs {
            max_iterations: Some(0),
            ..Default::default()
        };
        assert!(matches!(args.resolve(), Err(BlendError::Configuration(_))));
    }
}
