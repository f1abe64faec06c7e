use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::error;

use label_blend_rs::cli::{Cli, Command};
use label_blend_rs::error::{BlendError, Result};
use label_blend_rs::exchange::{
    ErrorResponse, OptimizationResponse, STDIO_PATH, load_request, write_json,
};
use label_blend_rs::interface::{
    display_blend, display_ingredients, prompt_path, prompt_target, prompt_yes_no,
};
use label_blend_rs::optimizer::{OptimizerConfig, optimize_with_config, validate_inputs};

fn main() {
    let cli = Cli::parse();
    label_blend_rs::logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        error!(user_correctable = e.is_user_correctable(), "{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.clone().unwrap_or_default();

    match command {
        Command::Optimize { output } => {
            let result = cli.solver.resolve().and_then(|config| cmd_optimize(&cli.file, &config));
            respond(output.as_deref(), result)
        }
        Command::Check => {
            let result = cli.solver.resolve().and_then(|_| cmd_check(&cli.file));
            respond(None, result)
        }
        Command::Interactive => {
            let config = cli.solver.resolve()?;
            cmd_interactive(&cli.file, &config)
        }
    }
}

/// Write the success body, or `{"error": ...}` before handing the error back.
fn respond<T: Serialize>(output: Option<&Path>, result: Result<T>) -> Result<()> {
    match result {
        Ok(body) => write_json(output, &body),
        Err(e) => {
            write_json(output, &ErrorResponse::new(&e))?;
            Err(e)
        }
    }
}

/// Solve a request and build the response body.
fn cmd_optimize(file: &str, config: &OptimizerConfig) -> Result<OptimizationResponse> {
    let request = load_request(file)?;
    let ingredients = request.ingredients();
    let target = request.target();

    let outcome = optimize_with_config(&ingredients, &target, config)?;
    Ok(OptimizationResponse::new(&ingredients, &outcome))
}

/// Validate a request without solving.
fn cmd_check(file: &str) -> Result<serde_json::Value> {
    let request = load_request(file)?;
    let ingredients = request.ingredients();
    validate_inputs(&ingredients, &request.target())?;

    Ok(serde_json::json!({
        "valid": true,
        "ingredients": ingredients.len(),
    }))
}

/// Prompt for the target, solve, render, and optionally save the response.
fn cmd_interactive(file: &str, config: &OptimizerConfig) -> Result<()> {
    if file == STDIO_PATH {
        return Err(BlendError::configuration(
            "interactive mode needs a request file (--file), stdin is used for prompts",
        ));
    }

    let request = load_request(file)?;
    let ingredients = request.ingredients();
    display_ingredients(&ingredients);

    let target = prompt_target(&request.target())?;
    validate_inputs(&ingredients, &target)?;

    println!();
    println!("Optimizing {} ingredients...", ingredients.len());
    let outcome = optimize_with_config(&ingredients, &target, config)?;

    display_blend(&outcome, &target);

    if prompt_yes_no("Save response JSON?", false)? {
        let path = PathBuf::from(prompt_path("Output file", "blend_response.json")?);
        write_json(Some(&path), &OptimizationResponse::new(&ingredients, &outcome))?;
        println!("Response saved to {}.", path.display());
    }

    Ok(())
}
