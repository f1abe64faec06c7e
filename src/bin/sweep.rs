use std::path::PathBuf;

use clap::{ArgAction, Parser};

use label_blend_rs::cli::SolverArgs;
use label_blend_rs::error::Result;
use label_blend_rs::exchange::load_request;
use label_blend_rs::sweep::{SweepConfig, print_topk, run_sweep, write_csv, write_summary_json};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Target-sensitivity sweep for the label blend optimizer")]
struct Args {
    /// Path to the request JSON file, or `-` for stdin
    #[arg(short, long, default_value = "request.json")]
    file: String,

    /// Number of perturbed solves
    #[arg(long, default_value = "100")]
    runs: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Maximum deviation of each target field, in percent
    #[arg(long, default_value = "10")]
    spread: f64,

    /// Output CSV file for all runs
    #[arg(long, default_value = "sweep_results.csv")]
    csv: PathBuf,

    /// Output JSON file for the summary
    #[arg(long, default_value = "sweep_summary.json")]
    json: PathBuf,

    /// Number of worst-fitting runs to display
    #[arg(long, default_value = "10")]
    topk: usize,

    #[command(flatten)]
    solver: SolverArgs,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    label_blend_rs::logging::init(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> Result<()> {
    let request = load_request(&args.file)?;
    let ingredients = request.ingredients();
    let target = request.target();
    println!("Loaded {} ingredients from {}", ingredients.len(), args.file);

    let config = SweepConfig {
        runs: args.runs,
        seed: args.seed,
        spread: args.spread / 100.0,
        optimizer: args.solver.resolve()?,
    };

    println!(
        "Running {} solves with targets within ±{}%...",
        config.runs, args.spread
    );
    let report = run_sweep(&ingredients, &target, &config)?;

    println!(
        "Baseline objective: {:.6e}  ({} solved, {} failed)",
        report.baseline.objective,
        report.runs.len(),
        report.failures
    );

    print_topk(&report, args.topk);

    // Output failures are reported but do not discard the other file.
    if let Err(e) = write_csv(&report, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
    } else {
        println!("Wrote all runs to {:?}", args.csv);
    }

    if let Err(e) = write_summary_json(&report, &args.json) {
        eprintln!("Error writing JSON: {}", e);
    } else {
        println!("Wrote summary to {:?}", args.json);
    }

    Ok(())
}
