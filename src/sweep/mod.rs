pub mod output;
pub mod perturb;
pub mod run;

pub use output::{print_topk, worst_runs, write_csv, write_summary_json};
pub use perturb::{Perturbation, validate_spread};
pub use run::{ProportionStats, SweepConfig, SweepReport, SweepRun, SweepSummary, run_sweep};
