use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::Nutrient;
use crate::sweep::run::{SweepReport, SweepRun};

/// Write one row per successful run: targets, objective, then proportions.
pub fn write_csv(report: &SweepReport, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["run".to_string()];
    header.extend(Nutrient::ALL.iter().map(|n| format!("target_{}", n.name())));
    header.push("objective".to_string());
    header.extend(report.names.iter().cloned());
    wtr.write_record(&header)?;

    for run in &report.runs {
        let mut record = vec![run.index.to_string()];
        record.extend(
            Nutrient::ALL
                .iter()
                .map(|&n| format!("{:.4}", run.target.target.get(n))),
        );
        record.push(format!("{:.6e}", run.outcome.objective));
        record.extend(
            run.outcome
                .blend
                .proportions()
                .iter()
                .map(|p| format!("{:.4}", p)),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the per-ingredient summary as JSON.
pub fn write_summary_json(report: &SweepReport, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&report.summary())?.as_bytes())?;
    Ok(())
}

/// The `k` runs whose targets were hardest to reach.
pub fn worst_runs(report: &SweepReport, k: usize) -> Vec<&SweepRun> {
    let mut runs: Vec<&SweepRun> = report.runs.iter().collect();
    runs.sort_by(|a, b| b.outcome.objective.total_cmp(&a.outcome.objective));
    runs.truncate(k);
    runs
}

/// Print the top-k runs by objective to stdout.
pub fn print_topk(report: &SweepReport, k: usize) {
    let top = worst_runs(report, k);
    println!("\n=== Top {} Runs (by objective) ===\n", top.len());

    for (rank, run) in top.iter().enumerate() {
        let t = &run.target.target;
        println!(
            "#{} (run {}): objective={:.6e}  target kcal={:.1} P={:.2} F={:.2} C={:.2} S={:.3}",
            rank + 1,
            run.index,
            run.outcome.objective,
            t.calories,
            t.protein,
            t.fat,
            t.carbs,
            t.salt
        );
        let blend: Vec<String> = run
            .outcome
            .blend
            .entries()
            .iter()
            .map(|(name, p)| format!("{}={:.2}%", name, p))
            .collect();
        println!("    {}", blend.join(" "));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, NutritionVector, TargetSpec};
    use crate::sweep::run::{SweepConfig, run_sweep};

    fn report() -> SweepReport {
        let ingredients = vec![
            Ingredient::new("Oats", NutritionVector::new(380.0, 13.0, 7.0, 66.0, 0.02)),
            Ingredient::new("Honey", NutritionVector::new(304.0, 0.3, 0.0, 82.0, 0.01)),
        ];
        let target = TargetSpec::new(NutritionVector::new(360.0, 9.0, 5.0, 70.0, 0.015), 100.0);
        let config = SweepConfig {
            runs: 5,
            seed: 9,
            ..Default::default()
        };
        run_sweep(&ingredients, &target, &config).unwrap()
    }

    #[test]
    fn test_csv_has_one_row_per_run() {
        let report = report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        write_csv(&report, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.len(), 1 + 5 + 1 + 2);
        assert_eq!(&headers[0], "run");
        assert_eq!(&headers[7], "Oats");
        assert_eq!(rdr.records().count(), report.runs.len());
    }

    #[test]
    fn test_summary_json_counts() {
        let report = report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let total = value["successes"].as_u64().unwrap() + value["failures"].as_u64().unwrap();
        assert_eq!(total, 5);
        assert_eq!(value["ingredients"][1]["name"], "Honey");
    }

    #[test]
    fn test_worst_runs_sorted_descending() {
        let report = report();
        let top = worst_runs(&report, 3);
        assert!(top.len() <= 3);
        for pair in top.windows(2) {
            assert!(pair[0].outcome.objective >= pair[1].outcome.objective);
        }
    }
}
