//! Customer churn treatment: design on a training split, apply to a holdout.
//!
//! Demonstrates:
//! - Mixed categorical / numeric input with missing values
//! - Cross-validated impact coding for a binary outcome
//! - Variable scoring and pruning
//! - Persisting the plan and applying it to unseen rows

use crossframe::{Frame, Treatment, TreatmentConfig, TransformPlan};
use std::error::Error;

/// Synthetic churn table.
///
/// Columns:
/// - plan: subscription tier (`basic`, `plus`, `pro`, `trial`), sometimes missing
/// - region: sales region, unrelated to churn
/// - tenure: months as a customer, sometimes missing
/// - churned: `yes` / `no`
fn create_churn_data(n: usize) -> Result<Frame, Box<dyn Error>> {
    let tiers = ["basic", "plus", "pro", "trial"];
    let regions = ["emea", "apac", "amer"];

    let mut plan = Vec::with_capacity(n);
    let mut region = Vec::with_capacity(n);
    let mut tenure = Vec::with_capacity(n);
    let mut churned = Vec::with_capacity(n);
    for i in 0..n {
        let tier = tiers[(i * 7 + i / 11) % 4];
        let months = ((i * 37) % 60) as f64;
        plan.push((i % 17 != 3).then(|| tier.to_string()));
        region.push(Some(regions[(i * 5) % 3].to_string()));
        tenure.push((i % 19 != 0).then_some(months));

        // trial users and short tenure churn more often
        let risk = match tier {
            "trial" => 0.6,
            "basic" => 0.3,
            _ => 0.1,
        } + if months < 12.0 { 0.25 } else { 0.0 };
        let draw = ((i * 7919) % 1000) as f64 / 1000.0;
        churned.push(Some(if draw < risk { "yes" } else { "no" }.to_string()));
    }

    Ok(Frame::builder()
        .categorical("plan", plan)
        .categorical("region", region)
        .numeric("tenure", tenure)
        .categorical("churned", churned)
        .build()?)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Churn Treatment Example ===\n");

    let data = create_churn_data(1_000)?;
    let train_rows: Vec<usize> = (0..800).collect();
    let holdout_rows: Vec<usize> = (800..1_000).collect();
    let train = data.take_rows(&train_rows);
    let holdout = data.take_rows(&holdout_rows);
    println!(
        "Train: {} rows, Holdout: {} rows\n",
        train.n_rows(),
        holdout.n_rows()
    );

    // 1. Design the treatment
    let config = TreatmentConfig::binary_classification("yes").with_seed(17);
    let mut treatment = Treatment::new(config)?;
    let fit = treatment.fit_transform(&train, "churned")?;
    println!("--- Fit Report ---");
    println!("{:#?}\n", fit.report);

    // 2. Inspect scores
    println!("--- Variable Scores ---");
    if let Some(scores) = treatment.score_frame() {
        for score in scores.iter() {
            println!(
                "{:<20} r2={:.4} p={:.2e} recommended={} {}",
                score.variable,
                score.r_squared,
                score.significance,
                score.recommended,
                score
                    .rejection
                    .map(|r| format!("({r:?})"))
                    .unwrap_or_default()
            );
        }
    }
    println!("\nTraining frame columns: {:?}\n", fit.frame.column_names());

    // 3. Persist the plan and reload it
    let path = std::env::temp_dir().join("churn_plan.json");
    treatment.plan()?.save_to_file(&path)?;
    let plan = TransformPlan::load_from_file(&path)?;
    println!("Saved plan to {}", path.display());

    // 4. Apply to the holdout
    let scorer = Treatment::from_plan(plan);
    let applied = scorer.transform(&holdout)?;
    for warning in &applied.warnings {
        println!("warning: {warning}");
    }
    println!(
        "Holdout frame: {} rows x {} columns",
        applied.frame.n_rows(),
        applied.frame.n_cols()
    );
    let matrix = applied.frame.to_array2();
    println!("First holdout row: {:?}", matrix.row(0).to_vec());

    Ok(())
}
