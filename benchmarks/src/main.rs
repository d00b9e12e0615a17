// Timing run for the treatment lifecycle.
// Criterion benchmarks: cargo bench --package benchmarks

use benchmarks::{benchmark_with_warmup, SyntheticData, SyntheticSpec};
use crossframe::{ExecutionMode, Treatment, TreatmentConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("crossframe benchmark suite");
    println!();

    for rows in [1_000, 10_000, 50_000] {
        let spec = SyntheticSpec {
            rows,
            ..SyntheticSpec::default()
        };
        let data = SyntheticData::generate(&spec)?;
        let frame = data.frame;
        println!("rows = {rows}, columns = {}", frame.n_cols());

        for (label, mode) in [
            ("sequential", ExecutionMode::Sequential),
            ("parallel", ExecutionMode::Parallel),
        ] {
            let config = TreatmentConfig::regression()
                .with_execution(mode)
                .with_ignored_columns([data.binary_outcome]);
            let (fit, stats) = benchmark_with_warmup(1, 5, || {
                let mut treatment = Treatment::new(config.clone())?;
                let fit = treatment.fit_transform(&frame, data.regression_outcome)?;
                Ok::<_, crossframe::TreatmentError>((treatment, fit.report))
            });
            let (treatment, report) = fit?;
            println!(
                "  fit_transform {label:<10} {stats}  ({} derived, {} selected)",
                report.derived_columns, report.selected_columns
            );

            let (_, stats) = benchmark_with_warmup(1, 10, || treatment.transform(&frame));
            println!("  transform     {label:<10} {stats}");
        }
        println!();
    }
    Ok(())
}
