use pit_layout::prelude::*;
use pit_layout_examples::{init_tracing, quick, run_to_csv};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Circle of radius 3.5 on a 100 x 100 field, bordered hexagonal-like grid of 0.5 holes.
    let config = quick(ExperimentConfig::default(), 400, 500).with_hole_increment(5);
    let summary = run_to_csv(config, "experiment-hexlike-circle.csv")?;

    if let Some(last) = summary.rows.last() {
        println!(
            "{} rows, last: {} holes -> {:.1}% success",
            summary.rows.len(),
            last.actual_holes,
            last.success_rate
        );
    }
    Ok(())
}
