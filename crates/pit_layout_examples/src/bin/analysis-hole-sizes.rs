use pit_layout::prelude::*;
use pit_layout_examples::{init_tracing, quick, run_to_csv};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // How many 0.5 holes match the success of one 1.0 hole?
    let small = quick(ExperimentConfig::default(), 600, 300)
        .with_hole_size(0.5)
        .with_hole_increment(5);
    let big = quick(ExperimentConfig::default(), 300, 300)
        .with_hole_size(1.0)
        .with_hole_increment(5);
    run_to_csv(small, "analysis-small-holes.csv")?;
    run_to_csv(big, "analysis-big-holes.csv")?;

    // Read the curves back the way a later analysis session would.
    let small = read_results_path("analysis-small-holes.csv")?;
    let big = read_results_path("analysis-big-holes.csv")?;

    match break_even_ratios(&small, &big) {
        Some((max, mean)) => {
            println!("break-even ratio: max {max:.2}, mean {mean:.2}");
            let diff = maximum_difference_in_success(&small, &big, mean);
            println!("largest success difference at the mean ratio: {diff:+.1}%");
        }
        None => println!("the curves share no success rate"),
    }
    Ok(())
}
