use pit_layout::names::display_name;
use pit_layout::prelude::*;
use pit_layout_examples::{init_tracing, quick, run_to_csv};

const MAX_HOLES: usize = 300;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let presets = [
        ("staggerXY", ExperimentConfig::stagger_xy()),
        ("randomisedStaggerXY sd8", ExperimentConfig::randomised_stagger_xy(8.0)),
        ("hex", ExperimentConfig::hexagonal()),
        ("halton", ExperimentConfig::halton()),
        ("random", ExperimentConfig::random()),
    ];

    // Same stop threshold for every layout so the curves cover the same range.
    let mut areas = Vec::new();
    for (code, preset) in presets {
        let config = quick(preset, MAX_HOLES, 300).with_stop_threshold(101.0);
        let path = format!("layouts-compare-{}.csv", code.replace(' ', "-"));
        let summary = run_to_csv(config, &path)?;
        areas.push((code, area_under_curve(&summary.rows, MAX_HOLES)));
    }

    areas.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (code, area) in areas {
        println!("{:<22} {:>10.0}", display_name(code, true), area);
    }
    Ok(())
}
