use std::fs::File;
use std::io::{BufWriter, Write};

use pit_layout::prelude::*;
use pit_layout_examples::{init_tracing, quick, run_to_csv};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const ARTEFACTS: usize = 400;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A synthetic site: artefacts scattered around two scatter centres, 20 x 12 units overall.
    let dataset = "point-cloud-site-artefacts.csv";
    write_artefacts(dataset)?;

    let config = quick(
        ExperimentConfig::new(
            TreasureSpec::PointCloud {
                path: dataset.into(),
            },
            LayoutSpec::default(),
        ),
        200,
        200,
    )
    .with_hole_increment(5)
    .with_return_after_hit(false);
    let summary = run_to_csv(config, "point-cloud-site.csv")?;

    for row in summary.rows.iter().step_by(5) {
        println!(
            "{:>4} holes: {:>5.1}% success, {:.2} artefacts, {:.2} holes with finds",
            row.actual_holes,
            row.success_rate,
            row.artefacts.unwrap_or_default(),
            row.holes_succeeded.unwrap_or_default()
        );
    }
    Ok(())
}

fn write_artefacts(path: &str) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut unit = move || (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64;

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "id,xcoord,ycoord")?;
    for i in 0..ARTEFACTS {
        let (cx, cy) = if i % 3 == 0 { (4.0, 3.0) } else { (14.0, 8.0) };
        let x = (cx + (unit() - 0.5) * 8.0).clamp(0.0, 20.0);
        let y = (cy + (unit() - 0.5) * 6.0).clamp(0.0, 12.0);
        writeln!(out, "{i},{x},{y}")?;
    }
    out.flush()?;
    Ok(())
}
