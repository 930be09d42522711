use std::fs;

use pit_layout::prelude::*;
use pit_layout_examples::{init_tracing, quick};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The hex-like grid lays out exactly 20 holes for 20 desired ones.
    let config = quick(ExperimentConfig::default(), 20, 10)
        .with_start_holes(20)
        .with_hole_size(1.0)
        .with_dump_at_holes(Some(20));

    let mut dumps = Vec::new();
    let mut sink = FnSink::new(|event| {
        if let ExperimentEvent::FieldDumped { dump, .. } = event {
            dumps.push(dump);
        }
    });
    ExperimentRunner::try_new(config)?.run(&mut sink)?;

    for (i, dump) in dumps.iter().enumerate() {
        let path = format!("field-dump-{i}.txt");
        fs::write(&path, dump)?;
        println!("wrote {path}");
    }
    Ok(())
}
