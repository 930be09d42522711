#![forbid(unsafe_code)]

use std::path::Path;

use pit_layout::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Runs `config` and writes its results CSV to `out_path`.
pub fn run_to_csv(
    config: ExperimentConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<ExperimentSummary> {
    let out_path = out_path.as_ref();
    let point_cloud = config.treasure.is_point_cloud();
    let mut sink = CsvResultsSink::create(out_path, point_cloud)?;
    let mut runner = ExperimentRunner::try_new(config)?;
    let summary = runner.run(&mut sink)?;
    sink.finish()?;
    info!(
        path = %out_path.display(),
        rows = summary.rows.len(),
        trials = summary.trials,
        "results written"
    );
    Ok(summary)
}

/// Settings that keep a demo run down to a few seconds.
pub fn quick(config: ExperimentConfig, max_holes: usize, repeats: usize) -> ExperimentConfig {
    config
        .with_max_holes(max_holes)
        .with_repeats(repeats)
        .with_small_holes_repeats(None)
        .with_seed(Some(42))
}
