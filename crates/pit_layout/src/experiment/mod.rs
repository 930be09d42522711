//! Monte Carlo experiments over a range of hole counts.
//!
//! An [`ExperimentRunner`] plays one layout per desired hole count against a freshly placed
//! treasure, many times over, and reports the success rate of each distinct layout as a
//! [`ResultRow`]. Progress is observable through an [`EventSink`]; [`CsvResultsSink`] writes the
//! rows as a results file.
pub mod cache;
pub mod config;
pub mod events;
pub mod results;
pub mod runner;

pub use cache::DatasetCache;
pub use config::{ExperimentConfig, LayoutSpec, SmallHoles, TreasureSpec};
pub use events::{
    EventSink, ExperimentEvent, ExperimentEventKind, FnSink, MultiSink, VecSink,
};
pub use results::{read_results, read_results_path, CsvResultsSink, ResultRow};
pub use runner::{ExperimentRunner, ExperimentSummary};
