#![forbid(unsafe_code)]
//! pit_layout: Monte Carlo simulation of archaeological test-pit layouts.
//!
//! Modules:
//! - geometry: square holes, bounding boxes and polygons
//! - treasure: circle, rectangle, polygon and artefact point-cloud sites
//! - field: the rectangular site, treasure placement and digging
//! - layout: strategies that dig a desired number of holes into a field
//! - experiment: configuration, runner, events, dataset cache and the results CSV
//! - analysis: comparisons of success curves read back from results files
//! - names: display names for layout codes
//!
//! For runnable demos, see the `pit_layout_examples` crate.
pub mod analysis;
pub mod error;
pub mod experiment;
pub mod field;
pub mod geometry;
pub mod layout;
pub mod names;
pub mod random;
pub mod treasure;

/// Convenient re-exports for common types. Import with `use pit_layout::prelude::*;`.
pub mod prelude {
    pub use crate::analysis::{
        area_under_curve, break_even_ratios, interpolate_holes_for_success,
        maximum_difference_in_success, success_per_hole_count,
    };
    pub use crate::error::{Error, Result};
    pub use crate::experiment::{
        read_results, read_results_path, CsvResultsSink, DatasetCache, EventSink,
        ExperimentConfig, ExperimentEvent, ExperimentEventKind, ExperimentRunner,
        ExperimentSummary, FnSink, LayoutSpec, MultiSink, ResultRow, SmallHoles, TreasureSpec,
        VecSink,
    };
    pub use crate::field::{hole_distances, Dig, Field, FieldKind};
    pub use crate::geometry::{Aabb, Hole, Polygon};
    pub use crate::layout::{
        DigOutcome, HaltonLayout, HexLikeLayout, HexagonalLayout, Jitter, Layout, RandomLayout,
        SpecifiedGridLayout, SquareGridLayout, StaggeredGrid,
    };
    pub use crate::random::seed_from_clock;
    pub use crate::treasure::{ArtefactCloud, Treasure, TreasureShape};
}
