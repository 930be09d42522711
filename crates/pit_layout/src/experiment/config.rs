//! Experiment configuration: what is hidden, how holes are laid out, and how many trials run.
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::experiment::cache::DatasetCache;
use crate::layout::random::DEFAULT_BUCKETS;
use crate::layout::{
    HaltonLayout, HexLikeLayout, HexagonalLayout, Jitter, Layout, RandomLayout,
    SpecifiedGridLayout, SquareGridLayout,
};
use crate::treasure::TreasureShape;

/// Hole layout strategy of an experiment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutSpec {
    HexLike {
        lr_border: bool,
        stagger_y: bool,
        jitter: Option<Jitter>,
    },
    Hexagonal {
        stagger_y: bool,
    },
    Halton {
        border: bool,
    },
    Random {
        border: bool,
        buckets: usize,
    },
    SquareGrid,
    /// A fixed grid; the requested hole count is ignored.
    SpecifiedGrid {
        columns: usize,
        rows: usize,
        stagger_y: bool,
    },
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec::HexLike {
            lr_border: true,
            stagger_y: false,
            jitter: None,
        }
    }
}

impl LayoutSpec {
    /// The layout that digs `holes` holes of side `hole_size`.
    pub fn build(&self, hole_size: f64, holes: usize) -> Box<dyn Layout> {
        match *self {
            LayoutSpec::HexLike {
                lr_border,
                stagger_y,
                jitter,
            } => Box::new(
                HexLikeLayout::new(hole_size, holes)
                    .with_lr_border(lr_border)
                    .with_stagger_y(stagger_y)
                    .with_jitter(jitter),
            ),
            LayoutSpec::Hexagonal { stagger_y } => {
                Box::new(HexagonalLayout::new(hole_size, holes).with_stagger_y(stagger_y))
            }
            LayoutSpec::Halton { border } => {
                Box::new(HaltonLayout::new(hole_size, holes).with_border(border))
            }
            LayoutSpec::Random { border, buckets } => Box::new(
                RandomLayout::new(hole_size, holes)
                    .with_border(border)
                    .with_buckets(buckets),
            ),
            LayoutSpec::SquareGrid => Box::new(SquareGridLayout::new(hole_size, holes)),
            LayoutSpec::SpecifiedGrid {
                columns,
                rows,
                stagger_y,
            } => Box::new(
                SpecifiedGridLayout::new(hole_size, columns, rows).with_stagger_y(stagger_y),
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        self.build(1.0, 1).name()
    }
}

/// Treasure hidden in every trial of an experiment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TreasureSpec {
    Circle {
        radius: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    /// Polygon read from an ESRI `.shp` file, optionally turned by 90°.
    Polygon {
        path: PathBuf,
        rotate: bool,
    },
    /// Artefact coordinates read from a CSV file.
    PointCloud {
        path: PathBuf,
    },
    /// A shape built in memory.
    #[cfg_attr(feature = "serde", serde(skip))]
    Shape(TreasureShape),
}

impl Default for TreasureSpec {
    fn default() -> Self {
        TreasureSpec::Circle { radius: 3.5 }
    }
}

impl TreasureSpec {
    /// The shape to place, with datasets loaded through `cache`.
    pub fn resolve(&self, cache: &mut DatasetCache) -> Result<TreasureShape> {
        Ok(match self {
            TreasureSpec::Circle { radius } => TreasureShape::Circle { radius: *radius },
            TreasureSpec::Rectangle { width, height } => TreasureShape::Rectangle {
                width: *width,
                height: *height,
            },
            TreasureSpec::Polygon { path, rotate } => {
                TreasureShape::Polygon(cache.polygon(path, *rotate)?)
            }
            TreasureSpec::PointCloud { path } => TreasureShape::PointCloud(cache.point_cloud(path)?),
            TreasureSpec::Shape(shape) => shape.clone(),
        })
    }

    /// True when trials report artefact counts.
    pub fn is_point_cloud(&self) -> bool {
        matches!(
            self,
            TreasureSpec::PointCloud { .. } | TreasureSpec::Shape(TreasureShape::PointCloud(_))
        )
    }
}

/// A setting that replaces the regular one while the desired hole count is at most `up_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmallHoles {
    pub value: usize,
    pub up_to: usize,
}

impl SmallHoles {
    pub fn new(value: usize, up_to: usize) -> Self {
        Self { value, up_to }
    }
}

/// Configuration for running an experiment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Side of the square field.
    pub field_size: f64,
    /// Side of each square hole.
    pub hole_size: f64,
    pub treasure: TreasureSpec,
    pub layout: LayoutSpec,
    /// First desired hole count.
    pub start_holes: usize,
    /// Last desired hole count.
    pub max_holes: usize,
    pub hole_increment: usize,
    /// Increment used for small desired hole counts.
    pub small_holes_increment: Option<SmallHoles>,
    /// Trials per desired hole count.
    pub repeats: usize,
    /// Trials used for small desired hole counts.
    pub small_holes_repeats: Option<SmallHoles>,
    /// Stop once a success rate (percent) reaches this value.
    pub stop_threshold: f64,
    /// Dump the second trial's field when a layout digs exactly this many holes.
    pub dump_at_holes: Option<usize>,
    /// RNG seed; derived from the clock when absent.
    pub seed: Option<u64>,
    /// Stop digging a trial at its first hit.
    pub return_after_hit: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            field_size: 100.0,
            hole_size: 0.5,
            treasure: TreasureSpec::default(),
            layout: LayoutSpec::default(),
            start_holes: 1,
            max_holes: 10_000,
            hole_increment: 1,
            small_holes_increment: None,
            repeats: 10_000,
            small_holes_repeats: None,
            stop_threshold: 100.0,
            dump_at_holes: None,
            seed: None,
            return_after_hit: true,
        }
    }
}

/// Trials per desired hole count in the layout comparison presets.
const PRESET_REPEATS: usize = 3_000;

impl ExperimentConfig {
    pub fn new(treasure: TreasureSpec, layout: LayoutSpec) -> Self {
        Self {
            treasure,
            layout,
            ..Default::default()
        }
    }

    /// Shared base of the layout comparison presets.
    fn layout_comparison(layout: LayoutSpec) -> Self {
        Self {
            layout,
            repeats: PRESET_REPEATS,
            small_holes_repeats: Some(SmallHoles::new(10_000, 40)),
            ..Default::default()
        }
    }

    /// Hexagonal-like grid staggered on both axes.
    pub fn stagger_xy() -> Self {
        Self::layout_comparison(LayoutSpec::HexLike {
            lr_border: true,
            stagger_y: true,
            jitter: None,
        })
    }

    /// [`Self::stagger_xy`] with Gaussian jitter of `sd = spacing / divisor`.
    pub fn randomised_stagger_xy(divisor: f64) -> Self {
        Self::layout_comparison(LayoutSpec::HexLike {
            lr_border: true,
            stagger_y: true,
            jitter: Some(Jitter::new(divisor)),
        })
    }

    pub fn hexagonal() -> Self {
        Self::layout_comparison(LayoutSpec::Hexagonal { stagger_y: false })
    }

    pub fn halton() -> Self {
        Self::layout_comparison(LayoutSpec::Halton { border: true })
            .with_hole_increment(10)
            .with_small_holes_increment(Some(SmallHoles::new(3, 30)))
    }

    pub fn random() -> Self {
        Self::layout_comparison(LayoutSpec::Random {
            border: true,
            buckets: DEFAULT_BUCKETS,
        })
        .with_hole_increment(10)
        .with_small_holes_increment(Some(SmallHoles::new(3, 30)))
    }

    pub fn with_field_size(mut self, field_size: f64) -> Self {
        self.field_size = field_size;
        self
    }

    pub fn with_hole_size(mut self, hole_size: f64) -> Self {
        self.hole_size = hole_size;
        self
    }

    pub fn with_treasure(mut self, treasure: TreasureSpec) -> Self {
        self.treasure = treasure;
        self
    }

    pub fn with_layout(mut self, layout: LayoutSpec) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_start_holes(mut self, start_holes: usize) -> Self {
        self.start_holes = start_holes;
        self
    }

    pub fn with_max_holes(mut self, max_holes: usize) -> Self {
        self.max_holes = max_holes;
        self
    }

    /// Runs a single desired hole count.
    pub fn with_holes(self, holes: usize) -> Self {
        self.with_start_holes(holes).with_max_holes(holes)
    }

    pub fn with_hole_increment(mut self, hole_increment: usize) -> Self {
        self.hole_increment = hole_increment;
        self
    }

    pub fn with_small_holes_increment(mut self, small: Option<SmallHoles>) -> Self {
        self.small_holes_increment = small;
        self
    }

    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_small_holes_repeats(mut self, small: Option<SmallHoles>) -> Self {
        self.small_holes_repeats = small;
        self
    }

    pub fn with_stop_threshold(mut self, stop_threshold: f64) -> Self {
        self.stop_threshold = stop_threshold;
        self
    }

    pub fn with_dump_at_holes(mut self, dump_at_holes: Option<usize>) -> Self {
        self.dump_at_holes = dump_at_holes;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_return_after_hit(mut self, return_after_hit: bool) -> Self {
        self.return_after_hit = return_after_hit;
        self
    }

    /// Trials to run for `holes` desired holes.
    pub fn repeats_for(&self, holes: usize) -> usize {
        match self.small_holes_repeats {
            Some(small) if holes <= small.up_to => small.value,
            _ => self.repeats,
        }
    }

    /// The desired hole count after `holes`.
    pub fn next_holes(&self, holes: usize) -> usize {
        let step = match self.small_holes_increment {
            Some(small) if holes <= small.up_to => small.value,
            _ => self.hole_increment,
        };
        holes.saturating_add(step)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.field_size.is_finite() && self.field_size > 0.0) {
            return Err(Error::InvalidConfig("field_size must be > 0".into()));
        }
        if !(self.hole_size.is_finite() && self.hole_size > 0.0) {
            return Err(Error::InvalidConfig("hole_size must be > 0".into()));
        }
        if self.hole_size > self.field_size {
            return Err(Error::InvalidConfig(
                "hole_size must not exceed field_size".into(),
            ));
        }
        if self.start_holes == 0 {
            return Err(Error::InvalidConfig("start_holes must be >= 1".into()));
        }
        if self.max_holes < self.start_holes {
            return Err(Error::InvalidConfig(
                "max_holes must be >= start_holes".into(),
            ));
        }
        if self.hole_increment == 0 {
            return Err(Error::InvalidConfig("hole_increment must be >= 1".into()));
        }
        if self.small_holes_increment.is_some_and(|s| s.value == 0) {
            return Err(Error::InvalidConfig(
                "small_holes_increment must be >= 1".into(),
            ));
        }
        if self.repeats == 0 || self.small_holes_repeats.is_some_and(|s| s.value == 0) {
            return Err(Error::InvalidConfig("repeats must be >= 1".into()));
        }
        if self.stop_threshold.is_nan() {
            return Err(Error::InvalidConfig("stop_threshold must be a number".into()));
        }

        match &self.treasure {
            TreasureSpec::Circle { radius } if !(*radius > 0.0) => {
                return Err(Error::InvalidConfig("treasure radius must be > 0".into()));
            }
            TreasureSpec::Rectangle { width, height } if !(*width > 0.0 && *height > 0.0) => {
                return Err(Error::InvalidConfig(
                    "treasure width and height must be > 0".into(),
                ));
            }
            _ => {}
        }

        match self.layout {
            LayoutSpec::HexLike {
                lr_border: false,
                stagger_y: true,
                ..
            } => {
                return Err(Error::InvalidConfig(
                    "stagger-y needs left and right borders".into(),
                ));
            }
            LayoutSpec::HexLike {
                jitter: Some(j), ..
            } if !(j.divisor.is_finite() && j.divisor > 0.0) => {
                return Err(Error::InvalidConfig("jitter divisor must be > 0".into()));
            }
            LayoutSpec::Random { buckets: 0, .. } => {
                return Err(Error::InvalidConfig(
                    "random layout needs at least one bucket".into(),
                ));
            }
            LayoutSpec::SpecifiedGrid { columns, rows, .. } if columns == 0 || rows == 0 => {
                return Err(Error::InvalidConfig(
                    "grid needs at least one column and row".into(),
                ));
            }
            _ => {}
        }

        Ok(())
    }
}
