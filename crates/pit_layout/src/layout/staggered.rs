//! Staggered grid digging shared by the grid based layouts.
use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::layout::DigOutcome;
use crate::random::gaussian;

/// Gaussian perturbation of grid positions.
///
/// Each axis is drawn with `sd = spacing / divisor` around the grid position and kept within half
/// a spacing of it. Positions on the outer edge of the field are never moved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Jitter {
    pub divisor: f64,
}

impl Jitter {
    pub fn new(divisor: f64) -> Self {
        debug_assert!(divisor > 0.0, "jitter divisor must be > 0");
        Self { divisor }
    }

    pub fn try_new(divisor: f64) -> Result<Self> {
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "jitter divisor must be finite and > 0, got {divisor}"
            )));
        }
        Ok(Self::new(divisor))
    }

    fn axis(&self, rng: &mut dyn RngCore, centre: f64, spacing: f64, limit: f64) -> f64 {
        if centre <= 0.0 || centre >= limit {
            return centre;
        }
        let half = spacing / 2.0;
        gaussian(rng, centre, spacing / self.divisor)
            .clamp(centre - half, centre + half)
            .clamp(0.0, limit)
    }

    pub(crate) fn apply(
        &self,
        rng: &mut dyn RngCore,
        p: DVec2,
        spacing: DVec2,
        extent: DVec2,
    ) -> DVec2 {
        let x = self.axis(rng, p.x, spacing.x, extent.x);
        let y = self.axis(rng, p.y, spacing.y, extent.y);
        DVec2::new(x, y)
    }
}

/// Geometry of a staggered grid.
///
/// Odd rows are shifted right by half `spacing_x`. With `stagger_y`, odd columns are also shifted
/// down by half `spacing_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaggeredGrid {
    pub columns: usize,
    pub rows: usize,
    pub border_x: f64,
    pub spacing_x: f64,
    pub border_y: f64,
    pub spacing_y: f64,
    pub stagger_y: bool,
    pub jitter: Option<Jitter>,
}

impl StaggeredGrid {
    pub fn new(
        columns: usize,
        rows: usize,
        border_x: f64,
        spacing_x: f64,
        border_y: f64,
        spacing_y: f64,
    ) -> Self {
        Self {
            columns,
            rows,
            border_x,
            spacing_x,
            border_y,
            spacing_y,
            stagger_y: false,
            jitter: None,
        }
    }

    pub fn with_stagger_y(mut self, stagger_y: bool) -> Self {
        self.stagger_y = stagger_y;
        self
    }

    pub fn with_jitter(mut self, jitter: Option<Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Number of holes in the grid.
    pub fn hole_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Centre of the hole in `column` of `row`, before jitter.
    pub fn position(&self, column: usize, row: usize) -> DVec2 {
        let mut x = self.border_x + self.spacing_x * column as f64;
        if row % 2 != 0 {
            x += self.spacing_x / 2.0;
        }
        let mut y = self.border_y + self.spacing_y * row as f64;
        if self.stagger_y && column % 2 != 0 {
            y += self.spacing_y / 2.0;
        }
        DVec2::new(x, y)
    }
}

/// Digs `grid` row by row.
///
/// The reported hole count is always the full grid, also when digging stops at the first hit.
pub fn dig_staggered(
    field: &mut Field,
    hole_size: f64,
    grid: &StaggeredGrid,
    rng: &mut dyn RngCore,
    return_after_hit: bool,
) -> Result<DigOutcome> {
    let mut out = DigOutcome {
        actual_holes: grid.hole_count(),
        ..Default::default()
    };
    let spacing = DVec2::new(grid.spacing_x, grid.spacing_y);
    let extent = DVec2::new(field.width(), field.height());

    for row in 0..grid.rows {
        for column in 0..grid.columns {
            let mut p = grid.position(column, row);
            if let Some(jitter) = &grid.jitter {
                p = jitter.apply(rng, p, spacing, extent);
            }
            let dig = field.dig(hole_size, p.x, p.y)?;
            out.record(dig);
            if return_after_hit && dig.hit {
                return Ok(out);
            }
        }
    }
    Ok(out)
}
