//! Hexagonal-like staggered layout.
//!
//! The number of holes per row `nx` solves a quadratic that approximates equilateral triangle
//! spacing for the requested total `n`:
//!
//! | borders | stagger-y | equation |
//! |---------|-----------|----------|
//! | yes     | no        | `2H·nx² + H·nx − √3·n·W = 0` |
//! | yes     | yes       | `4H·nx² + (2H − √3·W)·nx − 2√3·n·W = 0` |
//! | no      | no        | `2H·nx² − H·nx − √3·n·W = 0` |
//!
//! The row count is `n / nx`; both are then rounded half to even.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::layout::{
    dig_staggered, quadratic, require_holes, DigOutcome, Jitter, Layout, StaggeredGrid,
};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Columns and rows for `holes` on a `width` x `height` field.
pub(crate) fn hex_dimensions(
    holes: usize,
    width: f64,
    height: f64,
    lr_border: bool,
    stagger_y: bool,
) -> Result<(usize, usize)> {
    let n = holes as f64;
    let nx = match (lr_border, stagger_y) {
        (true, false) => quadratic(2.0 * height, height, -SQRT_3 * n * width),
        (true, true) => quadratic(
            4.0 * height,
            2.0 * height - SQRT_3 * width,
            -2.0 * SQRT_3 * n * width,
        ),
        (false, false) => quadratic(2.0 * height, -height, -SQRT_3 * n * width),
        (false, true) => {
            return Err(Error::InvalidConfig(
                "stagger-y needs left and right borders".into(),
            ))
        }
    };
    let ny = n / nx;
    Ok((
        nx.round_ties_even().max(0.0) as usize,
        ny.round_ties_even().max(0.0) as usize,
    ))
}

/// Staggered grid close to hexagonal for a requested hole count.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexLikeLayout {
    pub hole_size: f64,
    pub holes: usize,
    /// Half a spacing of border left and right; otherwise the outer holes touch the edges.
    pub lr_border: bool,
    pub stagger_y: bool,
    pub jitter: Option<Jitter>,
}

impl HexLikeLayout {
    pub fn new(hole_size: f64, holes: usize) -> Self {
        Self {
            hole_size,
            holes,
            lr_border: true,
            stagger_y: false,
            jitter: None,
        }
    }

    pub fn with_lr_border(mut self, lr_border: bool) -> Self {
        self.lr_border = lr_border;
        self
    }

    pub fn with_stagger_y(mut self, stagger_y: bool) -> Self {
        self.stagger_y = stagger_y;
        self
    }

    pub fn with_jitter(mut self, jitter: Option<Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    /// The grid for a `width` x `height` field, and whether the holes fail to fit.
    pub fn grid(&self, width: f64, height: f64) -> Result<(StaggeredGrid, bool)> {
        require_holes(self.holes, "hexagonal-like")?;
        let (nx, ny) = hex_dimensions(self.holes, width, height, self.lr_border, self.stagger_y)?;

        let spacing_x = if self.lr_border {
            width / (nx as f64 + 0.5)
        } else {
            (width - self.hole_size) / (nx as f64 - 0.5)
        };
        let spacing_y = if self.stagger_y {
            height / (ny as f64 + 0.5)
        } else {
            height / ny as f64
        };
        let border_x = if self.lr_border {
            spacing_x / 2.0
        } else {
            self.hole_size / 2.0
        };
        let border_y = spacing_y / 2.0;

        let layout_error = spacing_x < self.hole_size || spacing_y < self.hole_size;
        let grid = StaggeredGrid::new(nx, ny, border_x, spacing_x, border_y, spacing_y)
            .with_stagger_y(self.stagger_y)
            .with_jitter(self.jitter);
        Ok((grid, layout_error))
    }
}

impl Layout for HexLikeLayout {
    fn name(&self) -> &'static str {
        match (self.stagger_y, self.jitter.is_some()) {
            (false, _) => "hexlike",
            (true, false) => "staggerXY",
            (true, true) => "randomisedStaggerXY",
        }
    }

    fn play(
        &self,
        field: &mut Field,
        rng: &mut dyn RngCore,
        return_after_hit: bool,
    ) -> Result<DigOutcome> {
        let (grid, layout_error) = self.grid(field.width(), field.height())?;
        let mut out = dig_staggered(field, self.hole_size, &grid, rng, return_after_hit)?;
        out.layout_error = layout_error;
        Ok(out)
    }
}
