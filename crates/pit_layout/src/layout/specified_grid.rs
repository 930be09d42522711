//! Staggered grid with an explicit number of columns and rows.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::layout::{dig_staggered, DigOutcome, Layout, StaggeredGrid};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecifiedGridLayout {
    pub hole_size: f64,
    pub columns: usize,
    pub rows: usize,
    pub stagger_y: bool,
}

impl SpecifiedGridLayout {
    pub fn new(hole_size: f64, columns: usize, rows: usize) -> Self {
        Self {
            hole_size,
            columns,
            rows,
            stagger_y: false,
        }
    }

    pub fn with_stagger_y(mut self, stagger_y: bool) -> Self {
        self.stagger_y = stagger_y;
        self
    }

    pub fn grid(&self, width: f64, height: f64) -> Result<(StaggeredGrid, bool)> {
        if self.columns == 0 || self.rows == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid needs at least one column and row, got {}x{}",
                self.columns, self.rows
            )));
        }
        let spacing_x = width / (self.columns as f64 + 0.5);
        let spacing_y = if self.stagger_y {
            height / (self.rows as f64 + 0.5)
        } else {
            height / self.rows as f64
        };
        let border_x = spacing_x / 2.0;
        let border_y = spacing_y / 2.0;
        let half = self.hole_size / 2.0;
        let layout_error = border_x < half || border_y < half;

        let grid = StaggeredGrid::new(
            self.columns,
            self.rows,
            border_x,
            spacing_x,
            border_y,
            spacing_y,
        )
        .with_stagger_y(self.stagger_y);
        Ok((grid, layout_error))
    }
}

impl Layout for SpecifiedGridLayout {
    fn name(&self) -> &'static str {
        "grid"
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
