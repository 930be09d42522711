//! Staggered layout with true equilateral triangle spacing.
use rand::RngCore;
use tracing::debug;

use crate::error::Result;
use crate::field::Field;
use crate::layout::hex_like::hex_dimensions;
use crate::layout::{dig_staggered, require_holes, DigOutcome, Layout, StaggeredGrid};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Rows and columns as in [`crate::layout::HexLikeLayout`], with the row spacing `c` taken from
/// the row count and the hole spacing `a = 2c/√3`. Rows are centred horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HexagonalLayout {
    pub hole_size: f64,
    pub holes: usize,
    pub stagger_y: bool,
}

impl HexagonalLayout {
    pub fn new(hole_size: f64, holes: usize) -> Self {
        Self {
            hole_size,
            holes,
            stagger_y: false,
        }
    }

    pub fn with_stagger_y(mut self, stagger_y: bool) -> Self {
        self.stagger_y = stagger_y;
        self
    }

    /// The grid for a `width` x `height` field, and whether the holes fail to fit.
    ///
    /// When centred rows leave less than half a hole of border, the rows are stretched to the
    /// edges instead and the row spacing follows from the hole spacing.
    pub fn grid(&self, width: f64, height: f64) -> Result<(StaggeredGrid, bool)> {
        require_holes(self.holes, "hexagonal")?;
        let (nx, ny) = hex_dimensions(self.holes, width, height, true, self.stagger_y)?;
        let (nxf, nyf) = (nx as f64, ny as f64);
        let hole = self.hole_size;

        let mut c = if self.stagger_y {
            height / (nyf + 0.5)
        } else {
            height / nyf
        };
        let mut a = 2.0 * c / SQRT_3;
        let mut border_x = (width - a * (nxf - 0.5)) / 2.0;
        let mut border_y = c / 2.0;
        let first_pass_misfit = a < hole || border_y < hole / 2.0 || c < hole;

        if border_x < hole / 2.0 {
            a = (width - hole) / (nxf - 0.5);
            c = SQRT_3 * a / 2.0;
            border_x = hole / 2.0;
            border_y = if self.stagger_y {
                (height - c * (nyf - 0.5)) / 2.0
            } else {
                (height - c * (nyf - 1.0)) / 2.0
            };
        }

        let layout_error = border_x < hole / 2.0 || a < hole || border_y < hole / 2.0 || c < hole;
        if !layout_error && first_pass_misfit {
            debug!(
                holes = self.holes,
                "hexagonal layout only fits after stretching rows to the edges"
            );
        }

        let grid =
            StaggeredGrid::new(nx, ny, border_x, a, border_y, c).with_stagger_y(self.stagger_y);
        Ok((grid, layout_error))
    }
}

impl Layout for HexagonalLayout {
    fn name(&self) -> &'static str {
        "hex"
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

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::layout::tests::circle_field;

    #[test]
    fn rows_form_equilateral_triangles() {
        let (grid, err) = HexagonalLayout::new(1.0, 20).grid(100.0, 100.0).unwrap();
        assert!(!err);
        assert_eq!((grid.columns, grid.rows), (4, 5));
        assert!((grid.spacing_y - 20.0).abs() < 1e-9);
        assert!((grid.spacing_x - 40.0 / SQRT_3).abs() < 1e-9);
        // Neighbours in adjacent rows are one hole spacing apart.
        let d = grid.position(0, 0).distance(grid.position(0, 1));
        assert!((d - grid.spacing_x).abs() < 1e-9);
        // Rows are centred.
        let left = grid.position(0, 0).x;
        let right = grid.position(grid.columns - 1, 1).x;
        assert!((left - (100.0 - right)).abs() < 1e-9);
    }

    #[test]
    fn wide_rows_fall_back_to_edge_borders() {
        // A single tall row on a wide field: centred holes would overhang the edges.
        let layout = HexagonalLayout::new(1.0, 4);
        let (grid, err) = layout.grid(100.0, 40.0).unwrap();
        let (nx, ny) = hex_dimensions(4, 100.0, 40.0, true, false).unwrap();
        assert_eq!((nx, ny), (3, 1));
        let a = (100.0 - 1.0) / (nx as f64 - 0.5);
        let c = SQRT_3 * a / 2.0;
        assert!((grid.border_x - 0.5).abs() < 1e-12);
        assert!((grid.spacing_x - a).abs() < 1e-9);
        assert!((grid.spacing_y - c).abs() < 1e-9);
        assert!((grid.border_y - (40.0 - c * (ny as f64 - 1.0)) / 2.0).abs() < 1e-9);
        assert!(!err);
    }

    #[test]
    fn digs_full_grid_and_reports_count() {
        let mut rng = StdRng::seed_from_u64(2);
        let layout = HexagonalLayout::new(0.5, 60);
        let mut field = circle_field(100.0, 3.0, 3.0, 1.0);
        let out = layout.play(&mut field, &mut rng, false).unwrap();
        assert_eq!(out.actual_holes, field.holes().len());
        assert!(!out.layout_error);
        assert_eq!(layout.name(), "hex");
    }

    #[test]
    fn early_return_keeps_full_count() {
        let mut rng = StdRng::seed_from_u64(4);
        let layout = HexagonalLayout::new(1.0, 20);
        let (grid, _) = layout.grid(100.0, 100.0).unwrap();
        let first = grid.position(0, 0);

        let mut field = circle_field(100.0, first.x, first.y, 2.0);
        let out = layout.play(&mut field, &mut rng, true).unwrap();
        assert!(out.found);
        assert_eq!(out.actual_holes, 20);
        assert_eq!(field.holes().len(), 1);

        let mut field = circle_field(100.0, first.x, first.y, 2.0);
        let full = layout.play(&mut field, &mut rng, false).unwrap();
        assert_eq!(full.actual_holes, out.actual_holes);
        assert_eq!(field.holes().len(), 20);
        assert_eq!(full.holes_succeeded, 1);
    }

    #[test]
    fn crowded_field_is_flagged() {
        let (_, err) = HexagonalLayout::new(5.0, 2_000).grid(50.0, 50.0).unwrap();
        assert!(err);
    }
}
