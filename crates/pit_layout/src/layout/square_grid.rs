//! Plain square grid with whole-unit hole centres.
use rand::RngCore;

use crate::error::Result;
use crate::field::Field;
use crate::layout::{require_holes, DigOutcome, Layout};

/// `k × k` holes with `k = round(√n)`, one per cell of side `W/k`, centres rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareGridLayout {
    pub hole_size: f64,
    pub holes: usize,
}

impl SquareGridLayout {
    pub fn new(hole_size: f64, holes: usize) -> Self {
        Self { hole_size, holes }
    }

    /// Holes per side.
    pub fn side(&self) -> usize {
        (self.holes as f64).sqrt().round_ties_even() as usize
    }

    fn centres(&self, side: usize, extent: f64) -> Vec<f64> {
        let s = extent / side as f64;
        (0..side)
            .map(|i| (s / 2.0 + i as f64 * s).round_ties_even())
            .collect()
    }
}

impl Layout for SquareGridLayout {
    fn name(&self) -> &'static str {
        "nonStaggered"
    }

    fn play(
        &self,
        field: &mut Field,
        _rng: &mut dyn RngCore,
        return_after_hit: bool,
    ) -> Result<DigOutcome> {
        require_holes(self.holes, self.name())?;
        let side = self.side();
        let xs = self.centres(side, field.width());
        let ys = self.centres(side, field.height());
        let mut out = DigOutcome {
            actual_holes: side * side,
            ..Default::default()
        };
        for &y in &ys {
            for &x in &xs {
                let dig = field.dig(self.hole_size, x, y)?;
                out.record(dig);
                if return_after_hit && dig.hit {
                    return Ok(out);
                }
            }
        }
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
    fn side_rounds_the_square_root() {
        assert_eq!(SquareGridLayout::new(1.0, 25).side(), 5);
        assert_eq!(SquareGridLayout::new(1.0, 30).side(), 5);
        assert_eq!(SquareGridLayout::new(1.0, 31).side(), 6);
        assert_eq!(SquareGridLayout::new(1.0, 2).side(), 1);
    }

    #[test]
    fn centres_are_whole_units() {
        let mut rng = StdRng::seed_from_u64(0);
        let layout = SquareGridLayout::new(1.0, 9);
        let mut field = circle_field(100.0, 1.0, 1.0, 0.1);
        let out = layout.play(&mut field, &mut rng, false).unwrap();
        assert_eq!(out.actual_holes, 9);
        let xs: Vec<f64> = field.holes()[..3].iter().map(|h| h.centre_x).collect();
        // 100/3 = 33.33: centres at 16.67, 50 and 83.33 before rounding.
        assert_eq!(xs, vec![17.0, 50.0, 83.0]);
        assert_eq!(field.holes()[3].centre_y, 50.0);
    }

    #[test]
    fn early_return_keeps_grid_count() {
        let mut rng = StdRng::seed_from_u64(0);
        let layout = SquareGridLayout::new(1.0, 16);
        let mut field = circle_field(100.0, 12.5, 12.5, 1.0);
        let out = layout.play(&mut field, &mut rng, true).unwrap();
        assert!(out.found);
        assert_eq!(out.actual_holes, 16);
        assert_eq!(field.holes().len(), 1);
    }
}
