//! Layout strategies that decide where holes are dug.
//!
//! A [`Layout`] is a configuration value; one [`Layout::play`] call digs every hole of the layout
//! on a single [`Field`]. The number of holes a layout reports is a property of its geometry
//! only, so stopping after the first hit never changes it.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::field::{Dig, Field};

pub mod halton;
pub mod hex_like;
pub mod hexagonal;
pub mod random;
pub mod specified_grid;
pub mod square_grid;
pub mod staggered;

pub use halton::HaltonLayout;
pub use hex_like::HexLikeLayout;
pub use hexagonal::HexagonalLayout;
pub use random::RandomLayout;
pub use specified_grid::SpecifiedGridLayout;
pub use square_grid::SquareGridLayout;
pub use staggered::{dig_staggered, Jitter, StaggeredGrid};

/// Trait for hole layouts.
pub trait Layout {
    /// Short display name of the strategy.
    fn name(&self) -> &'static str;

    /// Digs the layout on `field`. With `return_after_hit` digging stops at the first hit.
    fn play(
        &self,
        field: &mut Field,
        rng: &mut dyn RngCore,
        return_after_hit: bool,
    ) -> Result<DigOutcome>;
}

impl<L: Layout + ?Sized> Layout for Box<L> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn play(
        &self,
        field: &mut Field,
        rng: &mut dyn RngCore,
        return_after_hit: bool,
    ) -> Result<DigOutcome> {
        (**self).play(field, rng, return_after_hit)
    }
}

/// What one [`Layout::play`] call produced.
///
/// `holes_succeeded` and `artefact_count` only cover the holes actually dug, so they are
/// complete only when digging did not stop at the first hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DigOutcome {
    /// Any hole uncovered the treasure.
    pub found: bool,
    /// Holes the layout's geometry calls for.
    pub actual_holes: usize,
    /// Holes that uncovered the treasure.
    pub holes_succeeded: usize,
    /// Artefacts uncovered over all holes.
    pub artefact_count: usize,
    /// The computed spacing or borders are too small for the holes to fit.
    pub layout_error: bool,
}

impl DigOutcome {
    pub(crate) fn record(&mut self, dig: Dig) {
        if dig.hit {
            self.found = true;
            self.holes_succeeded += 1;
            self.artefact_count += dig.artefacts;
        }
    }
}

/// Root of `a·x² + b·x + c = 0`: the `+` root when positive, else the `-` root.
pub(crate) fn quadratic(a: f64, b: f64, c: f64) -> f64 {
    let disc = (b * b - 4.0 * a * c).sqrt();
    let x1 = (-b + disc) / (2.0 * a);
    if x1 > 0.0 {
        x1
    } else {
        (-b - disc) / (2.0 * a)
    }
}

/// Layouts that assume a square field reject any other.
pub(crate) fn require_square(field: &Field, layout: &str) -> Result<()> {
    if field.width() != field.height() {
        return Err(Error::InvalidConfig(format!(
            "{layout} layout needs a square field, got {}x{}",
            field.width(),
            field.height()
        )));
    }
    Ok(())
}

pub(crate) fn require_holes(holes: usize, layout: &str) -> Result<()> {
    if holes == 0 {
        return Err(Error::InvalidConfig(format!(
            "{layout} layout needs at least one hole"
        )));
    }
    Ok(())
}
