//! Geometry primitives: dug holes, axis-aligned boxes and simple polygons.
//!
//! Coordinates follow the field convention: `x` grows to the right, `y` grows downward, so the
//! "top" of a box is its smaller `y`.
use glam::DVec2;

use crate::error::{Error, Result};

pub mod polygon;

pub use polygon::Polygon;

/// A rectangular hole dug on a field, described by its centre and size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hole {
    pub centre_x: f64,
    pub centre_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Hole {
    pub fn new(centre_x: f64, centre_y: f64, width: f64, height: f64) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "hole size must be > 0");
        Self {
            centre_x,
            centre_y,
            width,
            height,
        }
    }

    /// Creates a hole, rejecting non-positive or non-finite sizes.
    pub fn try_new(centre_x: f64, centre_y: f64, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "hole size must be > 0, got {width}x{height}"
            )));
        }
        Ok(Self::new(centre_x, centre_y, width, height))
    }

    /// A square hole of side `size`.
    pub fn square(centre_x: f64, centre_y: f64, size: f64) -> Self {
        Self::new(centre_x, centre_y, size, size)
    }

    #[inline]
    pub fn centre(&self) -> DVec2 {
        DVec2::new(self.centre_x, self.centre_y)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.centre_x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.centre_x + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.centre_y - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.centre_y + self.height / 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            DVec2::new(self.left(), self.top()),
            DVec2::new(self.right(), self.bottom()),
        )
    }

    /// Returns true if the interiors of the two holes overlap.
    ///
    /// Holes that only share an edge or a corner do not intersect.
    pub fn intersects(&self, other: &Hole) -> bool {
        self.bounds().overlaps_open(&other.bounds())
    }
}

/// Axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Interior overlap: touching edges do not count.
    #[inline]
    pub fn overlaps_open(&self, other: &Aabb) -> bool {
        other.min.x < self.max.x
            && other.max.x > self.min.x
            && other.min.y < self.max.y
            && other.max.y > self.min.y
    }

    /// Closed overlap: boxes sharing an edge or a corner overlap.
    #[inline]
    pub fn overlaps_closed(&self, other: &Aabb) -> bool {
        other.min.x <= self.max.x
            && other.max.x >= self.min.x
            && other.min.y <= self.max.y
            && other.max.y >= self.min.y
    }

    #[inline]
    pub fn contains_closed(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in ring order starting at `min`.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }
}
