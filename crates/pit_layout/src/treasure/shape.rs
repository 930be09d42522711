//! Circular and rectangular treasure.
use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::geometry::{Aabb, Hole};
use crate::random::rand01;

/// A circular treasure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleTreasure {
    pub centre: DVec2,
    pub radius: f64,
}

impl CircleTreasure {
    pub fn new(centre_x: f64, centre_y: f64, radius: f64) -> Self {
        debug_assert!(radius > 0.0, "radius must be > 0");
        Self {
            centre: DVec2::new(centre_x, centre_y),
            radius,
        }
    }

    /// Places a circle of `radius` uniformly so it lies wholly within `width` x `height`.
    pub fn place_randomly(
        radius: f64,
        width: f64,
        height: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        if height < radius * 2.0 || width < radius * 2.0 {
            return Err(Error::TreasureTooLarge {
                treasure_width: radius * 2.0,
                treasure_height: radius * 2.0,
                field_width: width,
                field_height: height,
            });
        }
        let x = rand01(rng) * (width - 2.0 * radius) + radius;
        let y = rand01(rng) * (height - 2.0 * radius) + radius;
        Ok(Self::new(x, y, radius))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.centre - DVec2::splat(self.radius),
            self.centre + DVec2::splat(self.radius),
        )
    }

    /// True if the point of the hole closest to the centre lies strictly within the radius.
    pub fn intersects(&self, hole: &Hole) -> bool {
        let b = hole.bounds();
        let closest = self.centre.clamp(b.min, b.max);
        closest.distance(self.centre) < self.radius
    }
}

/// An axis-aligned rectangular treasure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleTreasure {
    pub centre: DVec2,
    pub width: f64,
    pub height: f64,
}

impl RectangleTreasure {
    pub fn new(centre_x: f64, centre_y: f64, width: f64, height: f64) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "rectangle size must be > 0");
        Self {
            centre: DVec2::new(centre_x, centre_y),
            width,
            height,
        }
    }

    /// Places a `w` x `h` rectangle uniformly so it lies wholly within `width` x `height`.
    pub fn place_randomly(
        w: f64,
        h: f64,
        width: f64,
        height: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        if w > width || h > height {
            return Err(Error::TreasureTooLarge {
                treasure_width: w,
                treasure_height: h,
                field_width: width,
                field_height: height,
            });
        }
        let x = rand01(rng) * (width - w) + w / 2.0;
        let y = rand01(rng) * (height - h) + h / 2.0;
        Ok(Self::new(x, y, w, h))
    }

    pub fn bounds(&self) -> Aabb {
        let half = DVec2::new(self.width, self.height) / 2.0;
        Aabb::new(self.centre - half, self.centre + half)
    }

    /// Open box overlap, matching [`Hole::intersects`].
    pub fn intersects(&self, hole: &Hole) -> bool {
        self.bounds().overlaps_open(&hole.bounds())
    }
}
