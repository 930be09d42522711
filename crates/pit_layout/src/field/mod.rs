//! The field a layout digs on.
//!
//! A [`Field`] is single-use: it is created for one trial, receives exactly one treasure, and
//! records every dug [`Hole`] in dig order. Holes are clamped so they always lie inside the
//! field; a clamped dig sets the border-adjusted flag that the experiment driver reports as a
//! layout anomaly.
use std::fmt;

use rand::RngCore;

use crate::error::{Error, Result};
use crate::geometry::{Aabb, Hole};
use crate::treasure::{Treasure, TreasureShape};

mod dump;

/// Kind of field, which decides the treasure it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldKind {
    /// Circle or rectangle treasure.
    Intersect,
    /// Polygon treasure.
    Polygon,
    /// Artefact point cloud.
    RealWorld,
}

impl FieldKind {
    /// The field kind that accepts `shape`.
    pub fn for_shape(shape: &TreasureShape) -> Self {
        match shape {
            TreasureShape::Circle { .. } | TreasureShape::Rectangle { .. } => FieldKind::Intersect,
            TreasureShape::Polygon(_) => FieldKind::Polygon,
            TreasureShape::PointCloud(_) => FieldKind::RealWorld,
        }
    }

    pub fn accepts(&self, treasure: &Treasure) -> bool {
        matches!(
            (self, treasure),
            (FieldKind::Intersect, Treasure::Circle(_) | Treasure::Rectangle(_))
                | (FieldKind::Polygon, Treasure::Polygon(_))
                | (FieldKind::RealWorld, Treasure::PointCloud(_))
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Intersect => "intersect",
            FieldKind::Polygon => "polygon",
            FieldKind::RealWorld => "realworld",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of digging one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dig {
    /// The hole uncovered the treasure.
    pub hit: bool,
    /// Artefacts inside the hole; zero unless the treasure is a point cloud.
    pub artefacts: usize,
}

#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    width: f64,
    height: f64,
    holes: Vec<Hole>,
    treasure: Option<Treasure>,
    border_adjusted: bool,
    last_artefact_count: usize,
}

impl Field {
    pub fn new(kind: FieldKind, width: f64, height: f64) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "field size must be > 0");
        Self {
            kind,
            width,
            height,
            holes: Vec::new(),
            treasure: None,
            border_adjusted: false,
            last_artefact_count: 0,
        }
    }

    pub fn try_new(kind: FieldKind, width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "field size must be finite and > 0, got {width}x{height}"
            )));
        }
        Ok(Self::new(kind, width, height))
    }

    /// A field for circle or rectangle treasure.
    pub fn intersect(width: f64, height: f64) -> Self {
        Self::new(FieldKind::Intersect, width, height)
    }

    /// A field for polygon treasure.
    pub fn polygon(width: f64, height: f64) -> Self {
        Self::new(FieldKind::Polygon, width, height)
    }

    /// A field for an artefact point cloud.
    pub fn real_world(width: f64, height: f64) -> Self {
        Self::new(FieldKind::RealWorld, width, height)
    }

    /// A field whose kind accepts `shape`.
    pub fn for_shape(shape: &TreasureShape, width: f64, height: f64) -> Self {
        Self::new(FieldKind::for_shape(shape), width, height)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(glam::DVec2::ZERO, glam::DVec2::new(self.width, self.height))
    }

    /// Holes in dig order.
    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn treasure(&self) -> Option<&Treasure> {
        self.treasure.as_ref()
    }

    /// True once any dig had to be moved to stay inside the field.
    pub fn border_adjusted(&self) -> bool {
        self.border_adjusted
    }

    /// Artefacts found by the most recent dig.
    pub fn last_artefact_count(&self) -> usize {
        self.last_artefact_count
    }

    /// Places `shape` at a uniformly random position.
    pub fn place_treasure(
        &mut self,
        shape: &TreasureShape,
        rng: &mut dyn RngCore,
    ) -> Result<&Treasure> {
        self.check_accepts_shape(shape)?;
        let treasure = shape.place_randomly(self.width, self.height, rng)?;
        self.place(treasure)
    }

    /// Places an already positioned treasure, which must lie inside the field.
    pub fn place(&mut self, treasure: Treasure) -> Result<&Treasure> {
        if self.treasure.is_some() {
            return Err(Error::TreasureAlreadyPlaced);
        }
        if !self.kind.accepts(&treasure) {
            return Err(Error::IncompatibleTreasure {
                treasure: treasure.name(),
                field: self.kind.name(),
            });
        }
        let b = treasure.bounds();
        if !(b.min.x >= 0.0 && b.min.y >= 0.0 && b.max.x <= self.width && b.max.y <= self.height)
        {
            return Err(Error::InvalidConfig(format!(
                "{} treasure spanning ({}, {})..({}, {}) lies outside the {}x{} field",
                treasure.name(),
                b.min.x,
                b.min.y,
                b.max.x,
                b.max.y,
                self.width,
                self.height
            )));
        }
        Ok(self.treasure.insert(treasure))
    }

    fn check_accepts_shape(&self, shape: &TreasureShape) -> Result<()> {
        if self.treasure.is_some() {
            return Err(Error::TreasureAlreadyPlaced);
        }
        let expected = FieldKind::for_shape(shape);
        if expected != self.kind {
            return Err(Error::IncompatibleTreasure {
                treasure: shape.name(),
                field: self.kind.name(),
            });
        }
        Ok(())
    }

    /// Digs a square hole centred at `(x, y)`, moving it inside the field if needed.
    pub fn dig(&mut self, hole_size: f64, x: f64, y: f64) -> Result<Dig> {
        let treasure = self.treasure.as_ref().ok_or(Error::TreasureNotPlaced)?;
        let half = hole_size / 2.0;

        let mut cx = x;
        let mut cy = y;
        if cx - half < 0.0 {
            cx = half;
            self.border_adjusted = true;
        } else if cx + half > self.width {
            cx = self.width - half;
            self.border_adjusted = true;
        }
        if cy - half < 0.0 {
            cy = half;
            self.border_adjusted = true;
        } else if cy + half > self.height {
            cy = self.height - half;
            self.border_adjusted = true;
        }

        let hole = Hole::new(cx, cy, hole_size, hole_size);
        let (hit, artefacts) = treasure.probe(&hole)?;
        self.holes.push(hole);
        self.last_artefact_count = artefacts;
        Ok(Dig { hit, artefacts })
    }

    /// Digs a hole and reports whether it uncovered the treasure.
    pub fn dig_hole(&mut self, hole_size: f64, x: f64, y: f64) -> Result<bool> {
        self.dig(hole_size, x, y).map(|d| d.hit)
    }

    /// True if `hole` overlaps any hole already dug.
    pub fn intersects_existing_hole(&self, hole: &Hole) -> bool {
        self.holes.iter().any(|h| h.intersects(hole))
    }
}

/// Hexagonality diagnostic: the distance between the first two holes of the first row, and the
/// distance from the first hole to the first hole of the second row.
///
/// Either value is zero when the field does not have the holes to measure it.
pub fn hole_distances(field: &Field) -> (f64, f64) {
    let holes = field.holes();
    let Some(first) = holes.first() else {
        return (0.0, 0.0);
    };
    let horizontal = holes
        .get(1)
        .filter(|h| h.centre_y == first.centre_y)
        .map_or(0.0, |h| h.centre_x - first.centre_x);
    let diagonal = holes
        .iter()
        .find(|h| h.centre_y != first.centre_y)
        .map_or(0.0, |h| h.centre().distance(first.centre()));
    (horizontal, diagonal)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::DVec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::Polygon;
    use crate::treasure::{ArtefactCloud, CircleTreasure, PlacedCloud, RectangleTreasure};

    fn circle_field(cx: f64, cy: f64, r: f64) -> Field {
        let mut field = Field::intersect(100.0, 100.0);
        field
            .place(Treasure::Circle(CircleTreasure::new(cx, cy, r)))
            .unwrap();
        field
    }

    #[test]
    fn digging_before_placement_fails() {
        let mut field = Field::intersect(10.0, 10.0);
        assert!(matches!(
            field.dig_hole(1.0, 5.0, 5.0),
            Err(Error::TreasureNotPlaced)
        ));
        assert!(field.holes().is_empty());
    }

    #[test]
    fn treasure_can_only_be_placed_once() {
        let mut field = circle_field(50.0, 50.0, 3.5);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            field.place_treasure(&TreasureShape::Circle { radius: 1.0 }, &mut rng),
            Err(Error::TreasureAlreadyPlaced)
        ));
        assert!(matches!(
            field.place(Treasure::Circle(CircleTreasure::new(5.0, 5.0, 1.0))),
            Err(Error::TreasureAlreadyPlaced)
        ));
    }

    #[test]
    fn treasure_must_match_field_kind() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = Field::real_world(100.0, 100.0);
        assert!(matches!(
            field.place_treasure(&TreasureShape::Circle { radius: 1.0 }, &mut rng),
            Err(Error::IncompatibleTreasure { .. })
        ));

        let mut field = Field::intersect(100.0, 100.0);
        let poly = Polygon::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        assert!(matches!(
            field.place_treasure(&TreasureShape::Polygon(Arc::new(poly)), &mut rng),
            Err(Error::IncompatibleTreasure { .. })
        ));

        assert!(field
            .place_treasure(
                &TreasureShape::Rectangle {
                    width: 20.0,
                    height: 5.0
                },
                &mut rng
            )
            .is_ok());
    }

    #[test]
    fn placing_outside_the_field_is_rejected() {
        let mut field = Field::intersect(10.0, 10.0);
        assert!(field
            .place(Treasure::Rectangle(RectangleTreasure::new(9.0, 5.0, 4.0, 2.0)))
            .is_err());
    }

    #[test]
    fn dig_clamps_each_axis_and_flags_it() {
        let mut field = circle_field(50.0, 50.0, 3.5);
        field.dig_hole(1.0, 50.0, 50.0).unwrap();
        assert!(!field.border_adjusted());

        field.dig_hole(1.0, 0.2, 99.9).unwrap();
        assert!(field.border_adjusted());
        let h = field.holes()[1];
        assert_eq!((h.centre_x, h.centre_y), (0.5, 99.5));

        field.dig_hole(1.0, 100.0, -3.0).unwrap();
        let h = field.holes()[2];
        assert_eq!((h.centre_x, h.centre_y), (99.5, 0.5));

        // Holes on the edge are left alone.
        let mut field = circle_field(50.0, 50.0, 3.5);
        field.dig_hole(1.0, 0.5, 99.5).unwrap();
        assert!(!field.border_adjusted());
    }

    #[test]
    fn dig_reports_hits_in_order() {
        let mut field = circle_field(50.0, 50.0, 3.5);
        assert!(field.dig_hole(1.0, 52.0, 50.0).unwrap());
        assert!(!field.dig_hole(1.0, 10.0, 10.0).unwrap());
        assert_eq!(field.holes().len(), 2);
        assert_eq!(field.holes()[0].centre(), DVec2::new(52.0, 50.0));
    }

    #[test]
    fn real_world_dig_tracks_artefacts() {
        let cloud = ArtefactCloud::from_points([[0.0, 0.0], [0.1, 0.1], [3.0, 3.0]]).unwrap();
        let mut field = Field::real_world(20.0, 20.0);
        field
            .place(Treasure::PointCloud(PlacedCloud::new(
                Arc::new(cloud),
                DVec2::new(5.0, 5.0),
            )))
            .unwrap();

        let dig = field.dig(1.0, 5.0, 5.0).unwrap();
        assert_eq!(dig, Dig { hit: true, artefacts: 2 });
        assert_eq!(field.last_artefact_count(), 2);

        let dig = field.dig(1.0, 15.0, 15.0).unwrap();
        assert_eq!(dig, Dig::default());
        assert_eq!(field.last_artefact_count(), 0);
    }

    #[test]
    fn existing_hole_overlap_is_open() {
        let mut field = circle_field(50.0, 50.0, 3.5);
        field.dig_hole(1.0, 10.0, 10.0).unwrap();
        assert!(field.intersects_existing_hole(&Hole::square(10.5, 10.5, 1.0)));
        assert!(!field.intersects_existing_hole(&Hole::square(11.0, 10.0, 1.0)));
    }

    #[test]
    fn hole_distances_measure_first_rows() {
        let mut field = circle_field(50.0, 50.0, 3.5);
        assert_eq!(hole_distances(&field), (0.0, 0.0));
        for (x, y) in [(10.0, 10.0), (30.0, 10.0), (50.0, 10.0), (20.0, 30.0)] {
            field.dig_hole(1.0, x, y).unwrap();
        }
        let (horizontal, diagonal) = hole_distances(&field);
        assert_eq!(horizontal, 20.0);
        assert!((diagonal - (10.0f64.powi(2) + 20.0f64.powi(2)).sqrt()).abs() < 1e-12);
    }
}
