//! Treasure shapes hidden in a field.
//!
//! A [`TreasureShape`] describes what is hidden (dimensions or a shared dataset); placing it on a
//! field yields a [`Treasure`] anchored at a random position. Datasets are held in [`Arc`] so a
//! parsed polygon or point cloud is reused by every trial of an experiment.
use std::sync::Arc;

use glam::DVec2;
use rand::RngCore;

use crate::error::Result;
use crate::geometry::{Aabb, Hole, Polygon};

pub mod point_cloud;
pub mod polygon;
pub mod shape;

pub use point_cloud::{ArtefactCloud, PlacedCloud};
pub use polygon::{parse_shapefile_polygon, read_shapefile_polygon, PlacedPolygon};
pub use shape::{CircleTreasure, RectangleTreasure};

/// What is hidden in the field, before placement.
#[derive(Debug, Clone)]
pub enum TreasureShape {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
    /// A normalised polygon.
    Polygon(Arc<Polygon>),
    PointCloud(Arc<ArtefactCloud>),
}

impl TreasureShape {
    pub fn name(&self) -> &'static str {
        match self {
            TreasureShape::Circle { .. } => "circle",
            TreasureShape::Rectangle { .. } => "rectangle",
            TreasureShape::Polygon(_) => "polygon",
            TreasureShape::PointCloud(_) => "point cloud",
        }
    }

    /// Width and height of the bounding box of the shape.
    pub fn extent(&self) -> DVec2 {
        match self {
            TreasureShape::Circle { radius } => DVec2::splat(radius * 2.0),
            TreasureShape::Rectangle { width, height } => DVec2::new(*width, *height),
            TreasureShape::Polygon(p) => {
                let b = p.bounds();
                DVec2::new(b.width(), b.height())
            }
            TreasureShape::PointCloud(c) => c.extent(),
        }
    }

    /// Places the shape uniformly so it lies wholly within `width` x `height`.
    pub fn place_randomly(
        &self,
        width: f64,
        height: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Treasure> {
        Ok(match self {
            TreasureShape::Circle { radius } => {
                Treasure::Circle(CircleTreasure::place_randomly(*radius, width, height, rng)?)
            }
            TreasureShape::Rectangle {
                width: w,
                height: h,
            } => Treasure::Rectangle(RectangleTreasure::place_randomly(
                *w, *h, width, height, rng,
            )?),
            TreasureShape::Polygon(p) => {
                Treasure::Polygon(PlacedPolygon::place_randomly(p.clone(), width, height, rng)?)
            }
            TreasureShape::PointCloud(c) => {
                Treasure::PointCloud(PlacedCloud::place_randomly(c.clone(), width, height, rng)?)
            }
        })
    }
}

/// A treasure placed on a field.
#[derive(Debug, Clone)]
pub enum Treasure {
    Circle(CircleTreasure),
    Rectangle(RectangleTreasure),
    Polygon(PlacedPolygon),
    PointCloud(PlacedCloud),
}

impl Treasure {
    pub fn name(&self) -> &'static str {
        match self {
            Treasure::Circle(_) => "circle",
            Treasure::Rectangle(_) => "rectangle",
            Treasure::Polygon(_) => "polygon",
            Treasure::PointCloud(_) => "point cloud",
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Treasure::Circle(c) => c.bounds(),
            Treasure::Rectangle(r) => r.bounds(),
            Treasure::Polygon(p) => p.bounds(),
            Treasure::PointCloud(c) => c.bounds(),
        }
    }

    /// True if `hole` uncovers the treasure; for a point cloud, at least one artefact.
    pub fn intersects(&self, hole: &Hole) -> Result<bool> {
        self.probe(hole).map(|(hit, _)| hit)
    }

    /// Artefacts inside `hole`. Always zero for shape treasure.
    pub fn artefact_count(&self, hole: &Hole) -> Result<usize> {
        match self {
            Treasure::PointCloud(c) => c.artefact_count(hole),
            _ => Ok(0),
        }
    }

    /// Hit flag and artefact count in one pass.
    pub(crate) fn probe(&self, hole: &Hole) -> Result<(bool, usize)> {
        Ok(match self {
            Treasure::Circle(c) => (c.intersects(hole), 0),
            Treasure::Rectangle(r) => (r.intersects(hole), 0),
            Treasure::Polygon(p) => (p.intersects(hole), 0),
            Treasure::PointCloud(c) => {
                let n = c.artefact_count(hole)?;
                (n > 0, n)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn extent_matches_shape() {
        assert_eq!(
            TreasureShape::Circle { radius: 3.5 }.extent(),
            DVec2::splat(7.0)
        );
        assert_eq!(
            TreasureShape::Rectangle {
                width: 20.0,
                height: 5.0
            }
            .extent(),
            DVec2::new(20.0, 5.0)
        );
        let poly = Polygon::from_points([[0.0, 0.0], [4.0, 0.0], [4.0, 2.0]]).unwrap();
        assert_eq!(
            TreasureShape::Polygon(Arc::new(poly)).extent(),
            DVec2::new(4.0, 2.0)
        );
    }

    #[test]
    fn placement_keeps_variant_and_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(21);
        let cloud =
            ArtefactCloud::from_points([[0.0, 0.0], [2.0, 1.0], [4.0, 3.0]]).unwrap();
        let shapes = [
            TreasureShape::Circle { radius: 2.0 },
            TreasureShape::Rectangle {
                width: 6.0,
                height: 1.0,
            },
            TreasureShape::PointCloud(Arc::new(cloud)),
        ];
        for shape in &shapes {
            for _ in 0..100 {
                let t = shape.place_randomly(30.0, 30.0, &mut rng).unwrap();
                assert_eq!(t.name(), shape.name());
                let b = t.bounds();
                assert!(b.min.x >= 0.0 && b.min.y >= 0.0);
                assert!(b.max.x <= 30.0 + 1e-9 && b.max.y <= 30.0 + 1e-9);
            }
        }
    }

    #[test]
    fn point_cloud_probe_reports_artefacts() {
        let cloud = ArtefactCloud::from_points([[0.0, 0.0], [0.2, 0.1], [5.0, 5.0]]).unwrap();
        let t = Treasure::PointCloud(PlacedCloud::new(Arc::new(cloud), DVec2::new(10.0, 10.0)));
        assert_eq!(t.probe(&Hole::square(10.1, 10.0, 0.5)).unwrap(), (true, 2));
        assert_eq!(t.probe(&Hole::square(12.0, 12.0, 0.5)).unwrap(), (false, 0));
        assert_eq!(t.artefact_count(&Hole::square(15.0, 15.0, 0.5)).unwrap(), 1);
    }

    #[test]
    fn shape_treasure_never_counts_artefacts() {
        let t = Treasure::Circle(CircleTreasure::new(5.0, 5.0, 1.0));
        let hole = Hole::square(5.0, 5.0, 1.0);
        assert!(t.intersects(&hole).unwrap());
        assert_eq!(t.artefact_count(&hole).unwrap(), 0);
    }
}
