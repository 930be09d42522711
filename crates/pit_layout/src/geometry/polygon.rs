//! Simple polygons and their intersection with axis-aligned boxes.
use glam::DVec2;
use mint::Vector2;

use crate::error::{Error, Result};
use crate::geometry::Aabb;

/// A simple polygon given as a vertex ring.
///
/// The ring is used as given: a closing vertex equal to the first one (as stored in shapefiles)
/// is allowed and produces a zero-length edge, which does not change any test.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec2>,
    bounds: Aabb,
}

impl Polygon {
    /// Creates a polygon, requiring at least three finite vertices.
    pub fn try_new(vertices: Vec<DVec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::InvalidConfig(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidConfig(
                "polygon vertices must be finite".into(),
            ));
        }
        let bounds = Aabb::from_points(vertices.iter().copied())
            .ok_or_else(|| Error::Other("empty vertex ring".into()))?;
        Ok(Self { vertices, bounds })
    }

    /// Creates a polygon from any `mint` compatible points.
    pub fn from_points<I, P>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Vector2<f64>>,
    {
        Self::try_new(
            points
                .into_iter()
                .map(|p| DVec2::from(p.into()))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Rotates by 90 degrees by swapping the axes of every vertex.
    pub fn rotated_quarter_turn(&self) -> Self {
        let vertices: Vec<DVec2> = self.vertices.iter().map(|v| DVec2::new(v.y, v.x)).collect();
        let bounds = Aabb::new(
            DVec2::new(self.bounds.min.y, self.bounds.min.x),
            DVec2::new(self.bounds.max.y, self.bounds.max.x),
        );
        Self { vertices, bounds }
    }

    /// Translates the polygon so its bounding box starts at the origin.
    pub fn normalized(&self) -> Self {
        let offset = self.bounds.min;
        Self {
            vertices: self.vertices.iter().map(|v| *v - offset).collect(),
            bounds: Aabb::new(DVec2::ZERO, self.bounds.max - offset),
        }
    }

    /// Edges as vertex pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns true if `p` lies inside the polygon or on its boundary.
    pub fn contains_point(&self, p: DVec2) -> bool {
        if !self.bounds.contains_closed(p) {
            return false;
        }
        if self.edges().any(|(a, b)| point_on_segment(p, a, b)) {
            return true;
        }
        winding_number(p, &self.vertices) != 0
    }

    /// Returns true if the polygon, shifted by `offset`, shares any point with `rect`.
    pub fn intersects_aabb(&self, offset: DVec2, rect: &Aabb) -> bool {
        // Work in polygon-local coordinates.
        let local = rect.translated(-offset);
        if !self.bounds.overlaps_closed(&local) {
            return false;
        }

        if self.vertices.iter().any(|v| local.contains_closed(*v)) {
            return true;
        }

        let corners = local.corners();
        if corners.iter().any(|c| self.contains_point(*c)) {
            return true;
        }

        for (a, b) in self.edges() {
            for i in 0..4 {
                let (c, d) = (corners[i], corners[(i + 1) % 4]);
                if segments_intersect(a, b, c, d) {
                    return true;
                }
            }
        }

        false
    }
}

#[inline]
fn cross(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    cross(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Closed segment intersection: shared endpoints and collinear overlap count.
fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    point_on_segment(a1, b1, b2)
        || point_on_segment(a2, b1, b2)
        || point_on_segment(b1, a1, a2)
        || point_on_segment(b2, a1, a2)
}

fn winding_number(p: DVec2, ring: &[DVec2]) -> i32 {
    let n = ring.len();
    let mut winding = 0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && cross(a, b, p) > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross(a, b, p) < 0.0 {
            winding -= 1;
        }
    }
    winding
}
