//! Polygon treasure and a reader for single-polygon ESRI shapefiles.
use std::path::Path;
use std::sync::Arc;

use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::geometry::{Aabb, Hole, Polygon};
use crate::random::rand01;

const SHP_FILE_CODE: i32 = 9994;
const SHP_HEADER_LEN: usize = 100;
const SHP_RECORD_HEADER_LEN: usize = 8;
const SHAPE_NULL: i32 = 0;
const SHAPE_POLYGON: i32 = 5;

/// A polygon (normalised to its own origin) anchored on a field by its top-left corner.
#[derive(Debug, Clone)]
pub struct PlacedPolygon {
    pub polygon: Arc<Polygon>,
    pub top_left: DVec2,
}

impl PlacedPolygon {
    /// Anchors `polygon` at `top_left`. The polygon is expected to be normalised.
    pub fn new(polygon: Arc<Polygon>, top_left: DVec2) -> Self {
        Self { polygon, top_left }
    }

    /// Anchors the polygon uniformly so its bounding box lies within `width` x `height`.
    pub fn place_randomly(
        polygon: Arc<Polygon>,
        width: f64,
        height: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        let b = polygon.bounds();
        if b.width() > width || b.height() > height {
            return Err(Error::TreasureTooLarge {
                treasure_width: b.width(),
                treasure_height: b.height(),
                field_width: width,
                field_height: height,
            });
        }
        let top_left = DVec2::new(
            rand01(rng) * (width - b.width()),
            rand01(rng) * (height - b.height()),
        );
        Ok(Self::new(polygon, top_left - b.min))
    }

    pub fn bounds(&self) -> Aabb {
        self.polygon.bounds().translated(self.top_left)
    }

    pub fn intersects(&self, hole: &Hole) -> bool {
        let hb = hole.bounds();
        // Quick reject on the cached bounding box.
        if !self.bounds().overlaps_closed(&hb) {
            return false;
        }
        self.polygon.intersects_aabb(self.top_left, &hb)
    }

    /// Vertices in field coordinates.
    pub fn vertices(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.polygon.vertices().iter().map(move |v| self.top_left + *v)
    }
}

/// Reads the single polygon stored in an ESRI shapefile `.shp` file.
///
/// The polygon is normalised so its bounding box starts at the origin; `rotate` swaps the axes
/// first, turning a vertically oriented site into a horizontal one.
pub fn read_shapefile_polygon(path: impl AsRef<Path>, rotate: bool) -> Result<Polygon> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        Error::Dataset(format!("cannot open shapefile '{}': {e}", path.display()))
    })?;
    let polygon = parse_shapefile_polygon(&bytes)?;
    let polygon = if rotate {
        polygon.rotated_quarter_turn()
    } else {
        polygon
    };
    Ok(polygon.normalized())
}

/// Parses the main `.shp` file format, requiring exactly one polygon record.
///
/// Only the first ring of the record is used.
pub fn parse_shapefile_polygon(bytes: &[u8]) -> Result<Polygon> {
    if bytes.len() < SHP_HEADER_LEN {
        return Err(Error::Dataset("shapefile header truncated".into()));
    }
    let file_code = read_i32_be(bytes, 0)?;
    if file_code != SHP_FILE_CODE {
        return Err(Error::Dataset(format!(
            "not a shapefile (file code {file_code})"
        )));
    }
    let shape_type = read_i32_le(bytes, 32)?;
    if shape_type != SHAPE_POLYGON {
        return Err(Error::Dataset(format!(
            "shapefile holds shape type {shape_type}, expected polygon ({SHAPE_POLYGON})"
        )));
    }
    let declared_len = read_length(bytes, 24, "file")?;
    let end = declared_len.min(bytes.len());

    let mut polygons = Vec::new();
    let mut pos = SHP_HEADER_LEN;
    while pos + SHP_RECORD_HEADER_LEN <= end {
        let content_len = read_length(bytes, pos + 4, "record")?;
        let content_start = pos + SHP_RECORD_HEADER_LEN;
        let content_end = content_start
            .checked_add(content_len)
            .filter(|&e| e <= bytes.len())
            .ok_or_else(|| Error::Dataset("shapefile record truncated".into()))?;
        let content = &bytes[content_start..content_end];
        match read_i32_le(content, 0)? {
            SHAPE_NULL => {}
            SHAPE_POLYGON => polygons.push(parse_polygon_record(content)?),
            other => {
                return Err(Error::Dataset(format!(
                    "unexpected shape type {other} in polygon shapefile"
                )))
            }
        }
        pos = content_end;
    }

    match polygons.len() {
        1 => Ok(polygons.remove(0)),
        n => Err(Error::Dataset(format!(
            "shapefile must define exactly one polygon, found {n}"
        ))),
    }
}

fn parse_polygon_record(content: &[u8]) -> Result<Polygon> {
    // type (4) + bbox (32) + part count (4) + point count (4)
    let num_parts = read_i32_le(content, 36)?;
    let num_points = read_i32_le(content, 40)?;
    if num_parts < 1 || num_points < 3 {
        return Err(Error::Dataset(format!(
            "polygon record with {num_parts} parts and {num_points} points"
        )));
    }
    let (num_parts, num_points) = (num_parts as usize, num_points as usize);
    let parts_at = 44;
    let points_at = parts_at + 4 * num_parts;

    let first_start = read_i32_le(content, parts_at)?.max(0) as usize;
    let first_end = if num_parts > 1 {
        read_i32_le(content, parts_at + 4)?.max(0) as usize
    } else {
        num_points
    };
    if first_start >= first_end || first_end > num_points {
        return Err(Error::Dataset("invalid polygon part index".into()));
    }

    let ring = (first_start..first_end)
        .map(|i| {
            let at = points_at + 16 * i;
            Ok(DVec2::new(read_f64_le(content, at)?, read_f64_le(content, at + 8)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Polygon::try_new(ring)
}

fn take<const N: usize>(bytes: &[u8], at: usize) -> Result<[u8; N]> {
    bytes
        .get(at..at + N)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| Error::Dataset(format!("shapefile truncated at byte {at}")))
}

fn read_i32_be(bytes: &[u8], at: usize) -> Result<i32> {
    take::<4>(bytes, at).map(i32::from_be_bytes)
}

/// A length stored in 16-bit words, as bytes.
fn read_length(bytes: &[u8], at: usize, what: &str) -> Result<usize> {
    let words = read_i32_be(bytes, at)?;
    usize::try_from(words)
        .ok()
        .and_then(|w| w.checked_mul(2))
        .ok_or_else(|| Error::Dataset(format!("invalid {what} length {words} in shapefile")))
}

fn read_i32_le(bytes: &[u8], at: usize) -> Result<i32> {
    take::<4>(bytes, at).map(i32::from_le_bytes)
}

fn read_f64_le(bytes: &[u8], at: usize) -> Result<f64> {
    take::<8>(bytes, at).map(f64::from_le_bytes)
}
