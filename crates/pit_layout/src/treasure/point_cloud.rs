//! Real-world artefact point clouds with a unit-parcel bucket index.
//!
//! Artefact coordinates are read from a CSV file, shifted so the smallest observed `x` and `y`
//! become the local origin, and bucketed into parcels of one distance unit keyed by
//! `(floor(x), floor(y))`. Counting the artefacts under a hole only scans the parcels the hole
//! overlaps.
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use glam::DVec2;
use mint::Vector2;
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::{Aabb, Hole};
use crate::random::rand01;

pub const X_COLUMN: &str = "xcoord";
pub const Y_COLUMN: &str = "ycoord";

/// Largest parcel grid a cloud may span, in unit parcels.
pub const MAX_PARCELS: usize = 1 << 22;

/// Artefact locations in local coordinates, grouped by unit parcel.
#[derive(Debug, Clone)]
pub struct ArtefactCloud {
    /// Points sorted by parcel; parcel `i` owns `points[offsets[i]..offsets[i + 1]]`.
    points: Vec<DVec2>,
    offsets: Vec<usize>,
    columns: usize,
    rows: usize,
    extent: DVec2,
    origin: DVec2,
}

impl ArtefactCloud {
    /// Builds the cloud from raw coordinates, normalising to the minimum observed coordinate.
    pub fn from_points<I, P>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Vector2<f64>>,
    {
        let raw: Vec<DVec2> = points.into_iter().map(|p| DVec2::from(p.into())).collect();
        if raw.iter().any(|p| !p.is_finite()) {
            return Err(Error::Dataset("artefact coordinates must be finite".into()));
        }
        let bounds = Aabb::from_points(raw.iter().copied())
            .ok_or_else(|| Error::Dataset("artefact data contains no points".into()))?;

        let origin = bounds.min;
        let extent = bounds.max - origin;
        let (columns, rows) = parcel_grid(extent)?;

        let local: Vec<DVec2> = raw.iter().map(|p| *p - origin).collect();
        let parcel_of = |p: &DVec2| -> usize {
            let x = (p.x.floor() as usize).min(columns - 1);
            let y = (p.y.floor() as usize).min(rows - 1);
            y * columns + x
        };

        // Counting sort into parcels.
        let mut offsets = vec![0usize; columns * rows + 1];
        for p in &local {
            offsets[parcel_of(p) + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }
        let mut cursor = offsets.clone();
        let mut sorted = vec![DVec2::ZERO; local.len()];
        for p in &local {
            let idx = parcel_of(p);
            sorted[cursor[idx]] = *p;
            cursor[idx] += 1;
        }

        debug!(
            "Indexed {} artefacts into {}x{} parcels (extent {:.3}x{:.3}).",
            sorted.len(),
            columns,
            rows,
            extent.x,
            extent.y
        );

        Ok(Self {
            points: sorted,
            offsets,
            columns,
            rows,
            extent,
            origin,
        })
    }

    /// Reads artefacts from CSV data with `xcoord` and `ycoord` header columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::Dataset(format!("missing '{name}' column")))
        };
        let x_idx = column(X_COLUMN)?;
        let y_idx = column(Y_COLUMN)?;

        let mut points = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let parse = |idx: usize, name: &str| -> Result<f64> {
                let raw = record.get(idx).unwrap_or_default();
                raw.parse::<f64>().map_err(|_| {
                    Error::Dataset(format!("row {}: invalid {name} value '{raw}'", row + 2))
                })
            };
            points.push(DVec2::new(parse(x_idx, X_COLUMN)?, parse(y_idx, Y_COLUMN)?));
        }

        Self::from_points(points)
    }

    /// Reads artefacts from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Dataset(format!("cannot open artefact data '{}': {e}", path.display()))
        })?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Width and height of the normalised cloud.
    pub fn extent(&self) -> DVec2 {
        self.extent
    }

    /// The raw coordinate that became the local origin.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Parcel grid size as `(columns, rows)`.
    pub fn parcel_dims(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Artefacts in local coordinates, grouped by parcel.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    #[inline]
    fn parcel(&self, x: usize, y: usize) -> &[DVec2] {
        let idx = y * self.columns + x;
        &self.points[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Number of artefacts inside the closed box of `hole` with the cloud anchored at `top_left`.
    pub fn count_in(&self, top_left: DVec2, hole: &Hole) -> Result<usize> {
        let b = hole.bounds();
        let site = Aabb::new(top_left, top_left + self.extent);
        if !site.overlaps_closed(&b) {
            return Ok(0);
        }

        let local = b.translated(-top_left);
        let start_x = local.min.x.clamp(0.0, self.extent.x).floor() as i64;
        let end_x = local.max.x.clamp(0.0, self.extent.x).floor() as i64;
        let start_y = local.min.y.clamp(0.0, self.extent.y).floor() as i64;
        let end_y = local.max.y.clamp(0.0, self.extent.y).floor() as i64;

        for (x, y) in [(start_x, start_y), (end_x, end_y)] {
            if x < 0 || y < 0 || x >= self.columns as i64 || y >= self.rows as i64 {
                return Err(Error::ParcelOutOfRange {
                    x,
                    y,
                    columns: self.columns,
                    rows: self.rows,
                    hole_x: hole.centre_x,
                    hole_y: hole.centre_y,
                });
            }
        }

        // One parcel of slack absorbs rounding at parcel edges.
        let x_range = (start_x.max(1) - 1) as usize..=((end_x + 1) as usize).min(self.columns - 1);
        let y_range = (start_y.max(1) - 1) as usize..=((end_y + 1) as usize).min(self.rows - 1);

        let mut count = 0;
        for y in y_range {
            for x in x_range.clone() {
                count += self
                    .parcel(x, y)
                    .iter()
                    .filter(|p| b.contains_closed(top_left + **p))
                    .count();
            }
        }
        Ok(count)
    }

    /// Reference count scanning every artefact.
    pub fn count_in_linear(&self, top_left: DVec2, hole: &Hole) -> usize {
        let b = hole.bounds();
        self.points
            .iter()
            .filter(|p| b.contains_closed(top_left + **p))
            .count()
    }
}

/// Parcel columns and rows covering `extent`, bounded by [`MAX_PARCELS`].
fn parcel_grid(extent: DVec2) -> Result<(usize, usize)> {
    let too_wide = || {
        Error::Dataset(format!(
            "artefacts span {:.3}x{:.3} units, more than {MAX_PARCELS} unit parcels; \
             check the coordinate units",
            extent.x, extent.y
        ))
    };
    let columns = extent.x.floor() + 1.0;
    let rows = extent.y.floor() + 1.0;
    if columns * rows > MAX_PARCELS as f64 {
        return Err(too_wide());
    }
    let (columns, rows) = (columns as usize, rows as usize);
    columns
        .checked_mul(rows)
        .filter(|&n| n <= MAX_PARCELS)
        .map(|_| (columns, rows))
        .ok_or_else(too_wide)
}

/// An artefact cloud anchored on a field.
#[derive(Debug, Clone)]
pub struct PlacedCloud {
    pub cloud: Arc<ArtefactCloud>,
    pub top_left: DVec2,
}

impl PlacedCloud {
    pub fn new(cloud: Arc<ArtefactCloud>, top_left: DVec2) -> Self {
        Self { cloud, top_left }
    }

    /// Anchors the cloud uniformly so its extent lies within `width` x `height`.
    pub fn place_randomly(
        cloud: Arc<ArtefactCloud>,
        width: f64,
        height: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        let extent = cloud.extent();
        if extent.x > width || extent.y > height {
            return Err(Error::TreasureTooLarge {
                treasure_width: extent.x,
                treasure_height: extent.y,
                field_width: width,
                field_height: height,
            });
        }
        let top_left = DVec2::new(
            rand01(rng) * (width - extent.x),
            rand01(rng) * (height - extent.y),
        );
        Ok(Self::new(cloud, top_left))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.top_left, self.top_left + self.cloud.extent())
    }

    pub fn artefact_count(&self, hole: &Hole) -> Result<usize> {
        self.cloud.count_in(self.top_left, hole)
    }

    /// Artefacts in field coordinates, in parcel order.
    pub fn artefacts(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.cloud.points().iter().map(move |p| self.top_left + *p)
    }
}
