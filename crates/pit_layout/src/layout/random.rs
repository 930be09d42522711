//! Uniformly random holes that never overlap each other.
use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::geometry::Hole;
use crate::layout::{require_holes, require_square, DigOutcome, Layout};
use crate::random::rand01;

/// Default number of buckets per side of the overlap index.
pub const DEFAULT_BUCKETS: usize = 50;

/// Random non-overlapping layout.
///
/// Candidates are drawn uniformly inside the inset field and rejected while they overlap an
/// accepted hole. There is no retry limit: asking for more holes than fit never returns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomLayout {
    pub hole_size: f64,
    pub holes: usize,
    /// Inset candidates by half the side of a square cell per hole.
    pub border: bool,
    /// Buckets per side of the overlap index.
    pub buckets: usize,
}

impl RandomLayout {
    pub fn new(hole_size: f64, holes: usize) -> Self {
        Self {
            hole_size,
            holes,
            border: false,
            buckets: DEFAULT_BUCKETS,
        }
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn with_buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets;
        self
    }

    /// Inset from each edge of a field of the given width.
    pub fn inset(&self, width: f64) -> f64 {
        if self.border {
            (width / (self.holes as f64).sqrt()) / 2.0
        } else {
            0.0
        }
    }
}

/// Accepted holes bucketed on a square grid over the field.
struct BucketIndex {
    buckets: usize,
    bucket_size: f64,
    cells: Vec<Vec<Hole>>,
}

impl BucketIndex {
    fn new(buckets: usize, extent: f64) -> Self {
        Self {
            buckets,
            bucket_size: extent / buckets as f64,
            cells: vec![Vec::new(); buckets * buckets],
        }
    }

    fn bucket_of(&self, v: f64) -> usize {
        ((v / self.bucket_size).floor() as isize).clamp(0, self.buckets as isize - 1) as usize
    }

    fn cell_index(&self, x: usize, y: usize) -> usize {
        y * self.buckets + x
    }

    /// Scans the buckets covering `centre ± reach` on both axes.
    fn overlaps(&self, hole: &Hole, reach: f64) -> bool {
        let (x0, x1) = (
            self.bucket_of(hole.centre_x - reach),
            self.bucket_of(hole.centre_x + reach),
        );
        let (y0, y1) = (
            self.bucket_of(hole.centre_y - reach),
            self.bucket_of(hole.centre_y + reach),
        );
        for y in y0..=y1 {
            for x in x0..=x1 {
                if self.cells[self.cell_index(x, y)]
                    .iter()
                    .any(|h| h.intersects(hole))
                {
                    return true;
                }
            }
        }
        false
    }

    fn insert(&mut self, hole: Hole) {
        let idx = self.cell_index(self.bucket_of(hole.centre_x), self.bucket_of(hole.centre_y));
        self.cells[idx].push(hole);
    }
}

/// Where the field will put a hole centred at `v` on an axis of length `limit`.
fn clamp_like_field(v: f64, half: f64, limit: f64) -> f64 {
    if v - half < 0.0 {
        half
    } else if v + half > limit {
        limit - half
    } else {
        v
    }
}

impl Layout for RandomLayout {
    fn name(&self) -> &'static str {
        "random"
    }

    fn play(
        &self,
        field: &mut Field,
        rng: &mut dyn RngCore,
        return_after_hit: bool,
    ) -> Result<DigOutcome> {
        require_square(field, self.name())?;
        require_holes(self.holes, self.name())?;
        if self.buckets == 0 {
            return Err(Error::InvalidConfig(
                "random layout needs at least one bucket".into(),
            ));
        }

        let width = field.width();
        let border = self.inset(width);
        let span = width - 2.0 * border;
        let half = self.hole_size / 2.0;
        let mut index = BucketIndex::new(self.buckets, width);
        let mut out = DigOutcome {
            actual_holes: self.holes,
            ..Default::default()
        };

        let mut accepted = 0;
        while accepted < self.holes {
            let raw = DVec2::new(
                rand01(rng) * span + border,
                rand01(rng) * span + border,
            );
            let candidate = Hole::square(
                clamp_like_field(raw.x, half, width),
                clamp_like_field(raw.y, half, width),
                self.hole_size,
            );
            if index.overlaps(&candidate, self.hole_size) {
                continue;
            }

            let dig = field.dig(self.hole_size, raw.x, raw.y)?;
            out.record(dig);
            index.insert(candidate);
            accepted += 1;
            if return_after_hit && dig.hit {
                break;
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
    use crate::treasure::{CircleTreasure, Treasure};

    #[test]
    fn holes_never_overlap() {
        let mut rng = StdRng::seed_from_u64(21);
        for buckets in [1, 7, DEFAULT_BUCKETS] {
            let layout = RandomLayout::new(4.0, 150).with_buckets(buckets);
            let mut field = circle_field(100.0, 1.0, 1.0, 0.1);
            let out = layout.play(&mut field, &mut rng, false).unwrap();
            assert_eq!(out.actual_holes, 150);
            let holes = field.holes();
            assert_eq!(holes.len(), 150);
            for (i, a) in holes.iter().enumerate() {
                for b in &holes[i + 1..] {
                    assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn field_agrees_no_hole_overlaps_an_earlier_one() {
        let mut rng = StdRng::seed_from_u64(3);
        let layout = RandomLayout::new(2.0, 200);
        let mut field = circle_field(100.0, 1.0, 1.0, 0.1);
        layout.play(&mut field, &mut rng, false).unwrap();

        let mut replay = Field::intersect(100.0, 100.0);
        replay
            .place(Treasure::Circle(CircleTreasure::new(1.0, 1.0, 0.1)))
            .unwrap();
        for hole in field.holes() {
            assert!(!replay.intersects_existing_hole(hole));
            replay
                .dig_hole(hole.width, hole.centre_x, hole.centre_y)
                .unwrap();
        }
    }

    #[test]
    fn bordered_holes_stay_in_the_inset() {
        let mut rng = StdRng::seed_from_u64(8);
        let layout = RandomLayout::new(1.0, 16).with_border(true);
        assert_eq!(layout.inset(100.0), 12.5);
        let mut field = circle_field(100.0, 1.0, 1.0, 0.1);
        layout.play(&mut field, &mut rng, false).unwrap();
        for h in field.holes() {
            assert!((12.5..=87.5).contains(&h.centre_x));
            assert!((12.5..=87.5).contains(&h.centre_y));
        }
        assert!(!field.border_adjusted());
    }

    #[test]
    fn early_return_reports_requested_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let layout = RandomLayout::new(1.0, 80);
        let mut field = circle_field(100.0, 50.0, 50.0, 40.0);
        let out = layout.play(&mut field, &mut rng, true).unwrap();
        assert!(out.found);
        assert_eq!(out.actual_holes, 80);
        assert!(field.holes().len() < 80);
        let last = field.holes().last().unwrap();
        assert!(field.treasure().unwrap().intersects(last).unwrap());
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut field = circle_field(100.0, 50.0, 50.0, 1.0);
        assert!(matches!(
            RandomLayout::new(1.0, 5)
                .with_buckets(0)
                .play(&mut field, &mut rng, false),
            Err(Error::InvalidConfig(_))
        ));

        let mut field = Field::intersect(100.0, 60.0);
        field
            .place(Treasure::Circle(CircleTreasure::new(10.0, 10.0, 1.0)))
            .unwrap();
        assert!(RandomLayout::new(1.0, 5)
            .play(&mut field, &mut rng, false)
            .is_err());
    }
}
