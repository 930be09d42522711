//! Scrambled Halton low-discrepancy layout.
use glam::DVec2;
use rand::RngCore;

use crate::error::Result;
use crate::field::Field;
use crate::layout::{require_holes, require_square, DigOutcome, Layout};

const BASES: (u32, u32) = (2, 3);

/// Largest `f64` below one.
const ONE_MINUS_EPSILON: f64 = 1.0 - f64::EPSILON / 2.0;

/// Holes at the points of a 2D Halton sequence in bases (2, 3), scrambled per play by a random
/// digit permutation for each base.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HaltonLayout {
    pub hole_size: f64,
    pub holes: usize,
    /// Inset the points by half the side of a square cell per hole; otherwise by half a hole.
    pub border: bool,
}

impl HaltonLayout {
    pub fn new(hole_size: f64, holes: usize) -> Self {
        Self {
            hole_size,
            holes,
            border: false,
        }
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Inset from each edge of a field of the given width.
    pub fn inset(&self, width: f64) -> f64 {
        if self.border {
            (width / (self.holes as f64).sqrt()) / 2.0
        } else {
            self.hole_size / 2.0
        }
    }
}

/// `count` scrambled Halton points in `[0, 1)²`.
pub fn scrambled_halton(count: usize, rng: &mut dyn RngCore) -> Vec<DVec2> {
    let px = DigitPermutation::random(BASES.0, rng);
    let py = DigitPermutation::random(BASES.1, rng);
    (0..count as u64)
        .map(|i| DVec2::new(px.radical_inverse(i), py.radical_inverse(i)))
        .collect()
}

/// A random permutation of the digits of one base, applied to every digit position.
struct DigitPermutation {
    base: u32,
    perm: Vec<u32>,
    digits: u32,
}

impl DigitPermutation {
    fn random(base: u32, rng: &mut dyn RngCore) -> Self {
        debug_assert!(base >= 2);
        let mut perm: Vec<u32> = (0..base).collect();
        // Fisher–Yates
        for i in (1..perm.len()).rev() {
            let j = (rng.next_u64() % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }
        // Enough digits to fill the f64 mantissa.
        let digits = (53.0 / (base as f64).log2()).ceil() as u32;
        Self { base, perm, digits }
    }

    fn radical_inverse(&self, mut n: u64) -> f64 {
        let inv_b = 1.0 / self.base as f64;
        let mut f = inv_b;
        let mut result = 0.0;
        // Leading zero digits are permuted too, so every index is scrambled.
        for _ in 0..self.digits {
            let digit = self.perm[(n % self.base as u64) as usize] as f64;
            result += digit * f;
            n /= self.base as u64;
            f *= inv_b;
        }
        result.min(ONE_MINUS_EPSILON)
    }
}

impl Layout for HaltonLayout {
    fn name(&self) -> &'static str {
        "halton"
    }

    fn play(
        &self,
        field: &mut Field,
        rng: &mut dyn RngCore,
        return_after_hit: bool,
    ) -> Result<DigOutcome> {
        require_square(field, self.name())?;
        require_holes(self.holes, self.name())?;

        let border = self.inset(field.width());
        let span = DVec2::new(field.width(), field.height()) - 2.0 * border;
        let mut out = DigOutcome {
            actual_holes: self.holes,
            ..Default::default()
        };
        for p in scrambled_halton(self.holes, rng) {
            let at = p * span + border;
            let dig = field.dig(self.hole_size, at.x, at.y)?;
            out.record(dig);
            if return_after_hit && dig.hit {
                break;
            }
        }
        Ok(out)
    }
}
