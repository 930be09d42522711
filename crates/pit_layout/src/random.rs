//! Random helpers shared by treasure placement and the layouts.
//!
//! Every draw goes through `&mut dyn RngCore` so callers can pass a seeded
//! [`rand::rngs::StdRng`] for reproducible runs or a test double.
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 random mantissa bits.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Draw from a normal distribution with the given mean and standard deviation.
pub(crate) fn gaussian(rng: &mut dyn RngCore, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean;
    }
    let (z, _) = box_muller_pair(rng);
    mean + z * std_dev
}

fn box_muller_pair(rng: &mut dyn RngCore) -> (f64, f64) {
    let u1 = (1.0 - rand01(rng)).clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * core::f64::consts::PI * u2;

    (r * theta.cos(), r * theta.sin())
}

/// Seed derived from the wall clock, used when a run is not given an explicit seed.
pub fn seed_from_clock() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    // Fold the high bits in so consecutive runs still differ in the low word.
    (nanos as u64) ^ ((nanos >> 64) as u64).rotate_left(17) ^ 0x9E37_79B9_7F4A_7C15
}
