//! Comparisons of success curves read from results files.
//!
//! All functions take rows in increasing order of actual hole count, as an experiment emits
//! them. Success rates are percentages.
use crate::experiment::ResultRow;

/// Success rate for every hole count `0..=max_holes`.
///
/// Hole counts without a row take the rate of the nearest smaller measured count, so a run that
/// stopped at 100% stays at 100% up to `max_holes`.
pub fn success_per_hole_count(rows: &[ResultRow], max_holes: usize) -> Vec<f64> {
    let mut sorted: Vec<&ResultRow> = rows.iter().collect();
    sorted.sort_by_key(|r| r.actual_holes);

    let mut out = vec![0.0; max_holes + 1];
    let mut next = sorted.iter().peekable();
    let mut current = 0.0;
    for (holes, slot) in out.iter_mut().enumerate() {
        while let Some(row) = next.next_if(|r| r.actual_holes <= holes) {
            current = row.success_rate;
        }
        *slot = current;
    }
    out
}

/// Sum of the success rates for `1..=max_holes` holes.
pub fn area_under_curve(rows: &[ResultRow], max_holes: usize) -> f64 {
    success_per_hole_count(rows, max_holes)[1..].iter().sum()
}

/// Hole count at which the curve first reaches `success_rate`, interpolated linearly between
/// the surrounding rows. `None` when the curve never reaches it.
pub fn interpolate_holes_for_success(rows: &[ResultRow], success_rate: f64) -> Option<f64> {
    let i = rows.iter().position(|r| r.success_rate >= success_rate)?;
    let (holes_a, success_a) = match i {
        0 => (0.0, 0.0),
        _ => (rows[i - 1].actual_holes as f64, rows[i - 1].success_rate),
    };
    let holes_b = rows[i].actual_holes as f64;
    let success_b = rows[i].success_rate;
    if success_b == success_a {
        return Some(holes_b);
    }
    let fraction = (success_rate - success_a) / (success_b - success_a);
    Some(holes_a + fraction * (holes_b - holes_a))
}

/// Maximum and mean of the small-to-big hole count ratio needed for equal success, over success
/// rates 1 to 99. `None` when the curves share no such rate.
pub fn break_even_ratios(small: &[ResultRow], big: &[ResultRow]) -> Option<(f64, f64)> {
    let mut small_holes = Vec::new();
    let mut big_holes = Vec::new();
    for rate in 1..=99 {
        let rate = rate as f64;
        let Some(s) = interpolate_holes_for_success(small, rate) else {
            break;
        };
        small_holes.push(s);
        if let Some(b) = interpolate_holes_for_success(big, rate) {
            big_holes.push(b);
        }
    }

    let ratios: Vec<f64> = small_holes
        .iter()
        .zip(&big_holes)
        .map(|(s, b)| s / b)
        .collect();
    if ratios.is_empty() {
        return None;
    }
    let max = ratios.iter().copied().fold(f64::MIN, f64::max);
    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    Some((max, mean))
}

/// Largest difference `small - big` in success rate when `ratio` small holes are dug per big
/// hole, signed, over the big curve's hole counts. Small hole success rates are interpolated.
pub fn maximum_difference_in_success(small: &[ResultRow], big: &[ResultRow], ratio: f64) -> f64 {
    let scale = if ratio > 1.0 { ratio } else { 1.0 };
    let xs: Vec<f64> = small
        .iter()
        .map(|r| r.actual_holes as f64 / scale)
        .collect();

    let mut max_diff: f64 = 0.0;
    for row in big {
        let big_holes = row.actual_holes as f64;
        let Some(i) = xs.iter().position(|&x| x >= big_holes) else {
            break;
        };
        let (x0, y0) = match i {
            0 => (0.0, 0.0),
            _ => (xs[i - 1], small[i - 1].success_rate),
        };
        let (x1, y1) = (xs[i], small[i].success_rate);
        let fraction = if x1 == x0 {
            0.0
        } else {
            (big_holes - x0) / (x1 - x0)
        };
        let diff = y0 + fraction * (y1 - y0) - row.success_rate;
        if diff.abs() > max_diff.abs() {
            max_diff = diff;
        }
    }
    max_diff
}
