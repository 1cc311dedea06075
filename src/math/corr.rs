//! Pearson correlation between two index-aligned series.

use crate::math::stats::compensated_sum;

/// Pearson's r over positions where both values are present and finite.
///
/// `None` with fewer than 3 such pairs or when either side has zero variance.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if pairs.len() < 3 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx = compensated_sum(pairs.iter().map(|p| p.0)) / n;
    let my = compensated_sum(pairs.iter().map(|p| p.1)) / n;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in &pairs {
        let dx = x - mx;
        let dy = y - my;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}
