//! Distributional statistics over optional series.
//!
//! Absent (`None`) and non-finite entries are skipped everywhere; a series with no
//! finite values has no statistics at all.

use serde::{Deserialize, Serialize};

/// Summary of the finite values of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divides by `n`).
    pub stdev: f64,
    pub min: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
    pub max: f64,
}

/// Finite values of a series, in order.
pub fn finite_values(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| v.is_finite())
        .collect()
}

/// Neumaier-compensated sum, so large values of opposite sign do not swallow
/// small ones.
pub fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut carry = 0.0_f64;
    for v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            carry += (sum - t) + v;
        } else {
            carry += (v - t) + sum;
        }
        sum = t;
    }
    sum + carry
}

pub fn compute_stats(values: &[Option<f64>]) -> Option<MetricStats> {
    let mut xs = finite_values(values);
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(f64::total_cmp);

    let n = xs.len();
    let mean = compensated_sum(xs.iter().copied()) / n as f64;
    let stdev = if n >= 2 {
        let var = compensated_sum(xs.iter().map(|x| (x - mean) * (x - mean))) / n as f64;
        var.sqrt()
    } else {
        0.0
    };

    Some(MetricStats {
        count: n,
        mean,
        stdev,
        min: xs[0],
        p10: percentile(&xs, 0.10),
        p50: percentile(&xs, 0.50),
        p90: percentile(&xs, 0.90),
        p99: percentile(&xs, 0.99),
        max: xs[n - 1],
    })
}

/// Linearly interpolated percentile of an ascending, non-empty slice.
///
/// `p` is a fraction in `[0, 1]`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let k = (n - 1) as f64 * p;
    let i = k.floor() as usize;
    let j = (i + 1).min(n - 1);
    let t = k - i as f64;
    sorted[i] * (1.0 - t) + sorted[j] * t
}

/// Root-mean-square difference over index-aligned pairs where both sides are finite.
pub fn rmse(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let mut acc = 0.0;
    let mut n = 0usize;
    for (x, y) in a.iter().zip(b) {
        let (Some(x), Some(y)) = (x, y) else { continue };
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let d = x - y;
        acc += d * d;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some((acc / n as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().copied().map(Some).collect()
    }

    #[test]
    fn compensated_sum_keeps_small_terms() {
        assert_eq!(compensated_sum([1e16, 1.0, -1e16]), 1.0);
        assert_eq!(compensated_sum(Vec::new()), 0.0);
        let s = compute_stats(&some(&[1e16, 1.0, -1e16])).unwrap();
        assert!((s.mean - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn stats_skip_absent_and_non_finite() {
        let s = compute_stats(&[Some(3.0), None, Some(f64::NAN), Some(1.0), Some(2.0)]).unwrap();
        assert_eq!(s.count, 3);
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);
        // population stdev of [1,2,3] = sqrt(2/3)
        assert!((s.stdev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stats_undefined_when_nothing_finite() {
        assert_eq!(compute_stats(&[]), None);
        assert_eq!(compute_stats(&[None, Some(f64::INFINITY)]), None);
    }

    #[test]
    fn single_value_fills_every_percentile() {
        let s = compute_stats(&[Some(7.5)]).unwrap();
        assert_eq!(s.stdev, 0.0);
        for p in [s.min, s.p10, s.p50, s.p90, s.p99, s.max] {
            assert_eq!(p, 7.5);
        }
    }

    #[test]
    fn median_matches_for_odd_and_even_counts() {
        let odd = compute_stats(&some(&[5.0, 1.0, 3.0])).unwrap();
        assert_eq!(odd.p50, 3.0);
        let even = compute_stats(&some(&[4.0, 1.0, 3.0, 2.0])).unwrap();
        assert!((even.p50 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn percentile_is_monotone_in_p() {
        let xs = [-4.0, -1.0, 0.0, 0.5, 2.0, 2.0, 9.0, 100.0];
        let mut prev = f64::NEG_INFINITY;
        for step in 0..=100 {
            let p = step as f64 / 100.0;
            let v = percentile(&xs, p);
            assert!(v >= prev, "p={p}: {v} < {prev}");
            prev = v;
        }
        assert_eq!(percentile(&xs, 0.0), -4.0);
        assert_eq!(percentile(&xs, 1.0), 100.0);
    }

    #[test]
    fn percentile_interpolates() {
        let xs = [0.0, 10.0];
        assert!((percentile(&xs, 0.9) - 9.0).abs() < 1e-12);
        assert!((percentile(&xs, 0.1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rmse_uses_only_complete_pairs() {
        let a = [Some(1.0), Some(2.0), None, Some(4.0)];
        let b = [Some(2.0), Some(2.0), Some(9.0), Some(f64::NAN)];
        // pairs: (1,2), (2,2) -> sqrt((1 + 0) / 2)
        let r = rmse(&a, &b).unwrap();
        assert!((r - (0.5f64).sqrt()).abs() < 1e-12);
        assert_eq!(rmse(&[None], &[Some(1.0)]), None);
    }
}
