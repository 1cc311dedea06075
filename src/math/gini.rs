//! Gini coefficient.
//!
//! Distributions with negative values are shifted up by their minimum before the
//! coefficient is computed. That changes what "inequality" means for signed data, but
//! past reports were produced this way and regression comparisons rely on the exact
//! numbers, so the shift stays.

/// Gini coefficient in `[0, 1]` of the finite values; `None` if there are none.
pub fn gini(values: &[f64]) -> Option<f64> {
    let mut xs: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if xs.is_empty() {
        return None;
    }

    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        for x in xs.iter_mut() {
            *x -= min;
        }
    }

    xs.sort_by(f64::total_cmp);
    let n = xs.len() as f64;
    let total: f64 = xs.iter().sum();
    if total <= 0.0 {
        return Some(0.0);
    }

    // G = 2 Σ i·x_i / (n Σx) − (n+1)/n, ranks starting at 1.
    let weighted: f64 = xs
        .iter()
        .enumerate()
        .map(|(i, x)| (i + 1) as f64 * x)
        .sum();
    let g = (2.0 * weighted) / (n * total) - (n + 1.0) / n;
    Some(g.clamp(0.0, 1.0))
}

/// Gini of the present, finite entries of an optional series.
pub fn gini_of_series(values: &[Option<f64>]) -> Option<f64> {
    let xs: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    gini(&xs)
}
