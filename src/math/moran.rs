//! Global Moran's I over a rectangular grid.
//!
//! Rook (4-neighbour) contiguity with binary weights. Each undirected edge is visited
//! once (right and down neighbours) and counted twice, so the implied weight matrix is
//! symmetric and `s0` is the sum of all its entries.
//!
//! Reading the result: `I > 0` clustered, `I ≈ 0` spatially random, `I < 0` dispersed.

use crate::math::stats::compensated_sum;

/// Moran's I of a row-major grid; missing or non-finite cells are left out.
///
/// `None` when fewer than 3 cells are valid, the valid cells have zero variance, or
/// no two valid cells are adjacent.
pub fn morans_i(grid: &[Option<f64>], width: usize, height: usize) -> Option<f64> {
    if width == 0 || height == 0 || grid.len() != width * height {
        return None;
    }

    let at = |x: usize, y: usize| grid[y * width + x].filter(|v| v.is_finite());

    let valid: Vec<f64> = grid.iter().filter_map(|v| v.filter(|v| v.is_finite())).collect();
    let n = valid.len();
    if n < 3 {
        return None;
    }
    let mean = compensated_sum(valid.iter().copied()) / n as f64;

    let denom: f64 = valid.iter().map(|v| (v - mean) * (v - mean)).sum();
    if denom <= 0.0 {
        return None;
    }

    let mut num = 0.0;
    let mut s0 = 0.0;
    for y in 0..height {
        for x in 0..width {
            let Some(v) = at(x, y) else { continue };
            let dv = v - mean;
            if x + 1 < width {
                if let Some(vr) = at(x + 1, y) {
                    num += 2.0 * dv * (vr - mean);
                    s0 += 2.0;
                }
            }
            if y + 1 < height {
                if let Some(vd) = at(x, y + 1) {
                    num += 2.0 * dv * (vd - mean);
                    s0 += 2.0;
                }
            }
        }
    }

    if s0 <= 0.0 {
        return None;
    }
    Some((n as f64 / s0) * (num / denom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn checkerboard_is_strongly_negative() {
        let (w, h) = (4usize, 4usize);
        let values: Vec<f64> = (0..w * h)
            .map(|i| if (i % w + i / w) % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let i = morans_i(&grid_from(&values), w, h).unwrap();
        // Every adjacent pair disagrees: I = -1 exactly.
        assert!((i + 1.0).abs() < 1e-12, "I = {i}");

        let small = grid_from(&[1.0, -1.0, -1.0, 1.0]);
        assert!(morans_i(&small, 2, 2).unwrap() < -0.5);
    }

    #[test]
    fn smooth_gradient_is_positive() {
        let (w, h) = (5usize, 5usize);
        let values: Vec<f64> = (0..w * h).map(|i| (i % w) as f64).collect();
        let i = morans_i(&grid_from(&values), w, h).unwrap();
        assert!(i > 0.5, "I = {i}");
    }

    #[test]
    fn uniform_grid_is_undefined() {
        assert_eq!(morans_i(&grid_from(&[2.0; 9]), 3, 3), None);
    }

    #[test]
    fn too_few_valid_cells_is_undefined() {
        let grid = vec![Some(1.0), None, Some(f64::NAN), Some(2.0)];
        assert_eq!(morans_i(&grid, 2, 2), None);
    }

    #[test]
    fn isolated_cells_give_no_weights() {
        // Valid cells on a diagonal never touch.
        let grid = vec![
            Some(1.0), None, None,
            None, Some(2.0), None,
            None, None, Some(4.0),
        ];
        assert_eq!(morans_i(&grid, 3, 3), None);
    }

    #[test]
    fn mismatched_dimensions_are_undefined() {
        assert_eq!(morans_i(&grid_from(&[1.0, 2.0, 3.0]), 2, 2), None);
        assert_eq!(morans_i(&[], 0, 0), None);
    }
}
