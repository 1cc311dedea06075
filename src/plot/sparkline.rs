//! One-line Unicode sparklines for time series in Markdown reports.
//!
//! Output is deterministic (handy for golden tests) and fixed-width at most `width`
//! characters. Missing samples render as a space so gaps stay visible.

pub const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
pub const DEFAULT_WIDTH: usize = 48;

pub fn sparkline(values: &[Option<f64>], width: usize) -> String {
    let finite = values.iter().flatten().copied().filter(|v| v.is_finite());
    let Some((lo, hi)) = value_range(finite) else {
        return String::new();
    };

    if hi <= lo {
        return BLOCKS[0].to_string().repeat(values.len().min(width));
    }

    let sampled = downsample(values, width);
    sampled
        .into_iter()
        .map(|v| match v {
            Some(v) if v.is_finite() => BLOCKS[block_index(v, lo, hi)],
            _ => ' ',
        })
        .collect()
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Pick `width` samples at `floor(i * len / width)` when the series is too long.
fn downsample(values: &[Option<f64>], width: usize) -> Vec<Option<f64>> {
    if values.len() <= width {
        return values.to_vec();
    }
    let stride = values.len() as f64 / width as f64;
    (0..width)
        .map(|i| values[((i as f64 * stride) as usize).min(values.len() - 1)])
        .collect()
}

fn block_index(v: f64, lo: f64, hi: f64) -> usize {
    let t = ((v - lo) / (hi - lo)).clamp(0.0, 0.999_999);
    (t * BLOCKS.len() as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().copied().map(Some).collect()
    }

    #[test]
    fn empty_or_all_missing_is_blank() {
        assert_eq!(sparkline(&[], DEFAULT_WIDTH), "");
        assert_eq!(sparkline(&[None, Some(f64::NAN)], DEFAULT_WIDTH), "");
    }

    #[test]
    fn ramp_uses_lowest_and_highest_blocks() {
        let s = sparkline(&some(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]), DEFAULT_WIDTH);
        assert_eq!(s, "▁▂▃▄▅▆▇█");
    }

    #[test]
    fn flat_series_is_capped_at_width() {
        assert_eq!(sparkline(&some(&[3.0; 5]), DEFAULT_WIDTH), "▁▁▁▁▁");
        assert_eq!(sparkline(&some(&[3.0; 100]), 10).chars().count(), 10);
    }

    #[test]
    fn gaps_render_as_spaces() {
        let s = sparkline(&[Some(0.0), None, Some(1.0)], DEFAULT_WIDTH);
        assert_eq!(s, "▁ █");
    }

    #[test]
    fn long_series_is_downsampled() {
        let values: Vec<Option<f64>> = (0..200).map(|i| Some(i as f64)).collect();
        let s = sparkline(&values, DEFAULT_WIDTH);
        assert_eq!(s.chars().count(), DEFAULT_WIDTH);
        assert!(s.starts_with('▁'));
        // Last sample is floor(47 * 200/48) = 195, not the max.
        assert!(s.ends_with('█'));
    }
}
