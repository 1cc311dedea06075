//! Tolerant cell parsing.
//!
//! Dossier exports are written by several tools over time, so cells can be empty,
//! spelled as `nan`/`null`/`none`, or hold garbage. All of those collapse to `None`;
//! these functions never return an error.

/// Parse a cell as a finite float.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || is_null_token(s) {
        return None;
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Parse a cell as an integer: `floor(parse_float(s))`.
pub fn parse_int(s: &str) -> Option<i64> {
    parse_float(s).map(|v| v.floor() as i64)
}

fn is_null_token(s: &str) -> bool {
    ["nan", "null", "none"]
        .iter()
        .any(|token| s.eq_ignore_ascii_case(token))
}
