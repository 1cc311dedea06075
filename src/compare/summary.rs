//! `summary.json` comparison.

use serde_json::Value;

use crate::domain::SummaryComparison;
use crate::io::ingest::Summary;

pub fn compare_summary(a: Option<&Summary>, b: Option<&Summary>) -> SummaryComparison {
    let field = |s: Option<&Summary>, key: &str| {
        s.and_then(|s| s.get(key)).cloned().unwrap_or(Value::Null)
    };

    let mut out = SummaryComparison {
        present_a: a.is_some(),
        present_b: b.is_some(),
        same_seed: None,
        same_size: None,
        seed_a: field(a, "seed"),
        seed_b: field(b, "seed"),
        width_a: field(a, "width"),
        width_b: field(b, "width"),
        height_a: field(a, "height"),
        height_b: field(b, "height"),
        hash_a: field(a, "hash"),
        hash_b: field(b, "hash"),
        tool_a: field(a, "tool"),
        tool_b: field(b, "tool"),
    };

    if a.is_some() && b.is_some() {
        out.same_seed = Some(out.seed_a == out.seed_b && !out.seed_a.is_null());
        out.same_size = Some(
            out.width_a == out.width_b && out.height_a == out.height_b && !out.width_a.is_null(),
        );
    }

    out
}
