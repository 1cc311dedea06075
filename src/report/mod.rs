//! Human-readable report output.
//!
//! Formatting lives in one place so the analytics code stays free of presentation
//! details and output changes stay localized.

pub mod format;

pub use format::{fmt_float, format_compare_markdown, format_insights_markdown};
