//! Domain types used throughout the tools.
//!
//! This module defines:
//!
//! - resolved run configuration (`InsightsConfig`, `CompareConfig`, `SampleConfig`)
//! - comparison results (`CompareReport` and its sections)
//! - single-dossier results (`InsightsReport` and its sections)

pub mod types;

pub use types::*;
