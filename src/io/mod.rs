//! Input/output helpers.
//!
//! - dossier artifact loading (`ingest`)
//! - JSON/Markdown report files (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
