//! Data sources for the tools.
//!
//! Real dossiers come from the simulator's exporter; `sample` builds synthetic ones
//! for demos and tests.

pub mod sample;

pub use sample::{SampleDossier, generate_dossier, write_dossier};
