//! `dossier-analytics` library crate.
//!
//! The binary (`dossier`) is a thin wrapper around this library so that:
//!
//! - the analytics and comparison logic is testable without spawning processes
//! - integration tests drive the same workflows the binary runs

pub mod app;
pub mod cli;
pub mod compare;
pub mod data;
pub mod domain;
pub mod error;
pub mod insights;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod schema;
