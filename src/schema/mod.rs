//! Schema-tolerant typing of dossier tables.
//!
//! - tolerant cell parsing (`parse`)
//! - numeric column / key column / semantic metric discovery (`discover`)

pub mod discover;
pub mod parse;

pub use discover::*;
pub use parse::*;
