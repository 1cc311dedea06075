//! Text plotting for terminal and Markdown output.

pub mod sparkline;

pub use sparkline::{DEFAULT_WIDTH, sparkline};
