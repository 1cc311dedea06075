//! Numeric kernels: distribution statistics, inequality, spatial autocorrelation,
//! and correlation.

pub mod corr;
pub mod gini;
pub mod moran;
pub mod stats;

pub use corr::*;
pub use gini::*;
pub use moran::*;
pub use stats::*;
