//! Importance-sampling distribution tables and sampling routines.

mod common;
mod distribution_1d;
mod distribution_2d;

// Re-export
pub use common::*;
pub use distribution_1d::*;
pub use distribution_2d::*;
