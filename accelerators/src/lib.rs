//! Acceleration structures.

mod bvh;
mod shape_list;

pub use bvh::*;
pub use shape_list::*;
