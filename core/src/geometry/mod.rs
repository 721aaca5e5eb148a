//! Geometry: vectors, points, bounds, rays, frames and transforms.

mod bounds;
mod frame;
mod point;
mod ray;
mod transform;
mod vector3;

// Re-export
pub use bounds::*;
pub use frame::*;
pub use point::*;
pub use ray::*;
pub use transform::*;
pub use vector3::*;
