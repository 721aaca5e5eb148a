//! Participating-medium implementations.

mod heterogeneous;
mod homogeneous;

pub use heterogeneous::*;
pub use homogeneous::*;

use rad_core::medium::Medium;
use rad_core::registry::Registry;
use std::sync::Arc;

/// Register the medium constructors.
///
/// * `registry` - The medium registry.
pub fn register_media(registry: &mut Registry<dyn Medium>) {
    registry.register("homogeneous", |params| {
        Ok(Arc::new(HomogeneousMedium::from_params(params)?))
    });
    registry.register("heterogeneous", |params| {
        Ok(Arc::new(GridMedium::from_params(params)?))
    });
}
