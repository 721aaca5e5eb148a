//! Light implementations.

mod diffuse_area;
mod point;
mod projection;

pub use diffuse_area::*;
pub use point::*;
pub use projection::*;

use rad_core::light::Light;
use rad_core::registry::Registry;
use std::sync::Arc;

/// Register the light constructors.
///
/// * `registry` - The light registry.
pub fn register_lights(registry: &mut Registry<dyn Light>) {
    registry.register("point", |params| Ok(Arc::new(PointLight::from_params(params)?)));
    registry.register("diffusearea", |params| {
        Ok(Arc::new(DiffuseAreaLight::from_params(params)?))
    });
    registry.register("projection", |params| {
        Ok(Arc::new(ProjectionLight::from_params(params)?))
    });
}
