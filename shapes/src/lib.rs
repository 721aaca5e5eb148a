//! Shape implementations.

mod sphere;
mod triangle_mesh;

pub use sphere::*;
pub use triangle_mesh::*;

use rad_core::registry::Registry;
use rad_core::shape::Shape;
use std::sync::Arc;

/// Register the shape constructors.
///
/// * `registry` - The shape registry.
pub fn register_shapes(registry: &mut Registry<dyn Shape>) {
    registry.register("sphere", |params| Ok(Arc::new(Sphere::from_params(params)?)));
    registry.register("trianglemesh", |params| {
        Ok(Arc::new(TriangleMesh::from_params(params)?))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::paramset::{ParamSet, ParamValue};

    #[test]
    fn registry_builds_spheres() {
        let mut registry: Registry<dyn Shape> = Registry::new();
        register_shapes(&mut registry);

        let mut params = ParamSet::new();
        params.insert("radius", ParamValue::Float(2.0));
        let sphere = registry.create("sphere", &params).unwrap();
        assert!((sphere.area() - 16.0 * rad_core::common::PI).abs() < 1e-3);
    }
}
