//! Per-ray radiance estimators and the tile-parallel render job.

mod ao;
mod common;
mod direct;
mod gbuffer;
mod job;

pub use ao::*;
pub use common::*;
pub use direct::*;
pub use gbuffer::*;
pub use job::*;

use rad_core::registry::Registry;
use rad_core::renderer::Renderer;
use std::sync::Arc;

/// Register the renderer constructors.
///
/// * `registry` - The renderer registry.
pub fn register_renderers(registry: &mut Registry<dyn Renderer>) {
    registry.register("ao", |params| Ok(Arc::new(AoRenderer::from_params(params)?)));
    registry.register("direct", |params| {
        Ok(Arc::new(DirectRenderer::from_params(params)?))
    });
    registry.register("gbuffer", |params| {
        Ok(Arc::new(GBufferRenderer::from_params(params)?))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::paramset::ParamSet;

    #[test]
    fn registry_knows_every_estimator() {
        let mut registry = Registry::new();
        register_renderers(&mut registry);
        let params = ParamSet::new();
        for name in ["ao", "direct", "gbuffer"] {
            assert!(registry.create(name, &params).is_ok(), "{name}");
        }
        assert!(registry.create("path", &params).is_err());
    }
}
