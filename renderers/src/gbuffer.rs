//! Geometry-buffer debug estimator.

use rad_core::error::{Error, Result};
use rad_core::geometry::Ray;
use rad_core::paramset::ParamSet;
use rad_core::renderer::Renderer;
use rad_core::sampler::Sampler;
use rad_core::scene::Scene;
use rad_core::spectrum::Spectrum;

/// Channel a `GBufferRenderer` visualizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GBufferChannel {
    /// World-space hit position.
    Position,

    /// Shading normal remapped to `[0, 1]³`.
    Normal,

    /// Texture coordinate.
    Uv,

    /// Hit distance along the ray.
    Depth,
}

/// Writes a geometry channel instead of radiance; misses are black.
pub struct GBufferRenderer {
    channel: GBufferChannel,
}

impl GBufferRenderer {
    /// Create a new `GBufferRenderer`.
    ///
    /// * `channel` - Channel to visualize.
    pub fn new(channel: GBufferChannel) -> Self {
        Self { channel }
    }

    /// Create a `GBufferRenderer` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let name = params.find_one_string("channel", "normal");
        let channel = match name.as_str() {
            "position" => GBufferChannel::Position,
            "normal" => GBufferChannel::Normal,
            "uv" => GBufferChannel::Uv,
            "depth" => GBufferChannel::Depth,
            other => {
                return Err(Error::InvalidData(format!(
                    "unknown gbuffer channel '{other}'"
                )))
            }
        };
        Ok(Self::new(channel))
    }
}

impl Renderer for GBufferRenderer {
    fn li(&self, ray: &Ray, scene: &Scene, _sampler: &mut dyn Sampler) -> Spectrum {
        let Some(si) = scene.intersect(ray) else {
            return Spectrum::ZERO;
        };
        match self.channel {
            GBufferChannel::Position => Spectrum::new(si.p.x, si.p.y, si.p.z),
            GBufferChannel::Normal => {
                let n = si.frame.n;
                Spectrum::new(n.x * 0.5 + 0.5, n.y * 0.5 + 0.5, n.z * 0.5 + 0.5)
            }
            GBufferChannel::Uv => Spectrum::new(si.uv.x, si.uv.y, 0.0),
            GBufferChannel::Depth => Spectrum::splat(si.t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_channel_is_rejected() {
        let mut params = ParamSet::new();
        params.insert(
            "channel",
            rad_core::paramset::ParamValue::String("velocity".to_string()),
        );
        assert!(GBufferRenderer::from_params(&params).is_err());
    }
}
