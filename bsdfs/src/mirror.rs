//! Perfect specular reflection.

use rad_core::bsdf::{Bsdf, BsdfContext, BsdfSample, LobeType};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// An ideal mirror. The single Dirac lobe is reachable only through `sample`;
/// `eval` and `pdf` are identically zero.
pub struct Mirror {
    reflectance: ArcTexture,
}

impl Mirror {
    /// Create a new `Mirror` BSDF.
    ///
    /// * `reflectance` - Specular tint texture.
    pub fn new(reflectance: ArcTexture) -> Self {
        Self { reflectance }
    }

    /// Create a `Mirror` BSDF from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(params.require_texture("reflectance")?))
    }
}

impl Bsdf for Mirror {
    fn lobes(&self) -> LobeType {
        LobeType::DELTA | LobeType::REFLECTION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        _u_lobe: Float,
        _u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        if !ctx.accept.contains(LobeType::DELTA) || si.wo.z == 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let sample = BsdfSample {
            wi: Vector3f::new(-si.wo.x, -si.wo.y, si.wo.z),
            pdf: 1.0,
            eta: 1.0,
            lobe: LobeType::DELTA | LobeType::REFLECTION,
        };
        (sample, self.reflectance.evaluate(&si.uv))
    }

    fn eval(&self, _ctx: &BsdfContext, _si: &SurfaceInteraction, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    fn pdf(&self, _ctx: &BsdfContext, _si: &SurfaceInteraction, _wi: &Vector3f) -> Float {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_interaction;
    use rad_core::texture::ConstantTexture;
    use std::sync::Arc;

    #[test]
    fn reflects_around_the_normal() {
        let bsdf = Mirror::new(Arc::new(ConstantTexture::new(Spectrum::splat(0.9))));
        let si = test_interaction(Vector3f::new(0.6, 0.0, 0.8));
        let (sample, weight) = bsdf.sample(
            &BsdfContext::default(),
            &si,
            0.5,
            &Point2f::new(0.5, 0.5),
        );
        assert!(sample.is_valid());
        assert!((sample.wi - Vector3f::new(-0.6, 0.0, 0.8)).length() < 1e-5);
        assert!((weight.r - 0.9).abs() < 1e-6);
        assert!(bsdf.is_delta_only());
        assert_eq!(bsdf.pdf(&BsdfContext::default(), &si, &sample.wi), 0.0);
    }
}
