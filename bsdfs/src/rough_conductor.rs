//! Rough conductor reflection.

use crate::fresnel::fresnel_schlick;
use crate::microfacet_from_params;
use rad_core::bsdf::{Bsdf, BsdfContext, BsdfSample, LobeType};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{abs_cos_theta, reflect, same_hemisphere, Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::microfacet::ArcMicrofacetDistribution;
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// Microfacet reflection from a metal, with Schlick Fresnel driven by the
/// normal-incidence reflectance color.
pub struct RoughConductor {
    reflectance: ArcTexture,
    distribution: ArcMicrofacetDistribution,
}

impl RoughConductor {
    /// Create a new `RoughConductor` BSDF.
    ///
    /// * `reflectance`  - Normal-incidence reflectance texture.
    /// * `distribution` - Microfacet distribution.
    pub fn new(reflectance: ArcTexture, distribution: ArcMicrofacetDistribution) -> Self {
        Self {
            reflectance,
            distribution,
        }
    }

    /// Create a `RoughConductor` BSDF from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.require_texture("reflectance")?,
            microfacet_from_params(params)?,
        ))
    }
}

impl Bsdf for RoughConductor {
    fn lobes(&self) -> LobeType {
        LobeType::GLOSSY | LobeType::REFLECTION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        _u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        if !ctx.accept.contains(LobeType::GLOSSY) || si.wo.z == 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let wh = self.distribution.sample_wh(&si.wo, u_dir);
        if si.wo.dot(&wh) <= 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let wi = reflect(&si.wo, &wh);
        if !same_hemisphere(&si.wo, &wi) {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let pdf = self.pdf(ctx, si, &wi);
        if pdf <= 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let f = self.eval(ctx, si, &wi);
        let sample = BsdfSample {
            wi,
            pdf,
            eta: 1.0,
            lobe: LobeType::GLOSSY | LobeType::REFLECTION,
        };
        (sample, f * abs_cos_theta(&wi) / pdf)
    }

    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        if !ctx.accept.contains(LobeType::GLOSSY) || !same_hemisphere(&si.wo, wi) {
            return Spectrum::ZERO;
        }
        let cos_o = abs_cos_theta(&si.wo);
        let cos_i = abs_cos_theta(wi);
        if cos_o == 0.0 || cos_i == 0.0 {
            return Spectrum::ZERO;
        }
        let wh = si.wo + *wi;
        if wh == Vector3f::ZERO {
            return Spectrum::ZERO;
        }
        let wh = wh.normalize();
        let d = self.distribution.d(&wh);
        let g = self.distribution.g(&si.wo, wi);
        let fr = fresnel_schlick(wi.dot(&wh), self.reflectance.evaluate(&si.uv));
        fr * (d * g / (4.0 * cos_o * cos_i))
    }

    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float {
        if !ctx.accept.contains(LobeType::GLOSSY) || !same_hemisphere(&si.wo, wi) {
            return 0.0;
        }
        let wh = (si.wo + *wi).normalize();
        let dot = si.wo.dot(&wh);
        if dot <= 0.0 {
            return 0.0;
        }
        self.distribution.pdf(&wh) / (4.0 * dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{assert_sample_consistency, test_interaction};
    use rad_core::microfacet::{Beckmann, TrowbridgeReitz};
    use rad_core::texture::ConstantTexture;
    use std::sync::Arc;

    #[test]
    fn sample_agrees_with_eval_and_pdf() {
        for dist in [
            Arc::new(TrowbridgeReitz::new(0.3)) as ArcMicrofacetDistribution,
            Arc::new(Beckmann::new(0.3)) as ArcMicrofacetDistribution,
        ] {
            let bsdf = RoughConductor::new(
                Arc::new(ConstantTexture::new(Spectrum::new(0.9, 0.7, 0.4))),
                dist,
            );
            let si = test_interaction(Vector3f::new(-0.3, 0.2, 0.93).normalize());
            assert_sample_consistency(&bsdf, &si, 500, 41);
        }
    }

    #[test]
    fn grazing_viewer_yields_no_sample() {
        let bsdf = RoughConductor::new(
            Arc::new(ConstantTexture::new(Spectrum::splat(0.9))),
            Arc::new(TrowbridgeReitz::new(0.2)),
        );
        let si = test_interaction(Vector3f::new(1.0, 0.0, 0.0));
        let (sample, _) = bsdf.sample(
            &BsdfContext::default(),
            &si,
            0.5,
            &Point2f::new(0.3, 0.7),
        );
        assert!(!sample.is_valid());
    }
}
