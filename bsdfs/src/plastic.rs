//! Plastic: diffuse base with a glossy dielectric coat.

use crate::fresnel::fresnel_dielectric;
use crate::microfacet_from_params;
use rad_core::bsdf::{Bsdf, BsdfContext, BsdfSample, LobeType};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{abs_cos_theta, reflect, same_hemisphere, Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::microfacet::ArcMicrofacetDistribution;
use rad_core::paramset::ParamSet;
use rad_core::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// Lambertian base plus a microfacet specular coat with dielectric Fresnel.
/// The two components are sampled with equal probability and combined through
/// the summed density, so `sample` stays consistent with `eval`/`pdf`.
pub struct Plastic {
    diffuse: ArcTexture,
    specular: ArcTexture,
    distribution: ArcMicrofacetDistribution,
    eta: Float,
}

impl Plastic {
    /// Create a new `Plastic` BSDF.
    ///
    /// * `diffuse`      - Diffuse reflectance texture.
    /// * `specular`     - Specular reflectance texture.
    /// * `distribution` - Microfacet distribution of the coat.
    /// * `eta`          - Coat index of refraction.
    pub fn new(
        diffuse: ArcTexture,
        specular: ArcTexture,
        distribution: ArcMicrofacetDistribution,
        eta: Float,
    ) -> Self {
        Self {
            diffuse,
            specular,
            distribution,
            eta,
        }
    }

    /// Create a `Plastic` BSDF from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.require_texture("diffuse")?,
            params.require_texture("specular")?,
            microfacet_from_params(params)?,
            params.find_one_float("eta", 1.5),
        ))
    }

    /// Which of the (diffuse, glossy) components the context accepts.
    fn active(&self, ctx: &BsdfContext) -> (bool, bool) {
        (
            ctx.accept.contains(LobeType::DIFFUSE),
            ctx.accept.contains(LobeType::GLOSSY),
        )
    }

    fn glossy_pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        let wh = (*wo + *wi).normalize();
        let dot = wo.dot(&wh);
        if dot <= 0.0 {
            return 0.0;
        }
        self.distribution.pdf(&wh) / (4.0 * dot)
    }
}

impl Bsdf for Plastic {
    fn lobes(&self) -> LobeType {
        LobeType::DIFFUSE | LobeType::GLOSSY | LobeType::REFLECTION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        let (diffuse_ok, glossy_ok) = self.active(ctx);
        if (!diffuse_ok && !glossy_ok) || si.wo.z == 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let p_diffuse = match (diffuse_ok, glossy_ok) {
            (true, true) => 0.5,
            (true, false) => 1.0,
            _ => 0.0,
        };

        let (wi, lobe) = if u_lobe < p_diffuse {
            let mut wi = cosine_sample_hemisphere(u_dir);
            if si.wo.z < 0.0 {
                wi.z = -wi.z;
            }
            (wi, LobeType::DIFFUSE | LobeType::REFLECTION)
        } else {
            let wh = self.distribution.sample_wh(&si.wo, u_dir);
            let wi = reflect(&si.wo, &wh);
            if !same_hemisphere(&si.wo, &wi) {
                return (BsdfSample::INVALID, Spectrum::ZERO);
            }
            (wi, LobeType::GLOSSY | LobeType::REFLECTION)
        };

        let pdf = self.pdf(ctx, si, &wi);
        if pdf <= 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let f = self.eval(ctx, si, &wi);
        let sample = BsdfSample {
            wi,
            pdf,
            eta: 1.0,
            lobe,
        };
        (sample, f * abs_cos_theta(&wi) / pdf)
    }

    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        let (diffuse_ok, glossy_ok) = self.active(ctx);
        if !same_hemisphere(&si.wo, wi) {
            return Spectrum::ZERO;
        }
        let mut f = Spectrum::ZERO;
        if diffuse_ok {
            f += self.diffuse.evaluate(&si.uv) * INV_PI;
        }
        if glossy_ok {
            let wh = (si.wo + *wi).normalize();
            let cos_o = abs_cos_theta(&si.wo);
            let cos_i = abs_cos_theta(wi);
            if cos_o > 0.0 && cos_i > 0.0 {
                let d = self.distribution.d(&wh);
                let g = self.distribution.g(&si.wo, wi);
                let fr = fresnel_dielectric(wi.dot(&wh), 1.0, self.eta);
                f += self.specular.evaluate(&si.uv) * (d * g * fr / (4.0 * cos_o * cos_i));
            }
        }
        f
    }

    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float {
        let (diffuse_ok, glossy_ok) = self.active(ctx);
        if !same_hemisphere(&si.wo, wi) {
            return 0.0;
        }
        match (diffuse_ok, glossy_ok) {
            (true, true) => {
                0.5 * cosine_hemisphere_pdf(abs_cos_theta(wi)) + 0.5 * self.glossy_pdf(&si.wo, wi)
            }
            (true, false) => cosine_hemisphere_pdf(abs_cos_theta(wi)),
            (false, true) => self.glossy_pdf(&si.wo, wi),
            (false, false) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{assert_sample_consistency, test_interaction};
    use rad_core::microfacet::TrowbridgeReitz;
    use rad_core::texture::ConstantTexture;
    use std::sync::Arc;

    fn plastic() -> Plastic {
        Plastic::new(
            Arc::new(ConstantTexture::new(Spectrum::splat(0.4))),
            Arc::new(ConstantTexture::new(Spectrum::splat(0.6))),
            Arc::new(TrowbridgeReitz::new(0.2)),
            1.5,
        )
    }

    #[test]
    fn sample_agrees_with_eval_and_pdf() {
        let bsdf = plastic();
        let si = test_interaction(Vector3f::new(0.2, 0.3, 0.93).normalize());
        assert_sample_consistency(&bsdf, &si, 500, 27);
    }

    #[test]
    fn transmission_side_is_black() {
        let bsdf = plastic();
        let ctx = BsdfContext::default();
        let si = test_interaction(Vector3f::new(0.0, 0.0, 1.0));
        let below = Vector3f::new(0.1, 0.1, -0.99).normalize();
        assert!(bsdf.eval(&ctx, &si, &below).is_black());
        assert_eq!(bsdf.pdf(&ctx, &si, &below), 0.0);
    }
}
