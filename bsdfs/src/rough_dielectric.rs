//! Rough dielectric reflection and transmission.

use crate::fresnel::fresnel_dielectric;
use crate::microfacet_from_params;
use rad_core::bsdf::{Bsdf, BsdfContext, BsdfSample, LobeType, TransportMode};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{abs_cos_theta, cos_theta, reflect, refract, same_hemisphere, Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::microfacet::ArcMicrofacetDistribution;
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// Microfacet reflection and refraction at a rough dielectric interface
/// (Walter et al. 2007). The refraction lobe uses the half-vector Jacobian
/// `η² |ωi·ωh| / (ωo·ωh + η ωi·ωh)²` in both the value and the density, so
/// sampled weights remain consistent with `eval`/`pdf`.
pub struct RoughDielectric {
    reflectance: ArcTexture,
    transmittance: ArcTexture,
    distribution: ArcMicrofacetDistribution,
    eta: Float,
}

impl RoughDielectric {
    /// Create a new `RoughDielectric` BSDF.
    ///
    /// * `reflectance`   - Reflection tint texture.
    /// * `transmittance` - Transmission tint texture.
    /// * `distribution`  - Microfacet distribution.
    /// * `eta`           - Interior index of refraction over exterior.
    pub fn new(
        reflectance: ArcTexture,
        transmittance: ArcTexture,
        distribution: ArcMicrofacetDistribution,
        eta: Float,
    ) -> Self {
        Self {
            reflectance,
            transmittance,
            distribution,
            eta,
        }
    }

    /// Create a `RoughDielectric` BSDF from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.require_texture("reflectance")?,
            params.require_texture("transmittance")?,
            microfacet_from_params(params)?,
            params.find_one_float("eta", 1.5),
        ))
    }

    /// Lobe-selection probability for reflection under the accept mask.
    fn reflect_probability(&self, ctx: &BsdfContext, fresnel: Float) -> Option<Float> {
        let may_reflect = ctx.accept.contains(LobeType::REFLECTION);
        let may_transmit = ctx.accept.contains(LobeType::TRANSMISSION);
        match (may_reflect, may_transmit) {
            (true, true) => Some(fresnel),
            (true, false) => Some(1.0),
            (false, true) => Some(0.0),
            (false, false) => None,
        }
    }

    /// Relative IOR transmitted-over-incident for a viewer direction.
    fn eta_for(&self, wo: &Vector3f) -> Float {
        if cos_theta(wo) > 0.0 {
            self.eta
        } else {
            1.0 / self.eta
        }
    }
}

impl Bsdf for RoughDielectric {
    fn lobes(&self) -> LobeType {
        LobeType::GLOSSY | LobeType::REFLECTION | LobeType::TRANSMISSION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        if !ctx.accept.contains(LobeType::GLOSSY) || si.wo.z == 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let wh = self.distribution.sample_wh(&si.wo, u_dir);
        if si.wo.dot(&wh) <= 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let fresnel = fresnel_dielectric(si.wo.dot(&wh), 1.0, self.eta);
        let p_reflect = match self.reflect_probability(ctx, fresnel) {
            Some(p) => p,
            None => return (BsdfSample::INVALID, Spectrum::ZERO),
        };

        let (wi, lobe, eta) = if u_lobe < p_reflect {
            let wi = reflect(&si.wo, &wh);
            if !same_hemisphere(&si.wo, &wi) {
                return (BsdfSample::INVALID, Spectrum::ZERO);
            }
            (wi, LobeType::GLOSSY | LobeType::REFLECTION, 1.0)
        } else {
            let eta = self.eta_for(&si.wo);
            let wi = match refract(&si.wo, &wh, 1.0 / eta) {
                Some(wi) => wi,
                None => return (BsdfSample::INVALID, Spectrum::ZERO),
            };
            if same_hemisphere(&si.wo, &wi) {
                return (BsdfSample::INVALID, Spectrum::ZERO);
            }
            (wi, LobeType::GLOSSY | LobeType::TRANSMISSION, eta)
        };

        let pdf = self.pdf(ctx, si, &wi);
        if pdf <= 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let f = self.eval(ctx, si, &wi);
        let sample = BsdfSample { wi, pdf, eta, lobe };
        (sample, f * abs_cos_theta(&wi) / pdf)
    }

    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        if !ctx.accept.contains(LobeType::GLOSSY) {
            return Spectrum::ZERO;
        }
        let cos_o = cos_theta(&si.wo);
        let cos_i = cos_theta(wi);
        if cos_o == 0.0 || cos_i == 0.0 {
            return Spectrum::ZERO;
        }

        if cos_o * cos_i > 0.0 {
            // Reflection.
            if !ctx.accept.contains(LobeType::REFLECTION) {
                return Spectrum::ZERO;
            }
            let mut wh = (si.wo + *wi).normalize();
            if wh.z < 0.0 {
                wh = -wh;
            }
            let d = self.distribution.d(&wh);
            let g = self.distribution.g(&si.wo, wi);
            let fr = fresnel_dielectric(si.wo.dot(&wh), 1.0, self.eta);
            self.reflectance.evaluate(&si.uv) * (d * g * fr / (4.0 * cos_o * cos_i)).abs()
        } else {
            // Transmission.
            if !ctx.accept.contains(LobeType::TRANSMISSION) {
                return Spectrum::ZERO;
            }
            let eta = self.eta_for(&si.wo);
            let mut wh = (si.wo + *wi * eta).normalize();
            if wh.z < 0.0 {
                wh = -wh;
            }
            let dot_o = si.wo.dot(&wh);
            let dot_i = wi.dot(&wh);
            if dot_o * dot_i > 0.0 {
                return Spectrum::ZERO;
            }
            let fr = fresnel_dielectric(dot_o, 1.0, self.eta);
            let d = self.distribution.d(&wh);
            let g = self.distribution.g(&si.wo, wi);
            let denom = dot_o + eta * dot_i;
            if denom == 0.0 {
                return Spectrum::ZERO;
            }
            let factor = if ctx.mode == TransportMode::Radiance {
                1.0 / eta
            } else {
                1.0
            };
            let value = d * g * (1.0 - fr) * eta * eta * dot_i.abs() * dot_o.abs() * factor
                * factor
                / (cos_o * cos_i * denom * denom);
            self.transmittance.evaluate(&si.uv) * value.abs()
        }
    }

    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float {
        if !ctx.accept.contains(LobeType::GLOSSY) {
            return 0.0;
        }
        let cos_o = cos_theta(&si.wo);
        let cos_i = cos_theta(wi);
        if cos_o == 0.0 || cos_i == 0.0 {
            return 0.0;
        }

        if cos_o * cos_i > 0.0 {
            if !ctx.accept.contains(LobeType::REFLECTION) {
                return 0.0;
            }
            let mut wh = (si.wo + *wi).normalize();
            if wh.z < 0.0 {
                wh = -wh;
            }
            let dot = si.wo.dot(&wh);
            if dot == 0.0 {
                return 0.0;
            }
            let fresnel = fresnel_dielectric(dot, 1.0, self.eta);
            let p_reflect = match self.reflect_probability(ctx, fresnel) {
                Some(p) => p,
                None => return 0.0,
            };
            p_reflect * self.distribution.pdf(&wh) / (4.0 * dot.abs())
        } else {
            if !ctx.accept.contains(LobeType::TRANSMISSION) {
                return 0.0;
            }
            let eta = self.eta_for(&si.wo);
            let mut wh = (si.wo + *wi * eta).normalize();
            if wh.z < 0.0 {
                wh = -wh;
            }
            let dot_o = si.wo.dot(&wh);
            let dot_i = wi.dot(&wh);
            if dot_o * dot_i > 0.0 {
                return 0.0;
            }
            let fresnel = fresnel_dielectric(dot_o, 1.0, self.eta);
            let p_reflect = match self.reflect_probability(ctx, fresnel) {
                Some(p) => p,
                None => return 0.0,
            };
            let denom = dot_o + eta * dot_i;
            if denom == 0.0 {
                return 0.0;
            }
            let dwh_dwi = (eta * eta * dot_i / (denom * denom)).abs();
            (1.0 - p_reflect) * self.distribution.pdf(&wh) * dwh_dwi
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{assert_sample_consistency, test_interaction};
    use rad_core::rng::Rng;
    use rad_core::texture::ConstantTexture;
    use std::sync::Arc;

    fn rough_glass(alpha: Float) -> RoughDielectric {
        RoughDielectric::new(
            Arc::new(ConstantTexture::new(Spectrum::ONE)),
            Arc::new(ConstantTexture::new(Spectrum::ONE)),
            Arc::new(rad_core::microfacet::TrowbridgeReitz::new(alpha)),
            1.5,
        )
    }

    #[test]
    fn sample_agrees_with_eval_and_pdf() {
        let bsdf = rough_glass(0.3);
        let si = test_interaction(Vector3f::new(0.25, -0.1, 0.96).normalize());
        assert_sample_consistency(&bsdf, &si, 500, 55);
        // And from below the interface.
        let si = test_interaction(Vector3f::new(0.2, 0.2, -0.96).normalize());
        assert_sample_consistency(&bsdf, &si, 500, 56);
    }

    #[test]
    fn produces_both_lobes() {
        let bsdf = rough_glass(0.2);
        let ctx = BsdfContext::default();
        let si = test_interaction(Vector3f::new(0.1, 0.0, 0.99).normalize());
        let mut rng = Rng::new(61);
        let (mut reflections, mut transmissions) = (0, 0);
        for _ in 0..400 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let (sample, _) = bsdf.sample(&ctx, &si, rng.uniform_float(), &u);
            if !sample.is_valid() {
                continue;
            }
            if sample.lobe.contains(LobeType::TRANSMISSION) {
                transmissions += 1;
                assert!(sample.wi.z < 0.0);
                assert!((sample.eta - 1.5).abs() < 1e-5);
            } else {
                reflections += 1;
                assert!(sample.wi.z > 0.0);
            }
        }
        assert!(reflections > 0 && transmissions > 0);
    }
}
