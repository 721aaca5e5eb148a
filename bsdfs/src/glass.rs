//! Smooth dielectric reflection and transmission.

use crate::fresnel::fresnel_dielectric;
use rad_core::bsdf::{Bsdf, BsdfContext, BsdfSample, LobeType, TransportMode};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{cos_theta, refract, Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// A smooth dielectric interface. Picks between the Dirac reflection and
/// transmission lobes in proportion to the Fresnel reflectance, which keeps
/// the sampled weight equal to the plain tint.
pub struct Glass {
    reflectance: ArcTexture,
    transmittance: ArcTexture,
    eta: Float,
}

impl Glass {
    /// Create a new `Glass` BSDF.
    ///
    /// * `reflectance`   - Reflection tint texture.
    /// * `transmittance` - Transmission tint texture.
    /// * `eta`           - Interior index of refraction over exterior.
    pub fn new(reflectance: ArcTexture, transmittance: ArcTexture, eta: Float) -> Self {
        Self {
            reflectance,
            transmittance,
            eta,
        }
    }

    /// Create a `Glass` BSDF from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.require_texture("reflectance")?,
            params.require_texture("transmittance")?,
            params.find_one_float("eta", 1.5),
        ))
    }
}

impl Bsdf for Glass {
    fn lobes(&self) -> LobeType {
        LobeType::DELTA | LobeType::REFLECTION | LobeType::TRANSMISSION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        u_lobe: Float,
        _u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        if !ctx.accept.contains(LobeType::DELTA) || si.wo.z == 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let entering = cos_theta(&si.wo) > 0.0;
        let f = fresnel_dielectric(cos_theta(&si.wo), 1.0, self.eta);

        let may_reflect = ctx.accept.contains(LobeType::REFLECTION);
        let may_transmit = ctx.accept.contains(LobeType::TRANSMISSION);
        // Lobe-selection probability; renormalized when the caller excludes
        // one side of the interface.
        let p_reflect = match (may_reflect, may_transmit) {
            (true, true) => f,
            (true, false) => 1.0,
            (false, true) => 0.0,
            (false, false) => return (BsdfSample::INVALID, Spectrum::ZERO),
        };

        if u_lobe < p_reflect {
            let sample = BsdfSample {
                wi: Vector3f::new(-si.wo.x, -si.wo.y, si.wo.z),
                pdf: p_reflect,
                eta: 1.0,
                lobe: LobeType::DELTA | LobeType::REFLECTION,
            };
            let weight = self.reflectance.evaluate(&si.uv) * (f / p_reflect);
            (sample, weight)
        } else {
            let p_transmit = 1.0 - p_reflect;
            if p_transmit <= 0.0 {
                return (BsdfSample::INVALID, Spectrum::ZERO);
            }
            // Relative IOR incident-over-transmitted for the refraction.
            let eta_rel = if entering { 1.0 / self.eta } else { self.eta };
            let n = if entering {
                Vector3f::new(0.0, 0.0, 1.0)
            } else {
                Vector3f::new(0.0, 0.0, -1.0)
            };
            let wi = match refract(&si.wo, &n, eta_rel) {
                Some(wi) => wi,
                None => return (BsdfSample::INVALID, Spectrum::ZERO),
            };
            let mut weight = self.transmittance.evaluate(&si.uv) * ((1.0 - f) / p_transmit);
            // Radiance is compressed by the squared relative IOR on refraction;
            // importance transport carries no such factor.
            if ctx.mode == TransportMode::Radiance {
                weight = weight * (eta_rel * eta_rel);
            }
            let sample = BsdfSample {
                wi,
                pdf: p_transmit,
                eta: 1.0 / eta_rel,
                lobe: LobeType::DELTA | LobeType::TRANSMISSION,
            };
            (sample, weight)
        }
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
    use rad_core::rng::Rng;
    use rad_core::texture::ConstantTexture;
    use std::sync::Arc;

    fn glass() -> Glass {
        Glass::new(
            Arc::new(ConstantTexture::new(Spectrum::ONE)),
            Arc::new(ConstantTexture::new(Spectrum::ONE)),
            1.5,
        )
    }

    #[test]
    fn refraction_obeys_snells_law() {
        let bsdf = glass();
        let ctx = BsdfContext::default().with_accept(LobeType::DELTA | LobeType::TRANSMISSION);
        let wo = Vector3f::new(0.5, 0.0, 0.8660254).normalize();
        let si = test_interaction(wo);
        let (sample, _) = bsdf.sample(&ctx, &si, 0.9, &Point2f::new(0.5, 0.5));
        assert!(sample.is_valid());
        assert!(sample.wi.z < 0.0);
        // sin θt = sin θi / 1.5.
        let sin_i = (wo.x * wo.x + wo.y * wo.y).sqrt();
        let sin_t = (sample.wi.x * sample.wi.x + sample.wi.y * sample.wi.y).sqrt();
        assert!((sin_t - sin_i / 1.5).abs() < 1e-4);
        assert!((sample.eta - 1.5).abs() < 1e-5);
    }

    #[test]
    fn total_internal_reflection_only_reflects() {
        let bsdf = glass();
        let ctx = BsdfContext::default();
        // Leaving the dense side beyond the critical angle (~41.8 degrees).
        let wo = Vector3f::new(0.8, 0.0, -0.6).normalize();
        let si = test_interaction(wo);
        let mut rng = Rng::new(3);
        for _ in 0..100 {
            let (sample, _) = bsdf.sample(&ctx, &si, rng.uniform_float(), &Point2f::new(0.5, 0.5));
            assert!(sample.is_valid());
            assert!(sample.lobe.contains(LobeType::REFLECTION));
        }
    }

    #[test]
    fn unfiltered_sampling_keeps_unit_weight() {
        let bsdf = glass();
        let ctx = BsdfContext::default();
        let si = test_interaction(Vector3f::new(0.3, 0.1, 0.95).normalize());
        let mut rng = Rng::new(8);
        for _ in 0..200 {
            let (sample, weight) = bsdf.sample(&ctx, &si, rng.uniform_float(), &Point2f::new(0.5, 0.5));
            assert!(sample.is_valid());
            if sample.lobe.contains(LobeType::REFLECTION) {
                // F / p cancels when the lobe choice is Fresnel-proportional.
                assert!((weight.r - 1.0).abs() < 1e-4);
            }
        }
    }
}
