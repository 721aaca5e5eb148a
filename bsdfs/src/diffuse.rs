//! Lambertian reflection.

use rad_core::bsdf::{Bsdf, BsdfContext, BsdfSample, LobeType};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{abs_cos_theta, same_hemisphere, Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// Ideal diffuse (Lambertian) reflection with a textured reflectance.
pub struct Diffuse {
    reflectance: ArcTexture,
}

impl Diffuse {
    /// Create a new `Diffuse` BSDF.
    ///
    /// * `reflectance` - Reflectance texture.
    pub fn new(reflectance: ArcTexture) -> Self {
        Self { reflectance }
    }

    /// Create a `Diffuse` BSDF from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(params.require_texture("reflectance")?))
    }
}

impl Bsdf for Diffuse {
    fn lobes(&self) -> LobeType {
        LobeType::DIFFUSE | LobeType::REFLECTION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        _u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        if !ctx.accept.contains(LobeType::DIFFUSE) || si.wo.z == 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let mut wi = cosine_sample_hemisphere(u_dir);
        if si.wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = cosine_hemisphere_pdf(abs_cos_theta(&wi));
        if pdf <= 0.0 {
            return (BsdfSample::INVALID, Spectrum::ZERO);
        }
        let sample = BsdfSample {
            wi,
            pdf,
            eta: 1.0,
            lobe: LobeType::DIFFUSE | LobeType::REFLECTION,
        };
        // f · |cos θ| / pdf collapses to the reflectance for cosine sampling.
        (sample, self.reflectance.evaluate(&si.uv))
    }

    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        if !ctx.accept.contains(LobeType::DIFFUSE) || !same_hemisphere(&si.wo, wi) {
            return Spectrum::ZERO;
        }
        self.reflectance.evaluate(&si.uv) * INV_PI
    }

    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float {
        if !ctx.accept.contains(LobeType::DIFFUSE) || !same_hemisphere(&si.wo, wi) {
            return 0.0;
        }
        cosine_hemisphere_pdf(abs_cos_theta(wi))
    }
}
