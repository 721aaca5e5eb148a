//! Opacity masks.

use rad_core::bsdf::{ArcBsdf, Bsdf, BsdfContext, BsdfSample, LobeType};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// Blends a nested BSDF with a pass-through Dirac lobe by a textured opacity.
/// Where the opacity falls below one, rays continue straight through the
/// surface carrying the complementary weight; shadow rays treat the same lobe
/// as partial transmission.
pub struct Mask {
    inner: ArcBsdf,
    opacity: ArcTexture,
}

impl Mask {
    /// Create a new `Mask`.
    ///
    /// * `inner`   - The masked BSDF.
    /// * `opacity` - Opacity texture; one is fully opaque.
    pub fn new(inner: ArcBsdf, opacity: ArcTexture) -> Self {
        Self { inner, opacity }
    }

    /// Create a `Mask` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.require_bsdf("bsdf")?,
            params.require_texture("opacity")?,
        ))
    }

    fn opacity_at(&self, si: &SurfaceInteraction) -> Spectrum {
        let o = self.opacity.evaluate(&si.uv);
        Spectrum::new(clamp(o.r, 0.0, 1.0), clamp(o.g, 0.0, 1.0), clamp(o.b, 0.0, 1.0))
    }
}

impl Bsdf for Mask {
    fn lobes(&self) -> LobeType {
        self.inner.lobes() | LobeType::NULL | LobeType::DELTA | LobeType::TRANSMISSION
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        let opacity = self.opacity_at(si);
        // Select the surface lobe with probability equal to the opacity's
        // luminance, then reuse the stretched variate for the inner BSDF.
        let q = clamp(opacity.y(), 0.0, 1.0);

        if u_lobe < q {
            let u_inner = u_lobe / q;
            let (mut sample, weight) = self.inner.sample(ctx, si, u_inner, u_dir);
            if !sample.is_valid() {
                return (BsdfSample::INVALID, Spectrum::ZERO);
            }
            sample.pdf *= q;
            (sample, weight * opacity / q)
        } else {
            if !ctx.accept.contains(LobeType::NULL) || q >= 1.0 {
                return (BsdfSample::INVALID, Spectrum::ZERO);
            }
            let sample = BsdfSample {
                wi: -si.wo,
                pdf: 1.0 - q,
                eta: 1.0,
                lobe: LobeType::NULL | LobeType::DELTA | LobeType::TRANSMISSION,
            };
            let weight = (Spectrum::ONE - opacity) / (1.0 - q);
            (sample, weight)
        }
    }

    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        self.inner.eval(ctx, si, wi) * self.opacity_at(si)
    }

    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float {
        let q = clamp(self.opacity_at(si).y(), 0.0, 1.0);
        q * self.inner.pdf(ctx, si, wi)
    }
}
