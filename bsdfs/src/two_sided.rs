//! Two-sided adapter.

use rad_core::bsdf::{ArcBsdf, Bsdf, BsdfContext, BsdfSample, LobeType};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{Point2f, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;

/// Makes a reflection-only BSDF respond identically from both sides of the
/// surface by mirroring the local frame's z-axis when the viewer arrives from
/// below.
pub struct TwoSided {
    inner: ArcBsdf,
}

impl TwoSided {
    /// Create a new `TwoSided` adapter.
    ///
    /// * `inner` - The wrapped one-sided BSDF.
    pub fn new(inner: ArcBsdf) -> Self {
        Self { inner }
    }

    /// Create a `TwoSided` adapter from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(params.require_bsdf("bsdf")?))
    }

    fn flipped(si: &SurfaceInteraction) -> SurfaceInteraction {
        let mut si = si.clone();
        si.wo.z = -si.wo.z;
        si
    }
}

fn flip_z(w: &Vector3f) -> Vector3f {
    Vector3f::new(w.x, w.y, -w.z)
}

impl Bsdf for TwoSided {
    fn lobes(&self) -> LobeType {
        self.inner.lobes()
    }

    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum) {
        if si.wo.z >= 0.0 {
            return self.inner.sample(ctx, si, u_lobe, u_dir);
        }
        let flipped = Self::flipped(si);
        let (mut sample, weight) = self.inner.sample(ctx, &flipped, u_lobe, u_dir);
        if sample.is_valid() {
            sample.wi = flip_z(&sample.wi);
        }
        (sample, weight)
    }

    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum {
        if si.wo.z >= 0.0 {
            self.inner.eval(ctx, si, wi)
        } else {
            self.inner.eval(ctx, &Self::flipped(si), &flip_z(wi))
        }
    }

    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float {
        if si.wo.z >= 0.0 {
            self.inner.pdf(ctx, si, wi)
        } else {
            self.inner.pdf(ctx, &Self::flipped(si), &flip_z(wi))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_interaction;
    use crate::Diffuse;
    use rad_core::texture::ConstantTexture;
    use std::sync::Arc;

    #[test]
    fn responds_symmetrically_from_both_sides() {
        let bsdf = TwoSided::new(Arc::new(Diffuse::new(Arc::new(ConstantTexture::new(
            Spectrum::splat(0.6),
        )))));
        let ctx = BsdfContext::default();

        let above = test_interaction(Vector3f::new(0.3, 0.0, 0.95).normalize());
        let below = test_interaction(Vector3f::new(0.3, 0.0, -0.95).normalize());
        let wi_above = Vector3f::new(-0.2, 0.1, 0.97).normalize();
        let wi_below = flip_z(&wi_above);

        assert_eq!(
            bsdf.eval(&ctx, &above, &wi_above),
            bsdf.eval(&ctx, &below, &wi_below)
        );
        assert_eq!(
            bsdf.pdf(&ctx, &above, &wi_above),
            bsdf.pdf(&ctx, &below, &wi_below)
        );

        // Samples from below land below.
        let (sample, weight) = bsdf.sample(&ctx, &below, 0.4, &Point2f::new(0.3, 0.6));
        assert!(sample.is_valid());
        assert!(sample.wi.z < 0.0);
        assert!((weight.r - 0.6).abs() < 1e-5);
    }
}
