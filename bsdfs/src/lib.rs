//! BSDF implementations.

mod diffuse;
mod fresnel;
mod glass;
mod mask;
mod mirror;
mod plastic;
mod rough_conductor;
mod rough_dielectric;
mod two_sided;

pub use diffuse::*;
pub use fresnel::*;
pub use glass::*;
pub use mask::*;
pub use mirror::*;
pub use plastic::*;
pub use rough_conductor::*;
pub use rough_dielectric::*;
pub use two_sided::*;

use rad_core::bsdf::Bsdf;
use rad_core::error::Result;
use rad_core::microfacet::{ArcMicrofacetDistribution, Beckmann, TrowbridgeReitz};
use rad_core::paramset::ParamSet;
use rad_core::registry::Registry;
use std::sync::Arc;

/// Register the BSDF constructors.
///
/// * `registry` - The BSDF registry.
pub fn register_bsdfs(registry: &mut Registry<dyn Bsdf>) {
    registry.register("diffuse", |params| Ok(Arc::new(Diffuse::from_params(params)?)));
    registry.register("mirror", |params| Ok(Arc::new(Mirror::from_params(params)?)));
    registry.register("glass", |params| Ok(Arc::new(Glass::from_params(params)?)));
    registry.register("plastic", |params| Ok(Arc::new(Plastic::from_params(params)?)));
    registry.register("roughconductor", |params| {
        Ok(Arc::new(RoughConductor::from_params(params)?))
    });
    registry.register("roughdielectric", |params| {
        Ok(Arc::new(RoughDielectric::from_params(params)?))
    });
    registry.register("mask", |params| Ok(Arc::new(Mask::from_params(params)?)));
    registry.register("twosided", |params| Ok(Arc::new(TwoSided::from_params(params)?)));
}

#[cfg(test)]
pub(crate) mod tests {
    use rad_core::common::*;
    use rad_core::geometry::{Frame, Point2f, Point3f, Vector3f};
    use rad_core::interaction::SurfaceInteraction;

    /// A surface interaction at the origin of the canonical frame with the
    /// given local viewer direction.
    pub(crate) fn test_interaction(wo: Vector3f) -> SurfaceInteraction {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        SurfaceInteraction {
            p: Point3f::default(),
            n,
            frame: Frame::from_normal(n),
            uv: Point2f::new(0.5, 0.5),
            dpdu: Vector3f::new(1.0, 0.0, 0.0),
            dpdv: Vector3f::new(0.0, 1.0, 0.0),
            wo,
            shape_index: 0,
            primitive_index: 0,
            t: 1.0,
        }
    }

    /// Exhaust a sampled direction against `eval`/`pdf` for consistency.
    pub(crate) fn assert_sample_consistency(
        bsdf: &dyn rad_core::bsdf::Bsdf,
        si: &SurfaceInteraction,
        samples: usize,
        seed: u64,
    ) {
        use rad_core::bsdf::{BsdfContext, LobeType};
        use rad_core::geometry::abs_cos_theta;
        use rad_core::rng::Rng;

        let ctx = BsdfContext::default();
        let mut rng = Rng::new(seed);
        for _ in 0..samples {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let (sample, weight) = bsdf.sample(&ctx, si, rng.uniform_float(), &u);
            if !sample.is_valid() {
                continue;
            }
            assert!(weight.is_valid(), "invalid sample weight {weight:?}");
            if sample.lobe.contains(LobeType::DELTA) || sample.lobe.contains(LobeType::NULL) {
                continue;
            }
            let f = bsdf.eval(&ctx, si, &sample.wi);
            let pdf = bsdf.pdf(&ctx, si, &sample.wi);
            assert!(pdf > 0.0, "zero pdf for sampled direction");
            assert!(
                (pdf - sample.pdf).abs() < 1e-3 * pdf.max(1.0),
                "pdf mismatch: {} vs {}",
                pdf,
                sample.pdf
            );
            let expected = f * abs_cos_theta(&sample.wi) / pdf;
            assert!(
                (expected.y() - weight.y()).abs() < 1e-3 * weight.y().max(1.0),
                "weight mismatch: {} vs {}",
                expected.y(),
                weight.y()
            );
        }
    }
}

/// Build the microfacet distribution selected by the `distribution` and
/// `roughness` parameters.
///
/// * `params` - Resolved parameters.
pub(crate) fn microfacet_from_params(params: &ParamSet) -> Result<ArcMicrofacetDistribution> {
    let roughness = params.find_one_float("roughness", 0.1);
    let name = params.find_one_string("distribution", "ggx");
    match name.as_str() {
        "beckmann" => Ok(Arc::new(Beckmann::new(roughness))),
        _ => Ok(Arc::new(TrowbridgeReitz::new(roughness))),
    }
}
