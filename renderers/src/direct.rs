//! Direct-lighting estimator.

use crate::common::{
    estimate_direct_medium, estimate_direct_surface, sample_medium_event, MediumEvent,
};
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::Ray;
use rad_core::paramset::ParamSet;
use rad_core::renderer::Renderer;
use rad_core::sampler::Sampler;
use rad_core::scene::Scene;
use rad_core::spectrum::Spectrum;

/// Direct illumination with power-heuristic MIS between light and scattering
/// sampling. Camera rays are tracked through the camera medium; a real
/// scattering event terminates the path with single-scattered direct light.
pub struct DirectRenderer {
    samples: usize,
}

impl DirectRenderer {
    /// Create a new `DirectRenderer`.
    ///
    /// * `samples` - Direct-lighting estimates averaged per shading point.
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(1),
        }
    }

    /// Create a `DirectRenderer` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(params.find_one_int("samples", 1) as usize))
    }
}

impl Renderer for DirectRenderer {
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler) -> Spectrum {
        let si = scene.intersect(ray);
        let mut weight = Spectrum::ONE;

        if let Some(medium) = scene.camera_medium() {
            let surface_t = si.as_ref().map_or(INFINITY, |s| s.t);
            match sample_medium_event(medium.as_ref(), &ray.clipped(surface_t), sampler) {
                MediumEvent::Scattered(mi, beta) => {
                    let wo = -ray.d;
                    let mut ld = Spectrum::ZERO;
                    for _ in 0..self.samples {
                        ld += estimate_direct_medium(scene, medium.as_ref(), &mi, &wo, sampler);
                    }
                    return beta * ld / self.samples as Float;
                }
                MediumEvent::Escaped(tr) => weight = tr,
            }
        }

        let Some(si) = si else {
            return Spectrum::ZERO;
        };
        let mut l = scene.emission(&si);
        if let Some(bsdf) = scene.bsdf_for_shape(si.shape_index) {
            let mut ld = Spectrum::ZERO;
            for _ in 0..self.samples {
                ld += estimate_direct_surface(scene, &si, bsdf.as_ref(), sampler);
            }
            l += ld / self.samples as Float;
        }
        weight * l
    }
}
