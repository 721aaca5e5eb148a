//! Ambient-occlusion estimator.

use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::Ray;
use rad_core::paramset::ParamSet;
use rad_core::renderer::Renderer;
use rad_core::sampler::Sampler;
use rad_core::sampling::cosine_sample_hemisphere;
use rad_core::scene::Scene;
use rad_core::spectrum::Spectrum;

/// Fraction of the cosine-weighted hemisphere that is unoccluded within a
/// fixed radius. Grayscale; lights are ignored.
pub struct AoRenderer {
    samples: usize,
    radius: Float,
}

impl AoRenderer {
    /// Create a new `AoRenderer`.
    ///
    /// * `samples` - Occlusion rays per camera ray.
    /// * `radius`  - Maximum occlusion distance (infinite if non-positive).
    pub fn new(samples: usize, radius: Float) -> Self {
        Self {
            samples: samples.max(1),
            radius: if radius > 0.0 { radius } else { INFINITY },
        }
    }

    /// Create an `AoRenderer` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.find_one_int("samples", 4) as usize,
            params.find_one_float("radius", 0.0),
        ))
    }
}

impl Renderer for AoRenderer {
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler) -> Spectrum {
        let Some(si) = scene.intersect(ray) else {
            return Spectrum::ZERO;
        };
        let mut visible = 0usize;
        for _ in 0..self.samples {
            let w_local = cosine_sample_hemisphere(&sampler.next_2d());
            let w = si.frame.to_world(&w_local);
            let probe = si.spawn_ray(&w).clipped(self.radius);
            if !scene.intersect_p(&probe) {
                visible += 1;
            }
        }
        Spectrum::splat(visible as Float / self.samples as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::geometry::{Point3f, Vector3f};

    #[test]
    fn misses_are_black() {
        use rad_accel::ShapeList;
        use rad_core::camera::PerspectiveCamera;
        use rad_core::scene::Scene;
        use std::sync::Arc;

        let scene = Scene::new(
            Arc::new(ShapeList::new(Vec::new())),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Arc::new(PerspectiveCamera::new(
                Point3f::new(0.0, 0.0, -3.0),
                Point3f::default(),
                Vector3f::new(0.0, 1.0, 0.0),
                45.0,
                1.0,
            )),
            &[],
            &[],
            &[],
            None,
        );
        let ao = AoRenderer::new(4, 0.0);
        let mut sampler = rad_samplers::create_sampler(
            "independent",
            &rad_core::paramset::ParamSet::new(),
        )
        .unwrap();
        let ray = Ray::new(
            Point3f::default(),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        assert!(ao.li(&ray, &scene, &mut sampler).is_black());
    }
}
