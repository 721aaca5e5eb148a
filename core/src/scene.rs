//! Scene aggregation.

use crate::bsdf::ArcBsdf;
use crate::camera::ArcCamera;
use crate::common::*;
use crate::geometry::{Point3f, Ray, Vector3f};
use crate::interaction::{offset_ray_origin, SurfaceInteraction};
use crate::light::{ArcLight, DirectionSample, ReferencePoint};
use crate::medium::ArcMedium;
use crate::sampler::Sampler;
use crate::shape::{ArcAccel, ArcShape};
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// Shadow rays stop just short of the sampled light point to avoid
/// re-intersecting the emitter itself.
const OCCLUSION_SHRINK: Float = 1.0 - 1e-3;

/// The scene: aggregate geometry, lights, media and the camera. Exclusively
/// owns all shapes (through the accelerator's shape list), lights and media
/// for the duration of one render; shape-to-light associations are plain
/// index lookups, never shared ownership.
pub struct Scene {
    /// The acceleration structure over all shapes.
    pub accel: ArcAccel,

    /// All shapes, indexed by `HitRecord::shape_index`.
    pub shapes: Vec<ArcShape>,

    /// All lights.
    pub lights: Vec<ArcLight>,

    /// All participating media.
    pub media: Vec<ArcMedium>,

    /// The camera.
    pub camera: ArcCamera,

    /// Medium the camera rays start in, if any.
    pub camera_medium: Option<usize>,

    /// Light index owning each shape, if the shape is an emitter.
    light_of_shape: Vec<Option<usize>>,

    /// Material of each shape; `None` for pure emitters.
    bsdf_of_shape: Vec<Option<ArcBsdf>>,

    /// Interior medium index of each shape, if the shape bounds one.
    medium_of_shape: Vec<Option<usize>>,

    /// Uniform light-selection probability, `1 / lights.len()`.
    light_select_pdf: Float,
}

impl Scene {
    /// Create a new `Scene`.
    ///
    /// * `accel`         - Acceleration structure over `shapes`.
    /// * `shapes`        - All shapes, in accelerator index order.
    /// * `lights`        - All lights.
    /// * `media`         - All participating media.
    /// * `camera`        - The camera.
    /// * `shape_lights`  - `(shape index, light index)` pairs for emitters.
    /// * `shape_bsdfs`   - `(shape index, material)` pairs.
    /// * `shape_media`   - `(shape index, medium index)` pairs for shapes
    ///   bounding an interior medium.
    /// * `camera_medium` - Medium index the camera is embedded in, if any.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accel: ArcAccel,
        shapes: Vec<ArcShape>,
        lights: Vec<ArcLight>,
        media: Vec<ArcMedium>,
        camera: ArcCamera,
        shape_lights: &[(usize, usize)],
        shape_bsdfs: &[(usize, ArcBsdf)],
        shape_media: &[(usize, usize)],
        camera_medium: Option<usize>,
    ) -> Self {
        let mut light_of_shape = vec![None; shapes.len()];
        for &(shape_index, light_index) in shape_lights {
            light_of_shape[shape_index] = Some(light_index);
        }
        let mut bsdf_of_shape: Vec<Option<ArcBsdf>> = vec![None; shapes.len()];
        for (shape_index, bsdf) in shape_bsdfs {
            bsdf_of_shape[*shape_index] = Some(Arc::clone(bsdf));
        }
        let mut medium_of_shape = vec![None; shapes.len()];
        for &(shape_index, medium_index) in shape_media {
            medium_of_shape[shape_index] = Some(medium_index);
        }
        let light_select_pdf = if lights.is_empty() {
            0.0
        } else {
            1.0 / lights.len() as Float
        };
        Self {
            accel,
            shapes,
            lights,
            media,
            camera,
            camera_medium,
            light_of_shape,
            bsdf_of_shape,
            medium_of_shape,
            light_select_pdf,
        }
    }

    /// Closest-hit query, lazily reconstructing the full surface interaction
    /// from the minimal hit record.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        self.accel
            .intersect(ray)
            .map(|hit| self.shapes[hit.shape_index].fill_interaction(&hit, ray))
    }

    /// Occlusion-only query.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.accel.intersect_p(ray)
    }

    /// Returns true if the segment from a reference point to a target point
    /// is blocked. The shadow-ray origin is offset along the surface normal
    /// by an epsilon scaled with the hit position's magnitude.
    ///
    /// * `r` - The reference point.
    /// * `p` - The target point.
    pub fn is_occluded(&self, r: &ReferencePoint, p: &Point3f) -> bool {
        let d = *p - r.p;
        let dist = d.length();
        if dist <= 0.0 {
            return false;
        }
        let dir = d / dist;
        let o = match &r.n {
            Some(n) => offset_ray_origin(&r.p, n, &dir),
            None => r.p,
        };
        let ray = Ray::new(o, dir, 0.0, dist * OCCLUSION_SHRINK);
        self.accel.intersect_p(&ray)
    }

    /// Occlusion test along a sampled light direction.
    ///
    /// * `r`  - The reference point.
    /// * `ds` - The sampled direction.
    pub fn is_occluded_dir(&self, r: &ReferencePoint, ds: &DirectionSample) -> bool {
        let o = match &r.n {
            Some(n) => offset_ray_origin(&r.p, n, &ds.wi),
            None => r.p,
        };
        let t_max = if ds.distance.is_finite() {
            ds.distance * OCCLUSION_SHRINK
        } else {
            INFINITY
        };
        let ray = Ray::new(o, ds.wi, 0.0, t_max);
        self.accel.intersect_p(&ray)
    }

    /// Select a light uniformly. Returns `None` when there are no lights; a
    /// sole light is returned with probability one without consuming the
    /// variate's entropy.
    ///
    /// * `u` - Uniform random sample.
    pub fn sample_light(&self, u: Float) -> Option<(usize, Float)> {
        match self.lights.len() {
            0 => None,
            1 => Some((0, 1.0)),
            n => {
                let index = ((u * n as Float) as usize).min(n - 1);
                Some((index, self.light_select_pdf))
            }
        }
    }

    /// Compose light selection with the chosen light's direction sampling,
    /// folding the selection probability into the returned density so the
    /// result is directly usable in one-sample MIS.
    ///
    /// * `r`       - The reference point.
    /// * `sampler` - Sample source.
    pub fn sample_light_direction(
        &self,
        r: &ReferencePoint,
        sampler: &mut dyn Sampler,
    ) -> Option<(usize, DirectionSample, Spectrum)> {
        let (index, select_pdf) = self.sample_light(sampler.next_1d())?;
        let (mut ds, radiance) = self.lights[index].sample_direction(r, &sampler.next_2d());
        if ds.pdf <= 0.0 && !ds.delta {
            return None;
        }
        ds.pdf *= select_pdf;
        Some((index, ds, radiance))
    }

    /// Density of `sample_light_direction` for a direction toward a specific
    /// light, selection probability folded in. Zero for delta lights.
    ///
    /// * `light_index` - The light.
    /// * `r`           - The reference point.
    /// * `ds`          - The direction being queried.
    pub fn pdf_light_direction(
        &self,
        light_index: usize,
        r: &ReferencePoint,
        ds: &DirectionSample,
    ) -> Float {
        self.lights[light_index].pdf_direction(r, ds) * self.light_select_pdf
    }

    /// Light owning a shape, if the shape is an emitter.
    ///
    /// * `shape_index` - The shape.
    pub fn light_for_shape(&self, shape_index: usize) -> Option<&ArcLight> {
        self.light_of_shape
            .get(shape_index)
            .and_then(|i| i.map(|i| &self.lights[i]))
    }

    /// Index of the light owning a shape.
    ///
    /// * `shape_index` - The shape.
    pub fn light_index_for_shape(&self, shape_index: usize) -> Option<usize> {
        self.light_of_shape.get(shape_index).copied().flatten()
    }

    /// Material of a shape, if one was assigned.
    ///
    /// * `shape_index` - The shape.
    pub fn bsdf_for_shape(&self, shape_index: usize) -> Option<&ArcBsdf> {
        self.bsdf_of_shape.get(shape_index).and_then(|b| b.as_ref())
    }

    /// Emission toward the viewer at a surface hit, zero for non-emitters.
    ///
    /// * `si` - The surface interaction.
    pub fn emission(&self, si: &SurfaceInteraction) -> Spectrum {
        match self.light_for_shape(si.shape_index) {
            Some(light) => {
                let w = si.wo_world();
                light.eval(si, &w)
            }
            None => Spectrum::ZERO,
        }
    }

    /// Interior medium bounded by a shape, if one was assigned.
    ///
    /// * `shape_index` - The shape.
    pub fn interior_medium_for_shape(&self, shape_index: usize) -> Option<&ArcMedium> {
        self.medium_of_shape
            .get(shape_index)
            .and_then(|i| i.map(|i| &self.media[i]))
    }

    /// Medium along a camera ray, if the scene declares one.
    pub fn camera_medium(&self) -> Option<&ArcMedium> {
        self.camera_medium.map(|i| &self.media[i])
    }

    /// World-space direction helper for reference-point facing tests.
    ///
    /// * `r` - The reference point.
    /// * `p` - A point the direction aims at.
    pub fn direction_to(r: &ReferencePoint, p: &Point3f) -> Vector3f {
        (*p - r.p).normalize()
    }

    /// Uniform light-selection probability.
    pub fn light_select_pdf(&self) -> Float {
        self.light_select_pdf
    }
}

/// Atomic reference counted `Scene`.
pub type ArcScene = Arc<Scene>;
