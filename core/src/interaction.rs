//! Surface and medium interactions.

use crate::common::*;
use crate::geometry::{Frame, Point2f, Point3f, Ray, Vector3f};
use crate::medium::HenyeyGreenstein;
use crate::spectrum::Spectrum;

/// Base offset applied to secondary-ray origins, scaled with the magnitude of
/// the hit position so self-intersection avoidance holds at scene-scale
/// extremes.
pub const RAY_EPSILON: Float = 1e-4;

/// Offset a secondary-ray origin away from a surface along its geometric
/// normal.
///
/// * `p` - Hit position.
/// * `n` - Geometric normal.
/// * `d` - Direction the new ray will travel.
pub fn offset_ray_origin(p: &Point3f, n: &Vector3f, d: &Vector3f) -> Point3f {
    let eps = RAY_EPSILON * p.max_abs_coord().max(1.0);
    let offset = if d.dot(n) >= 0.0 { *n * eps } else { *n * -eps };
    *p + offset
}

/// A point on a surface where scattering is evaluated.
///
/// Valid only when a finite hit distance was recorded (`is_hit`). An empty
/// interaction (no hit) carries only the reversed outgoing ray direction so
/// environment emission can still be evaluated against it.
#[derive(Clone, Debug)]
pub struct SurfaceInteraction {
    /// Hit position.
    pub p: Point3f,

    /// Geometric normal.
    pub n: Vector3f,

    /// Orthonormal shading frame.
    pub frame: Frame,

    /// Texture coordinate.
    pub uv: Point2f,

    /// Parametric derivative of position w.r.t. u.
    pub dpdu: Vector3f,

    /// Parametric derivative of position w.r.t. v.
    pub dpdv: Vector3f,

    /// Direction toward the viewer in the local shading frame.
    pub wo: Vector3f,

    /// Index of the shape that owns the hit; the shape itself is owned by the
    /// scene for the query's lifetime.
    pub shape_index: usize,

    /// Index of the primitive within the shape.
    pub primitive_index: usize,

    /// Hit distance along the ray; infinite for an empty interaction.
    pub t: Float,
}

impl SurfaceInteraction {
    /// Create an empty interaction for a ray that escaped the scene. Only the
    /// reversed ray direction is meaningful.
    ///
    /// * `ray` - The escaping ray.
    pub fn escaped(ray: &Ray) -> Self {
        let frame = Frame::from_normal(-ray.d);
        Self {
            p: Point3f::default(),
            n: -ray.d,
            frame,
            uv: Point2f::default(),
            dpdu: Vector3f::ZERO,
            dpdv: Vector3f::ZERO,
            wo: Vector3f::new(0.0, 0.0, 1.0),
            shape_index: usize::MAX,
            primitive_index: usize::MAX,
            t: INFINITY,
        }
    }

    /// Returns true if a finite hit distance was recorded.
    pub fn is_hit(&self) -> bool {
        self.t.is_finite()
    }

    /// Direction toward the viewer in world space.
    pub fn wo_world(&self) -> Vector3f {
        self.frame.to_world(&self.wo)
    }

    /// Spawn a secondary ray from this interaction.
    ///
    /// * `d` - World-space direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        Ray::new(offset_ray_origin(&self.p, &self.n, d), *d, 0.0, INFINITY)
    }
}

/// A sampled scattering point inside a participating medium.
#[derive(Clone, Debug)]
pub struct MediumInteraction {
    /// Sampled position along the ray.
    pub p: Point3f,

    /// Shading frame built around the reversed ray direction.
    pub frame: Frame,

    /// Scattering coefficient σs at the point.
    pub sigma_s: Spectrum,

    /// Null-collision coefficient σn at the point.
    pub sigma_n: Spectrum,

    /// Extinction coefficient σt at the point.
    pub sigma_t: Spectrum,

    /// Majorant extinction the free-flight sampling was performed against.
    pub majorant: Spectrum,

    /// Entry distance of the medium's bounding interval along the ray.
    pub t_entry: Float,

    /// Sampled distance along the ray.
    pub t: Float,

    /// Phase function at the point.
    pub phase: HenyeyGreenstein,
}
