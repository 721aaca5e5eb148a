//! Shape and acceleration-structure contracts.

use crate::common::*;
use crate::geometry::{Bounds3f, Point2f, Point3f, Ray, Vector3f};
use crate::interaction::SurfaceInteraction;
use std::sync::Arc;

/// Minimal record of a closest-hit query, deliberately cheap to copy across
/// the intersection boundary. The full `SurfaceInteraction` (shading frame,
/// parametric derivatives) is reconstructed lazily by the owning shape so
/// occlusion rays never pay shading-setup cost.
#[derive(Copy, Clone, Debug)]
pub struct HitRecord {
    /// Index of the hit shape.
    pub shape_index: usize,

    /// Index of the hit primitive within the shape.
    pub primitive_index: usize,

    /// Primitive-local UV (barycentric for triangles).
    pub uv: Point2f,

    /// Ray parameter of the hit.
    pub t: Float,

    /// Geometric normal at the hit.
    pub n: Vector3f,
}

/// A single primitive intersection returned by a shape.
#[derive(Copy, Clone, Debug)]
pub struct PrimitiveHit {
    /// Ray parameter of the hit.
    pub t: Float,

    /// Primitive-local UV.
    pub uv: Point2f,

    /// Geometric normal.
    pub n: Vector3f,
}

/// A position sampled on a shape or light surface. The density is always in
/// area measure unless `delta` is set, in which case it is a Dirac measure
/// and must never divide an ordinary MIS weight.
#[derive(Copy, Clone, Debug)]
pub struct PositionSample {
    /// Sampled position.
    pub p: Point3f,

    /// Surface normal at the position.
    pub n: Vector3f,

    /// Texture coordinate at the position.
    pub uv: Point2f,

    /// Density in area measure (or a Dirac marker when `delta`).
    pub pdf: Float,

    /// True when the density is a Dirac measure.
    pub delta: bool,
}

/// Position, normal and parametric derivatives of a surface at a UV, used to
/// map texture-space light samples onto the surface.
#[derive(Copy, Clone, Debug)]
pub struct ParametricPoint {
    /// Position.
    pub p: Point3f,

    /// Normal.
    pub n: Vector3f,

    /// Derivative of position w.r.t. u.
    pub dpdu: Vector3f,

    /// Derivative of position w.r.t. v.
    pub dpdv: Vector3f,
}

/// Geometry exposed to the acceleration structure and to area lights.
pub trait Shape: Send + Sync {
    /// Number of primitives the shape contributes.
    fn primitive_count(&self) -> usize;

    /// Bounding box of one primitive.
    ///
    /// * `index` - Primitive index.
    fn primitive_bound(&self, index: usize) -> Bounds3f;

    /// Bounding box of the whole shape.
    fn bound(&self) -> Bounds3f {
        let mut b = Bounds3f::default();
        for i in 0..self.primitive_count() {
            b = b.union(&self.primitive_bound(i));
        }
        b
    }

    /// Intersect one primitive with a ray over `[ray.t_min, ray.t_max]`.
    ///
    /// * `index` - Primitive index.
    /// * `ray`   - The ray.
    fn intersect_primitive(&self, index: usize, ray: &Ray) -> Option<PrimitiveHit>;

    /// Reconstruct the full surface interaction for a hit. Called lazily, only
    /// when shading is actually needed.
    ///
    /// * `hit` - The minimal hit record.
    /// * `ray` - The ray that produced it.
    fn fill_interaction(&self, hit: &HitRecord, ray: &Ray) -> SurfaceInteraction;

    /// Total surface area.
    fn area(&self) -> Float;

    /// Sample a position uniformly by area.
    ///
    /// * `u` - Uniform random sample.
    fn sample_position(&self, u: &Point2f) -> PositionSample;

    /// Density of `sample_position` in area measure (`1 / area`).
    fn pdf_position(&self) -> Float;

    /// Evaluate the surface at a parametric UV, if the shape supports a
    /// global parameterization. Textured emission sampling requires this.
    ///
    /// * `uv` - The parametric coordinate.
    fn eval_parametric(&self, _uv: &Point2f) -> Option<ParametricPoint> {
        None
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape>;

/// Ray-query interface over the scene's aggregate geometry. Built once before
/// rendering; read-only afterwards.
pub trait Accel: Send + Sync {
    /// Occlusion-only query: returns true if anything intersects the ray's
    /// interval.
    ///
    /// * `ray` - The ray.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// Closest-hit query.
    ///
    /// * `ray` - The ray.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord>;

    /// Bounding box of everything inside.
    fn world_bound(&self) -> Bounds3f;
}

/// Atomic reference counted `Accel`.
pub type ArcAccel = Arc<dyn Accel>;

/// Convert an area-measure density at a surface point to solid-angle measure
/// as seen from `ref_p` via the Jacobian `dist² / |cos θ|`. Degenerate
/// geometry (zero or non-finite Jacobian) yields density 0 so no NaN weight
/// can propagate downstream.
///
/// * `pdf_area` - Density in area measure.
/// * `ref_p`    - Reference point.
/// * `p`        - Surface point.
/// * `n`        - Surface normal at `p`.
pub fn pdf_area_to_solid_angle(pdf_area: Float, ref_p: &Point3f, p: &Point3f, n: &Vector3f) -> Float {
    let d = *p - *ref_p;
    let dist2 = d.length_squared();
    if dist2 <= 0.0 {
        return 0.0;
    }
    let cos = n.abs_dot(&(d / dist2.sqrt()));
    if cos <= 0.0 {
        return 0.0;
    }
    let pdf = pdf_area * dist2 / cos;
    if pdf.is_finite() {
        pdf
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_jacobian_yields_zero_density() {
        let p = Point3f::new(0.0, 0.0, 0.0);
        // Coincident points.
        assert_eq!(
            pdf_area_to_solid_angle(1.0, &p, &p, &Vector3f::new(0.0, 0.0, 1.0)),
            0.0
        );
        // Edge-on surface.
        let q = Point3f::new(0.0, 0.0, 2.0);
        assert_eq!(
            pdf_area_to_solid_angle(1.0, &p, &q, &Vector3f::new(1.0, 0.0, 0.0)),
            0.0
        );
        // Facing surface: pdf = dist² / cos = 4.
        let pdf = pdf_area_to_solid_angle(1.0, &p, &q, &Vector3f::new(0.0, 0.0, -1.0));
        assert!((pdf - 4.0).abs() < 1e-5);
    }
}
