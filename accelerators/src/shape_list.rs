//! Exhaustive shape list.

use rad_core::geometry::{Bounds3f, Ray};
use rad_core::shape::{Accel, ArcShape, HitRecord};

/// Brute-force accelerator testing every primitive of every shape. Reference
/// behavior for small scenes and for validating tree-based accelerators.
pub struct ShapeList {
    shapes: Vec<ArcShape>,
    bound: Bounds3f,
}

impl ShapeList {
    /// Create a new `ShapeList`.
    ///
    /// * `shapes` - The scene's shapes, in scene index order.
    pub fn new(shapes: Vec<ArcShape>) -> Self {
        let bound = shapes
            .iter()
            .fold(Bounds3f::default(), |b, s| b.union(&s.bound()));
        Self { shapes, bound }
    }
}

impl Accel for ShapeList {
    fn intersect_p(&self, ray: &Ray) -> bool {
        for shape in &self.shapes {
            for prim in 0..shape.primitive_count() {
                if shape.intersect_primitive(prim, ray).is_some() {
                    return true;
                }
            }
        }
        false
    }

    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut r = *ray;
        for (shape_index, shape) in self.shapes.iter().enumerate() {
            for prim in 0..shape.primitive_count() {
                if let Some(hit) = shape.intersect_primitive(prim, &r) {
                    r = r.clipped(hit.t);
                    closest = Some(HitRecord {
                        shape_index,
                        primitive_index: prim,
                        uv: hit.uv,
                        t: hit.t,
                        n: hit.n,
                    });
                }
            }
        }
        closest
    }

    fn world_bound(&self) -> Bounds3f {
        self.bound
    }
}
