//! Bounding volume hierarchy.

use log::info;
use rad_core::common::*;
use rad_core::geometry::{Bounds3f, Point3f, Ray};
use rad_core::shape::{Accel, ArcShape, HitRecord};

/// Largest number of primitives collected into one leaf.
const MAX_LEAF_SIZE: usize = 4;

/// A primitive reference gathered during construction.
struct PrimitiveInfo {
    shape_index: usize,
    primitive_index: usize,
    bound: Bounds3f,
    centroid: Point3f,
}

/// One node of the flattened tree. Interior nodes hold the index of their
/// second child (the first child is always the next node in the array); leaf
/// nodes hold a range into the reordered primitive list.
enum BvhNode {
    Interior {
        bound: Bounds3f,
        second_child: usize,
        axis: usize,
    },
    Leaf {
        bound: Bounds3f,
        first: usize,
        count: usize,
    },
}

impl BvhNode {
    fn bound(&self) -> &Bounds3f {
        match self {
            BvhNode::Interior { bound, .. } => bound,
            BvhNode::Leaf { bound, .. } => bound,
        }
    }
}

/// A median-split bounding volume hierarchy over every primitive of every
/// shape. Built once before rendering; traversal is read-only and lock-free.
pub struct Bvh {
    shapes: Vec<ArcShape>,
    nodes: Vec<BvhNode>,
    primitives: Vec<(usize, usize)>,
}

impl Bvh {
    /// Build a `Bvh` over the given shapes.
    ///
    /// * `shapes` - The scene's shapes, in scene index order.
    pub fn new(shapes: Vec<ArcShape>) -> Self {
        let mut info: Vec<PrimitiveInfo> = Vec::new();
        for (shape_index, shape) in shapes.iter().enumerate() {
            for primitive_index in 0..shape.primitive_count() {
                let bound = shape.primitive_bound(primitive_index);
                info.push(PrimitiveInfo {
                    shape_index,
                    primitive_index,
                    bound,
                    centroid: bound.centroid(),
                });
            }
        }

        let mut nodes = Vec::new();
        let mut primitives = Vec::with_capacity(info.len());
        if !info.is_empty() {
            let n = info.len();
            build_recursive(&mut info, &mut nodes, &mut primitives);
            info!("built BVH: {} primitives, {} nodes", n, nodes.len());
        }
        Self {
            shapes,
            nodes,
            primitives,
        }
    }

    /// Traverse the tree, invoking the callback for every primitive whose
    /// node bound overlaps the ray. The callback returns true to terminate
    /// traversal early (any-hit queries).
    fn traverse<F>(&self, ray: &Ray, mut visit: F) -> bool
    where
        F: FnMut(&Ray, usize, usize) -> (bool, Float),
    {
        if self.nodes.is_empty() {
            return false;
        }
        let mut r = *ray;
        let mut stack: Vec<usize> = Vec::with_capacity(64);
        stack.push(0);
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if node.bound().intersect_interval(&r).is_none() {
                continue;
            }
            match node {
                BvhNode::Leaf { first, count, .. } => {
                    for i in *first..*first + *count {
                        let (shape_index, primitive_index) = self.primitives[i];
                        let (done, t_max) = visit(&r, shape_index, primitive_index);
                        if done {
                            return true;
                        }
                        r.t_max = t_max;
                    }
                }
                BvhNode::Interior {
                    second_child, axis, ..
                } => {
                    // Visit the child nearer along the ray first.
                    let (near, far) = if ray.d[*axis] >= 0.0 {
                        (current + 1, *second_child)
                    } else {
                        (*second_child, current + 1)
                    };
                    stack.push(far);
                    stack.push(near);
                }
            }
        }
        false
    }
}

impl Accel for Bvh {
    fn intersect_p(&self, ray: &Ray) -> bool {
        self.traverse(ray, |r, shape_index, primitive_index| {
            let hit = self.shapes[shape_index]
                .intersect_primitive(primitive_index, r)
                .is_some();
            (hit, r.t_max)
        })
    }

    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        self.traverse(ray, |r, shape_index, primitive_index| {
            let mut t_max = r.t_max;
            if let Some(hit) = self.shapes[shape_index].intersect_primitive(primitive_index, r) {
                t_max = hit.t;
                closest = Some(HitRecord {
                    shape_index,
                    primitive_index,
                    uv: hit.uv,
                    t: hit.t,
                    n: hit.n,
                });
            }
            (false, t_max)
        });
        closest
    }

    fn world_bound(&self) -> Bounds3f {
        match self.nodes.first() {
            Some(node) => *node.bound(),
            None => Bounds3f::default(),
        }
    }
}

/// Recursively split the primitive range at the spatial median of the longest
/// centroid axis, falling back to an equal-count split when the centroids
/// degenerate onto a plane.
fn build_recursive(
    info: &mut [PrimitiveInfo],
    nodes: &mut Vec<BvhNode>,
    primitives: &mut Vec<(usize, usize)>,
) -> usize {
    let bound = info
        .iter()
        .fold(Bounds3f::default(), |b, p| b.union(&p.bound));

    if info.len() <= MAX_LEAF_SIZE {
        let index = nodes.len();
        let first = primitives.len();
        primitives.extend(info.iter().map(|p| (p.shape_index, p.primitive_index)));
        nodes.push(BvhNode::Leaf {
            bound,
            first,
            count: info.len(),
        });
        return index;
    }

    let centroid_bound = info
        .iter()
        .fold(Bounds3f::default(), |b, p| b.union_point(&p.centroid));
    let axis = centroid_bound.maximum_extent();
    let mid_value = centroid_bound.centroid()[axis];

    let mut mid = partition(info, |p| p.centroid[axis] < mid_value);
    if mid == 0 || mid == info.len() {
        // Degenerate centroids: split into equal halves instead.
        mid = info.len() / 2;
        info.sort_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let index = nodes.len();
    nodes.push(BvhNode::Interior {
        bound,
        second_child: 0,
        axis,
    });
    let (left, right) = info.split_at_mut(mid);
    build_recursive(left, nodes, primitives);
    let second_child = build_recursive(right, nodes, primitives);
    if let BvhNode::Interior {
        second_child: ref mut sc,
        ..
    } = nodes[index]
    {
        *sc = second_child;
    }
    index
}

/// In-place partition; returns the index of the first element for which the
/// predicate is false.
fn partition<T, F: Fn(&T) -> bool>(data: &mut [T], pred: F) -> usize {
    let mut first = 0;
    for i in 0..data.len() {
        if pred(&data[i]) {
            data.swap(first, i);
            first += 1;
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeList;
    use float_cmp::approx_eq;
    use rad_core::geometry::Vector3f;
    use rad_core::rng::Rng;
    use rad_shapes::Sphere;
    use std::sync::Arc;

    fn sphere_grid() -> Vec<ArcShape> {
        let mut shapes: Vec<ArcShape> = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                shapes.push(Arc::new(Sphere::new(
                    Point3f::new(i as Float * 2.0, j as Float * 2.0, 0.0),
                    0.6,
                )));
            }
        }
        shapes
    }

    #[test]
    fn agrees_with_exhaustive_intersection() {
        let bvh = Bvh::new(sphere_grid());
        let list = ShapeList::new(sphere_grid());
        let mut rng = Rng::new(31);
        for _ in 0..500 {
            let o = Point3f::new(
                rng.uniform_float() * 10.0 - 2.0,
                rng.uniform_float() * 10.0 - 2.0,
                -5.0,
            );
            let d = Vector3f::new(
                rng.uniform_float() - 0.5,
                rng.uniform_float() - 0.5,
                1.0,
            )
            .normalize();
            let ray = Ray::new(o, d, 0.0, INFINITY);

            let a = bvh.intersect(&ray);
            let b = list.intersect(&ray);
            assert_eq!(a.is_some(), b.is_some());
            if let (Some(a), Some(b)) = (a, b) {
                assert!(approx_eq!(Float, a.t, b.t, epsilon = 1e-4));
                assert_eq!(a.shape_index, b.shape_index);
            }
            assert_eq!(bvh.intersect_p(&ray), list.intersect_p(&ray));
        }
    }

    #[test]
    fn respects_the_ray_interval() {
        let bvh = Bvh::new(sphere_grid());
        let ray = Ray::new(
            Point3f::new(0.0, 0.0, -5.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            1.0,
        );
        // The nearest sphere surface is at t = 4.4, beyond the interval.
        assert!(bvh.intersect(&ray).is_none());
        assert!(!bvh.intersect_p(&ray));
    }

    #[test]
    fn empty_scene_never_hits() {
        let bvh = Bvh::new(Vec::new());
        let ray = Ray::new(
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        assert!(bvh.intersect(&ray).is_none());
        assert!(!bvh.intersect_p(&ray));
    }
}
