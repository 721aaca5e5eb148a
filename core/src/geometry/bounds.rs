//! Axis-aligned bounding boxes and pixel rectangles.

use super::point::{Point2i, Point3f};
use super::ray::Ray;
use super::vector3::Vector3f;
use crate::common::*;

/// A 3-D axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum corner.
    pub p_min: Point3f,

    /// Maximum corner.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns an empty box that any union will overwrite.
    fn default() -> Self {
        Self {
            p_min: Point3f::new(INFINITY, INFINITY, INFINITY),
            p_max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }
}

impl Bounds3f {
    /// Create a new `Bounds3f` from two corners.
    ///
    /// * `p1` - First corner.
    /// * `p2` - Second corner.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: Point3f::new(p1.x.min(p2.x), p1.y.min(p2.y), p1.z.min(p2.z)),
            p_max: Point3f::new(p1.x.max(p2.x), p1.y.max(p2.y), p1.z.max(p2.z)),
        }
    }

    /// Returns the box grown to contain a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: Point3f::new(self.p_min.x.min(p.x), self.p_min.y.min(p.y), self.p_min.z.min(p.z)),
            p_max: Point3f::new(self.p_max.x.max(p.x), self.p_max.y.max(p.y), self.p_max.z.max(p.z)),
        }
    }

    /// Returns the union of two boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        self.union_point(&other.p_min).union_point(&other.p_max)
    }

    /// Returns the center point of the box.
    pub fn centroid(&self) -> Point3f {
        (self.p_min + self.p_max) * 0.5
    }

    /// Returns the vector across the box's diagonal.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the index of the longest axis (0 = x, 1 = y, 2 = z).
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Slab test against a ray over its `[t_min, t_max]` interval. Returns the
    /// clipped parametric interval if the ray overlaps the box.
    ///
    /// * `ray` - The ray.
    pub fn intersect_interval(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0 = ray.t_min;
        let mut t1 = ray.t_max;
        for axis in 0..3 {
            let inv_d = 1.0 / ray.d[axis];
            let (lo, hi) = match axis {
                0 => (self.p_min.x, self.p_max.x),
                1 => (self.p_min.y, self.p_max.y),
                _ => (self.p_min.z, self.p_max.z),
            };
            let o = match axis {
                0 => ray.o.x,
                1 => ray.o.y,
                _ => ray.o.z,
            };
            let mut t_near = (lo - o) * inv_d;
            let mut t_far = (hi - o) * inv_d;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Returns true if the ray overlaps the box.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.intersect_interval(ray).is_some()
    }
}

/// A 2-D integer rectangle; `p_max` is exclusive. Used for image tiles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds2i {
    /// Minimum corner (inclusive).
    pub p_min: Point2i,

    /// Maximum corner (exclusive).
    pub p_max: Point2i,
}

impl Bounds2i {
    /// Create a new `Bounds2i`.
    ///
    /// * `p_min` - Minimum corner (inclusive).
    /// * `p_max` - Maximum corner (exclusive).
    pub fn new(p_min: Point2i, p_max: Point2i) -> Self {
        Self { p_min, p_max }
    }

    /// Returns the extent in both dimensions.
    pub fn diagonal(&self) -> Point2i {
        self.p_max - self.p_min
    }

    /// Returns the number of pixels covered.
    pub fn area(&self) -> usize {
        let d = self.diagonal();
        if d.x <= 0 || d.y <= 0 {
            0
        } else {
            d.x as usize * d.y as usize
        }
    }

    /// Returns true if the point lies inside (exclusive of `p_max`).
    ///
    /// * `p` - The point.
    pub fn contains_exclusive(&self, p: &Point2i) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIter;

    /// Iterate over the contained pixels in scanline order.
    fn into_iter(self) -> Bounds2iIter {
        Bounds2iIter {
            bounds: self,
            current: self.p_min,
        }
    }
}

/// Scanline-order iterator over the pixels of a `Bounds2i`.
pub struct Bounds2iIter {
    bounds: Bounds2i,
    current: Point2i,
}

impl Iterator for Bounds2iIter {
    type Item = Point2i;

    fn next(&mut self) -> Option<Point2i> {
        if self.current.y >= self.bounds.p_max.y || self.bounds.area() == 0 {
            return None;
        }
        let p = self.current;
        self.current.x += 1;
        if self.current.x >= self.bounds.p_max.x {
            self.current.x = self.bounds.p_min.x;
            self.current.y += 1;
        }
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds3_slab_test() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let hit = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY);
        let miss = Ray::new(Point3f::new(0.0, 3.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 0.0, INFINITY);
        let (t0, t1) = b.intersect_interval(&hit).unwrap();
        assert!((t0 - 4.0).abs() < 1e-5 && (t1 - 6.0).abs() < 1e-5);
        assert!(!b.intersect_p(&miss));
    }

    #[test]
    fn bounds2_iteration_is_scanline_order() {
        let b = Bounds2i::new(Point2i::new(0, 0), Point2i::new(2, 2));
        let pixels: Vec<_> = b.into_iter().collect();
        assert_eq!(
            pixels,
            vec![
                Point2i::new(0, 0),
                Point2i::new(1, 0),
                Point2i::new(0, 1),
                Point2i::new(1, 1)
            ]
        );
        assert_eq!(b.area(), 4);
    }
}
