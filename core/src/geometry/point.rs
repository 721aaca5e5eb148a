//! 2-D and 3-D points.

use super::vector3::Vector3f;
use crate::common::*;
use std::ops::{Add, AddAssign, Div, Index, Mul, Sub};

/// A 2-D point of `Float` coordinates (screen/UV space).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,
}

impl Point2f {
    /// Create a new `Point2f`.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub const fn new(x: Float, y: Float) -> Self {
        Self { x, y }
    }
}

impl Add for Point2f {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2f {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Float> for Point2f {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A 2-D point of integer coordinates (pixel space).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2i {
    /// X-coordinate.
    pub x: i32,

    /// Y-coordinate.
    pub y: i32,
}

impl Point2i {
    /// Create a new `Point2i`.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point2i {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2i {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 3-D point of `Float` coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Point3f {
    /// Create a new `Point3f`.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns the squared distance to another point.
    ///
    /// * `other` - The other point.
    #[inline]
    pub fn distance_squared(&self, other: &Self) -> Float {
        (*other - *self).length_squared()
    }

    /// Returns the distance to another point.
    ///
    /// * `other` - The other point.
    #[inline]
    pub fn distance(&self, other: &Self) -> Float {
        self.distance_squared(other).sqrt()
    }

    /// Returns the largest absolute coordinate value. Used to scale the
    /// shadow-ray offset with scene extent.
    pub fn max_abs_coord(&self) -> Float {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Returns true if any coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Self;

    fn add(self, rhs: Vector3f) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign<Vector3f> for Point3f {
    fn add_assign(&mut self, rhs: Vector3f) {
        *self = *self + rhs;
    }
}

impl Add<Point3f> for Point3f {
    type Output = Self;

    fn add(self, rhs: Point3f) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    fn sub(self, rhs: Self) -> Vector3f {
        Vector3f::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub<Vector3f> for Point3f {
    type Output = Self;

    fn sub(self, rhs: Vector3f) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<Float> for Point3f {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<Float> for Point3f {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        let inv = 1.0 / rhs;
        self * inv
    }
}

impl Index<usize> for Point3f {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}
