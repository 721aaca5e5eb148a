//! 3-D vectors.

use crate::common::*;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 3-D vector of `Float` components. Also used for surface normals; the
/// renderer keeps normals normalized by construction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    /// X-component.
    pub x: Float,

    /// Y-component.
    pub y: Float,

    /// Z-component.
    pub z: Float,
}

impl Vector3f {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new `Vector3f`.
    ///
    /// * `x` - X-component.
    /// * `y` - Y-component.
    /// * `z` - Z-component.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    #[inline]
    pub fn dot(&self, other: &Self) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the absolute value of the dot product with another vector.
    ///
    /// * `other` - The other vector.
    #[inline]
    pub fn abs_dot(&self, other: &Self) -> Float {
        self.dot(other).abs()
    }

    /// Returns the cross product with another vector.
    ///
    /// * `other` - The other vector.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the square of the vector's length.
    #[inline]
    pub fn length_squared(&self) -> Float {
        self.dot(self)
    }

    /// Returns the vector's length.
    #[inline]
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector pointing in the same direction.
    #[inline]
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns true if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the component-wise absolute value.
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the index of the component with the largest absolute value.
    pub fn max_dimension(&self) -> usize {
        let a = self.abs();
        if a.x > a.y {
            if a.x > a.z {
                0
            } else {
                2
            }
        } else if a.y > a.z {
            1
        } else {
            2
        }
    }

    /// Flip this vector so it lies in the same hemisphere as another.
    ///
    /// * `other` - The reference vector.
    pub fn face_forward(&self, other: &Self) -> Self {
        if self.dot(other) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl Add for Vector3f {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3f {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3f {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3f {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<Float> for Vector3f {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3f> for Float {
    type Output = Vector3f;

    fn mul(self, rhs: Vector3f) -> Vector3f {
        rhs * self
    }
}

impl MulAssign<Float> for Vector3f {
    fn mul_assign(&mut self, rhs: Float) {
        *self = *self * rhs;
    }
}

impl Div<Float> for Vector3f {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        let inv = 1.0 / rhs;
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl DivAssign<Float> for Vector3f {
    fn div_assign(&mut self, rhs: Float) {
        *self = *self / rhs;
    }
}

impl Neg for Vector3f {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vector3f {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => &self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn cross_is_orthogonal() {
        let a = Vector3f::new(1.0, 2.0, 3.0);
        let b = Vector3f::new(-2.0, 0.5, 4.0);
        let c = a.cross(&b);
        assert!(approx_eq!(f32, a.dot(&c), 0.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, b.dot(&c), 0.0, epsilon = 1e-5));
    }

    #[test]
    fn normalize_yields_unit_length() {
        let v = Vector3f::new(3.0, -4.0, 12.0).normalize();
        assert!(approx_eq!(f32, v.length(), 1.0, epsilon = 1e-6));
    }
}
