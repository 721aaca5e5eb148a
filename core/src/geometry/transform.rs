//! 4x4 matrices and affine/projective transforms.

use super::point::Point3f;
use super::vector3::Vector3f;
use crate::common::*;

/// A row-major 4x4 matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4 {
    /// Matrix elements, `m[row][col]`.
    pub m: [[Float; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4x4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from its elements.
    ///
    /// * `m` - Row-major elements.
    pub fn new(m: [[Float; 4]; 4]) -> Self {
        Self { m }
    }

    /// Returns the matrix product `self * rhs`.
    ///
    /// * `rhs` - The right-hand matrix.
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[i][0] * rhs.m[0][j]
                    + self.m[i][1] * rhs.m[1][j]
                    + self.m[i][2] * rhs.m[2][j]
                    + self.m[i][3] * rhs.m[3][j];
            }
        }
        Self { m: r }
    }

    /// Returns the inverse via Gauss-Jordan elimination with partial pivoting.
    /// Returns `None` for singular matrices.
    pub fn inverse(&self) -> Option<Self> {
        let mut a = self.m;
        let mut inv = Self::IDENTITY.m;

        for col in 0..4 {
            // Pivot on the largest remaining entry in this column.
            let mut pivot = col;
            for row in col + 1..4 {
                if a[row][col].abs() > a[pivot][col].abs() {
                    pivot = row;
                }
            }
            if a[pivot][col].abs() < 1e-12 {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = 1.0 / a[col][col];
            for k in 0..4 {
                a[col][k] *= scale;
                inv[col][k] *= scale;
            }
            for row in 0..4 {
                if row != col {
                    let factor = a[row][col];
                    for k in 0..4 {
                        a[row][k] -= factor * a[col][k];
                        inv[row][k] -= factor * inv[col][k];
                    }
                }
            }
        }
        Some(Self { m: inv })
    }
}

/// A transform holding a matrix and its inverse together so normals and
/// inverse mappings never recompute the inversion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// The matrix.
    pub m: Matrix4x4,

    /// Its inverse.
    pub m_inv: Matrix4x4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            m: Matrix4x4::IDENTITY,
            m_inv: Matrix4x4::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a transform from a matrix, computing the inverse. Returns `None`
    /// for singular matrices.
    ///
    /// * `m` - The matrix.
    pub fn new(m: Matrix4x4) -> Option<Self> {
        m.inverse().map(|m_inv| Self { m, m_inv })
    }

    /// Returns the inverse transform.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Returns the composition `self ∘ rhs` (apply `rhs` first).
    ///
    /// * `rhs` - The transform applied first.
    pub fn compose(&self, rhs: &Self) -> Self {
        Self {
            m: self.m.mul(&rhs.m),
            m_inv: rhs.m_inv.mul(&self.m_inv),
        }
    }

    /// A translation.
    ///
    /// * `delta` - Translation vector.
    pub fn translate(delta: Vector3f) -> Self {
        let m = Matrix4x4::new([
            [1.0, 0.0, 0.0, delta.x],
            [0.0, 1.0, 0.0, delta.y],
            [0.0, 0.0, 1.0, delta.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let m_inv = Matrix4x4::new([
            [1.0, 0.0, 0.0, -delta.x],
            [0.0, 1.0, 0.0, -delta.y],
            [0.0, 0.0, 1.0, -delta.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv }
    }

    /// A non-uniform scale.
    ///
    /// * `x`, `y`, `z` - Scale factors.
    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        let m = Matrix4x4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let m_inv = Matrix4x4::new([
            [1.0 / x, 0.0, 0.0, 0.0],
            [0.0, 1.0 / y, 0.0, 0.0],
            [0.0, 0.0, 1.0 / z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        Self { m, m_inv }
    }

    /// A camera-to-world transform looking from `eye` toward `center`.
    ///
    /// * `eye`    - Viewer position.
    /// * `center` - Point looked at.
    /// * `up`     - Up vector hint.
    pub fn look_at(eye: Point3f, center: Point3f, up: Vector3f) -> Self {
        let dir = (center - eye).normalize();
        let right = up.normalize().cross(&dir).normalize();
        let new_up = dir.cross(&right);
        let m = Matrix4x4::new([
            [right.x, new_up.x, dir.x, eye.x],
            [right.y, new_up.y, dir.y, eye.y],
            [right.z, new_up.z, dir.z, eye.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        // Rigid transform: the inverse always exists.
        let m_inv = m.inverse().unwrap_or(Matrix4x4::IDENTITY);
        Self { m, m_inv }
    }

    /// A perspective projection with vertical field of view `fov` (degrees)
    /// mapping the view frustum's z range to `[0, 1]`.
    ///
    /// * `fov`    - Vertical field of view in degrees.
    /// * `aspect` - Width over height.
    pub fn perspective(fov: Float, aspect: Float) -> Self {
        let (near, far) = (1e-2, 1e4);
        let inv_tan = 1.0 / (fov.to_radians() / 2.0).tan();
        let m = Matrix4x4::new([
            [inv_tan / aspect, 0.0, 0.0, 0.0],
            [0.0, inv_tan, 0.0, 0.0],
            [0.0, 0.0, far / (far - near), -far * near / (far - near)],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let m_inv = m.inverse().unwrap_or(Matrix4x4::IDENTITY);
        Self { m, m_inv }
    }

    /// Transform a point (with perspective divide when needed).
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w == 1.0 {
            Point3f::new(x, y, z)
        } else {
            Point3f::new(x, y, z) / w
        }
    }

    /// Transform a direction (no translation).
    ///
    /// * `v` - The direction.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Transform a normal by the inverse transpose.
    ///
    /// * `n` - The normal.
    pub fn transform_normal(&self, n: &Vector3f) -> Vector3f {
        let m = &self.m_inv.m;
        Vector3f::new(
            m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
            m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
            m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn inverse_round_trips_points() {
        let t = Transform::translate(Vector3f::new(1.0, -2.0, 3.0))
            .compose(&Transform::scale(2.0, 3.0, 0.5));
        let p = Point3f::new(0.3, 0.7, -1.2);
        let back = t.inverse().transform_point(&t.transform_point(&p));
        assert!(approx_eq!(f32, back.distance(&p), 0.0, epsilon = 1e-5));
    }

    #[test]
    fn look_at_maps_origin_to_eye() {
        let eye = Point3f::new(1.0, 2.0, 3.0);
        let t = Transform::look_at(eye, Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0));
        let p = t.transform_point(&Point3f::new(0.0, 0.0, 0.0));
        assert!(approx_eq!(f32, p.distance(&eye), 0.0, epsilon = 1e-5));
    }

    #[test]
    fn perspective_maps_axis_to_center() {
        let t = Transform::perspective(90.0, 1.0);
        let p = t.transform_point(&Point3f::new(0.0, 0.0, 10.0));
        assert!(approx_eq!(f32, p.x, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, p.y, 0.0, epsilon = 1e-5));
    }
}
