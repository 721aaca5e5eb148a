//! Orthonormal shading frames and local-frame trigonometry.
//!
//! Directions handed to BSDFs live in a local coordinate system where the
//! surface normal is the z-axis, so `cos θ` of a direction is simply its
//! z-component.

use super::vector3::Vector3f;
use crate::common::*;

/// An orthonormal basis (s, t, n) around a surface normal.
#[derive(Copy, Clone, Debug)]
pub struct Frame {
    /// First tangent.
    pub s: Vector3f,

    /// Second tangent.
    pub t: Vector3f,

    /// Normal (local z-axis).
    pub n: Vector3f,
}

impl Frame {
    /// Build a frame around a unit normal using the branchless construction
    /// of Duff et al. (2017).
    ///
    /// * `n` - The unit normal.
    pub fn from_normal(n: Vector3f) -> Self {
        let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
        let a = -1.0 / (sign + n.z);
        let b = n.x * n.y * a;
        let s = Vector3f::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
        let t = Vector3f::new(b, sign + n.y * n.y * a, -n.y);
        Self { s, t, n }
    }

    /// Build a frame from explicit tangents (e.g. a mesh's dp/du).
    ///
    /// * `n` - The unit normal.
    /// * `s` - A vector whose component orthogonal to `n` becomes the first tangent.
    pub fn from_normal_tangent(n: Vector3f, s: Vector3f) -> Self {
        let s_ortho = s - n * n.dot(&s);
        let len2 = s_ortho.length_squared();
        if len2 <= 0.0 || !len2.is_finite() {
            return Self::from_normal(n);
        }
        let s = s_ortho / len2.sqrt();
        let t = n.cross(&s);
        Self { s, t, n }
    }

    /// Transform a world-space direction into this frame.
    ///
    /// * `v` - World-space direction.
    #[inline]
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.s), v.dot(&self.t), v.dot(&self.n))
    }

    /// Transform a local direction back into world space.
    ///
    /// * `v` - Local direction.
    #[inline]
    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.s * v.x + self.t * v.y + self.n * v.z
    }
}

/// Cosine of the polar angle of a local direction.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Squared cosine of the polar angle.
#[inline]
pub fn cos2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

/// Absolute cosine of the polar angle.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

/// Squared sine of the polar angle.
#[inline]
pub fn sin2_theta(w: &Vector3f) -> Float {
    (1.0 - cos2_theta(w)).max(0.0)
}

/// Sine of the polar angle.
#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin2_theta(w).sqrt()
}

/// Tangent of the polar angle.
#[inline]
pub fn tan_theta(w: &Vector3f) -> Float {
    sin_theta(w) / cos_theta(w)
}

/// Squared tangent of the polar angle.
#[inline]
pub fn tan2_theta(w: &Vector3f) -> Float {
    sin2_theta(w) / cos2_theta(w)
}

/// Returns true if two local directions lie in the same hemisphere.
#[inline]
pub fn same_hemisphere(w1: &Vector3f, w2: &Vector3f) -> bool {
    w1.z * w2.z > 0.0
}

/// Reflect a local direction around a (possibly half-vector) normal.
///
/// * `w` - The direction to reflect.
/// * `n` - The normal.
#[inline]
pub fn reflect(w: &Vector3f, n: &Vector3f) -> Vector3f {
    -*w + *n * (2.0 * w.dot(n))
}

/// Refract a direction through a normal with relative index of refraction
/// `eta`. Returns `None` on total internal reflection.
///
/// * `w`   - Incident direction (pointing away from the surface).
/// * `n`   - The normal, on the same side as `w`.
/// * `eta` - Relative index of refraction (incident over transmitted).
pub fn refract(w: &Vector3f, n: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = n.dot(w);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(-*w * eta + *n * (eta * cos_i - cos_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn frame_is_orthonormal() {
        for n in [
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(1.0, 2.0, -0.5).normalize(),
        ] {
            let f = Frame::from_normal(n);
            assert!(approx_eq!(f32, f.s.length(), 1.0, epsilon = 1e-5));
            assert!(approx_eq!(f32, f.t.length(), 1.0, epsilon = 1e-5));
            assert!(approx_eq!(f32, f.s.dot(&f.t), 0.0, epsilon = 1e-5));
            assert!(approx_eq!(f32, f.s.dot(&f.n), 0.0, epsilon = 1e-5));
            assert!(approx_eq!(f32, f.t.dot(&f.n), 0.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn to_local_round_trips() {
        let f = Frame::from_normal(Vector3f::new(0.3, -0.4, 0.8).normalize());
        let w = Vector3f::new(0.2, 0.9, -0.1).normalize();
        let back = f.to_world(&f.to_local(&w));
        assert!(approx_eq!(f32, (back - w).length(), 0.0, epsilon = 1e-5));
    }

    #[test]
    fn refract_detects_total_internal_reflection() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let grazing = Vector3f::new(0.99, 0.0, 0.14106736).normalize();
        // Dense-to-sparse at a grazing angle: total internal reflection.
        assert!(refract(&grazing, &n, 1.5).is_none());
        // Head-on refraction always succeeds.
        let w = Vector3f::new(0.0, 0.0, 1.0);
        assert!(refract(&w, &n, 1.5).is_some());
    }
}
