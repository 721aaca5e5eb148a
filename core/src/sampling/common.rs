//! Shared sampling routines and MIS weighting.

use crate::common::*;
use crate::geometry::{Point2f, Vector3f};

/// Uniformly sample a direction on the unit sphere.
///
/// * `u` - Uniform random sample.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = TWO_PI * u.y;
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// PDF of `uniform_sample_sphere` (solid angle).
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Concentric (Shirley-Chiu) mapping from the unit square to the unit disk.
///
/// * `u` - Uniform random sample.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    let offset = Point2f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0);
    if offset.x == 0.0 && offset.y == 0.0 {
        return Point2f::new(0.0, 0.0);
    }
    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, PI_OVER_FOUR * (offset.y / offset.x))
    } else {
        (offset.y, PI_OVER_TWO - PI_OVER_FOUR * (offset.x / offset.y))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted hemisphere sample around the local z-axis.
///
/// * `u` - Uniform random sample.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// PDF of `cosine_sample_hemisphere` (solid angle).
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample barycentric coordinates over a triangle.
///
/// * `u` - Uniform random sample.
pub fn uniform_sample_triangle(u: &Point2f) -> Point2f {
    let su0 = u.x.sqrt();
    Point2f::new(1.0 - su0, u.y * su0)
}

/// Power heuristic (β = 2) for weighting two sampling techniques.
///
/// * `nf` - Sample count of the technique being weighted.
/// * `f_pdf` - Its density.
/// * `ng` - Sample count of the competing technique.
/// * `g_pdf` - Its density.
pub fn power_heuristic(nf: usize, f_pdf: Float, ng: usize, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    if f * f + g * g == 0.0 {
        0.0
    } else {
        (f * f) / (f * f + g * g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn cosine_samples_lie_in_upper_hemisphere() {
        let mut rng = Rng::new(11);
        for _ in 0..1000 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let w = cosine_sample_hemisphere(&u);
            assert!(w.z >= 0.0);
            assert!((w.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn power_heuristic_partitions_unity() {
        let w1 = power_heuristic(1, 0.7, 1, 0.2);
        let w2 = power_heuristic(1, 0.2, 1, 0.7);
        assert!((w1 + w2 - 1.0).abs() < 1e-6);
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
    }
}
