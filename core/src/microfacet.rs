//! Microfacet normal distributions.
//!
//! The rough BSDFs sample a half-vector from one of these distributions and
//! reflect/refract around it; new distribution families plug in behind the
//! same trait without touching the BSDFs.

use crate::common::*;
use crate::geometry::*;
use std::sync::Arc;

/// An isotropic microfacet normal-distribution function over the upper local
/// hemisphere.
pub trait MicrofacetDistribution: Send + Sync {
    /// Differential area of microfacets with half-vector `wh`.
    ///
    /// * `wh` - Half-vector in the local frame.
    fn d(&self, wh: &Vector3f) -> Float;

    /// Shadowing-masking auxiliary function Λ(w).
    ///
    /// * `w` - Direction in the local frame.
    fn lambda(&self, w: &Vector3f) -> Float;

    /// Smith masking term for one direction.
    ///
    /// * `w` - Direction in the local frame.
    fn g1(&self, w: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(w))
    }

    /// Smith shadowing-masking term for a direction pair.
    ///
    /// * `wo` - Viewer direction.
    /// * `wi` - Incident direction.
    fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Sample a half-vector in the hemisphere of `wo`.
    ///
    /// * `wo` - Viewer direction.
    /// * `u`  - Uniform random sample.
    fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f;

    /// Density of `sample_wh` in solid-angle measure.
    ///
    /// * `wh` - Half-vector.
    fn pdf(&self, wh: &Vector3f) -> Float {
        self.d(wh) * abs_cos_theta(wh)
    }
}

/// Atomic reference counted `MicrofacetDistribution`.
pub type ArcMicrofacetDistribution = Arc<dyn MicrofacetDistribution>;

/// Trowbridge-Reitz (GGX) distribution.
pub struct TrowbridgeReitz {
    /// Roughness (RMS slope).
    alpha: Float,
}

impl TrowbridgeReitz {
    /// Create a new `TrowbridgeReitz` distribution.
    ///
    /// * `alpha` - Roughness, clamped away from zero.
    pub fn new(alpha: Float) -> Self {
        Self {
            alpha: alpha.max(1e-3),
        }
    }
}

impl MicrofacetDistribution for TrowbridgeReitz {
    fn d(&self, wh: &Vector3f) -> Float {
        let tan2 = tan2_theta(wh);
        if !tan2.is_finite() {
            return 0.0;
        }
        let a2 = self.alpha * self.alpha;
        let cos4 = cos2_theta(wh) * cos2_theta(wh);
        let e = 1.0 + tan2 / a2;
        1.0 / (PI * a2 * cos4 * e * e)
    }

    fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan = tan_theta(w).abs();
        if !abs_tan.is_finite() {
            return 0.0;
        }
        let a2_tan2 = (self.alpha * abs_tan) * (self.alpha * abs_tan);
        (-1.0 + (1.0 + a2_tan2).sqrt()) / 2.0
    }

    fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        let a2 = self.alpha * self.alpha;
        let cos2 = (1.0 - u.x) / (u.x * (a2 - 1.0) + 1.0);
        let cos = cos2.sqrt();
        let sin = (1.0 - cos2).max(0.0).sqrt();
        let phi = TWO_PI * u.y;
        let wh = Vector3f::new(sin * phi.cos(), sin * phi.sin(), cos);
        if same_hemisphere(wo, &wh) {
            wh
        } else {
            -wh
        }
    }
}

/// Beckmann-Spizzichino distribution.
pub struct Beckmann {
    /// Roughness (RMS slope).
    alpha: Float,
}

impl Beckmann {
    /// Create a new `Beckmann` distribution.
    ///
    /// * `alpha` - Roughness, clamped away from zero.
    pub fn new(alpha: Float) -> Self {
        Self {
            alpha: alpha.max(1e-3),
        }
    }
}

impl MicrofacetDistribution for Beckmann {
    fn d(&self, wh: &Vector3f) -> Float {
        let tan2 = tan2_theta(wh);
        if !tan2.is_finite() {
            return 0.0;
        }
        let a2 = self.alpha * self.alpha;
        let cos4 = cos2_theta(wh) * cos2_theta(wh);
        (-tan2 / a2).exp() / (PI * a2 * cos4)
    }

    fn lambda(&self, w: &Vector3f) -> Float {
        let abs_tan = tan_theta(w).abs();
        if !abs_tan.is_finite() {
            return 0.0;
        }
        // Rational approximation to the Beckmann Λ.
        let a = 1.0 / (self.alpha * abs_tan);
        if a >= 1.6 {
            return 0.0;
        }
        (1.0 - 1.259 * a + 0.396 * a * a) / (3.535 * a + 2.181 * a * a)
    }

    fn sample_wh(&self, wo: &Vector3f, u: &Point2f) -> Vector3f {
        let a2 = self.alpha * self.alpha;
        let log_sample = (1.0 - u.x).ln();
        let tan2 = -a2 * log_sample;
        let phi = TWO_PI * u.y;
        let cos = 1.0 / (1.0 + tan2).sqrt();
        let sin = (1.0 - cos * cos).max(0.0).sqrt();
        let wh = Vector3f::new(sin * phi.cos(), sin * phi.sin(), cos);
        if same_hemisphere(wo, &wh) {
            wh
        } else {
            -wh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    fn check_normalization(dist: &dyn MicrofacetDistribution) {
        // ∫ D(ωh) cos θ dωh over the hemisphere should be 1.
        let n = 256;
        let mut integral = 0.0;
        for i in 0..n {
            for j in 0..n {
                let theta = (i as Float + 0.5) / n as Float * PI_OVER_TWO;
                let phi = (j as Float + 0.5) / n as Float * TWO_PI;
                let wh = Vector3f::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                );
                integral += dist.d(&wh) * theta.cos() * theta.sin();
            }
        }
        integral *= PI_OVER_TWO / n as Float * TWO_PI / n as Float;
        assert!((integral - 1.0).abs() < 2e-2, "integral = {integral}");
    }

    #[test]
    fn distributions_are_normalized() {
        check_normalization(&TrowbridgeReitz::new(0.3));
        check_normalization(&Beckmann::new(0.3));
    }

    #[test]
    fn sampled_half_vectors_match_pdf() {
        let dist = TrowbridgeReitz::new(0.25);
        let wo = Vector3f::new(0.2, -0.1, 0.97).normalize();
        let mut rng = Rng::new(17);
        for _ in 0..1000 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let wh = dist.sample_wh(&wo, &u);
            let pdf = dist.pdf(&wh);
            assert!(pdf > 0.0);
            assert!((wh.length() - 1.0).abs() < 1e-4);
        }
    }
}
