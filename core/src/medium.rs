//! Participating-medium interface and phase functions.

use crate::common::*;
use crate::geometry::{Point2f, Point3f, Ray, Vector3f};
use crate::interaction::MediumInteraction;
use crate::sampling::uniform_sphere_pdf;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// Relative tolerance for the ratio-tracking cancellation test: when the
/// transmittance and its sampling density agree to this tolerance they cancel
/// to exactly one, avoiding 0/0 in nearly clear media.
pub const TR_PDF_CANCEL_EPSILON: Float = 1e-6;

/// Henyey-Greenstein phase function; isotropic when `g == 0`.
#[derive(Copy, Clone, Debug)]
pub struct HenyeyGreenstein {
    /// Asymmetry parameter in (-1, 1).
    pub g: Float,
}

impl HenyeyGreenstein {
    /// Create a new `HenyeyGreenstein`.
    ///
    /// * `g` - Asymmetry parameter.
    pub fn new(g: Float) -> Self {
        Self { g }
    }

    /// Phase value for the angle between two world-space directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        let cos_theta = wo.dot(wi);
        let denom = 1.0 + self.g * self.g + 2.0 * self.g * cos_theta;
        INV_FOUR_PI * (1.0 - self.g * self.g) / (denom * denom.max(0.0).sqrt())
    }

    /// Sample an incident direction. Returns the direction and its density
    /// (the phase function integrates to one, so the value doubles as pdf).
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Uniform random sample.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> (Vector3f, Float) {
        let cos_theta = if self.g.abs() < 1e-3 {
            1.0 - 2.0 * u.x
        } else {
            let sq = (1.0 - self.g * self.g) / (1.0 + self.g - 2.0 * self.g * u.x);
            -(1.0 + self.g * self.g - sq * sq) / (2.0 * self.g)
        };
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = TWO_PI * u.y;

        let frame = crate::geometry::Frame::from_normal(*wo);
        let wi = frame.to_world(&Vector3f::new(
            sin_theta * phi.cos(),
            sin_theta * phi.sin(),
            cos_theta,
        ));
        (wi, self.p(wo, &wi))
    }
}

/// A participating medium traversed between surface hits.
pub trait Medium: Send + Sync {
    /// Clip the ray to the medium's bounding interval. Returns the clipped
    /// `(t_min, t_max)` or `None` if the ray misses the medium entirely.
    ///
    /// * `ray` - The ray.
    fn intersect_bound(&self, ray: &Ray) -> Option<(Float, Float)>;

    /// Spectral upper bound on the extinction coefficient anywhere inside.
    fn majorant(&self) -> Spectrum;

    /// Scattering, null and extinction coefficients `(σs, σn, σt)` at a
    /// point; `σn = majorant − σt` for heterogeneous media.
    ///
    /// * `p` - The point.
    fn coefficients(&self, p: &Point3f) -> (Spectrum, Spectrum, Spectrum);

    /// Sample a free-flight distance by exponential sampling against the
    /// selected majorant channel: `t = t_min − ln(1 − u)/majorant[channel]`.
    /// Returns `None` when the sampled distance exceeds the medium segment
    /// (the null-collision escape of delta tracking).
    ///
    /// * `ray`     - The ray; its `t_max` bounds the visible segment.
    /// * `u`       - Uniform random sample.
    /// * `channel` - Spectral channel driving the exponential.
    fn sample_interaction(&self, ray: &Ray, u: Float, channel: usize) -> Option<MediumInteraction>;

    /// Transmittance and ratio-tracking density for a sampled interaction
    /// against a surface hit at distance `surface_t`. Degenerates to `(1, 1)`
    /// when the surface hit precedes the medium segment or when transmittance
    /// and density cancel within `TR_PDF_CANCEL_EPSILON`.
    ///
    /// * `mi`        - The sampled medium interaction.
    /// * `surface_t` - Distance of the blocking surface hit (infinite if none).
    fn eval_tr_and_pdf(&self, mi: &MediumInteraction, surface_t: Float) -> (Spectrum, Spectrum);

    /// Phase function used at interactions inside this medium.
    fn phase(&self) -> HenyeyGreenstein;
}

/// Atomic reference counted `Medium`.
pub type ArcMedium = Arc<dyn Medium>;

/// Apply the cancellation rule shared by the medium implementations: when
/// transmittance and density agree within a relative epsilon the ratio is
/// exactly one.
///
/// * `tr`  - Transmittance.
/// * `pdf` - Sampling density.
pub fn cancel_tr_pdf(tr: Spectrum, pdf: Spectrum) -> (Spectrum, Spectrum) {
    let diff = (tr.y() - pdf.y()).abs();
    if diff <= TR_PDF_CANCEL_EPSILON * pdf.y().abs() {
        (Spectrum::ONE, Spectrum::ONE)
    } else {
        (tr, pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn phase_integrates_to_one() {
        for g in [0.0, 0.4, -0.6] {
            let hg = HenyeyGreenstein::new(g);
            let wo = Vector3f::new(0.0, 0.0, 1.0);
            let n = 512;
            let mut integral = 0.0;
            for i in 0..n {
                let theta = (i as Float + 0.5) / n as Float * PI;
                let wi = Vector3f::new(theta.sin(), 0.0, theta.cos());
                integral += hg.p(&wo, &wi) * theta.sin() * TWO_PI * PI / n as Float;
            }
            assert!((integral - 1.0).abs() < 1e-2, "g = {g}: integral = {integral}");
        }
    }

    #[test]
    fn isotropic_sampling_density_is_uniform() {
        let hg = HenyeyGreenstein::new(0.0);
        let wo = Vector3f::new(0.3, 0.4, 0.866).normalize();
        let mut rng = Rng::new(2);
        for _ in 0..100 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let (wi, pdf) = hg.sample_p(&wo, &u);
            assert!((wi.length() - 1.0).abs() < 1e-4);
            assert!((pdf - uniform_sphere_pdf()).abs() < 1e-5);
        }
    }

    #[test]
    fn near_cancellation_degenerates_to_unit_ratio() {
        let tr = Spectrum::splat(0.9999999);
        let pdf = Spectrum::splat(1.0);
        let (tr, pdf) = cancel_tr_pdf(tr, pdf);
        assert_eq!(tr, Spectrum::ONE);
        assert_eq!(pdf, Spectrum::ONE);

        let (tr, pdf) = cancel_tr_pdf(Spectrum::splat(0.5), Spectrum::splat(1.0));
        assert_ne!(tr, Spectrum::ONE);
        assert_eq!(pdf, Spectrum::ONE);
    }
}
