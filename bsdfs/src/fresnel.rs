//! Fresnel reflectance terms.

use rad_core::common::*;
use rad_core::spectrum::Spectrum;

/// Exact Fresnel reflectance for a dielectric interface.
///
/// * `cos_theta_i` - Cosine of the incident angle (may be negative when the
///   direction arrives from the transmitted side).
/// * `eta_i`       - Index of refraction on the incident side.
/// * `eta_t`       - Index of refraction on the transmitted side.
pub fn fresnel_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_i = clamp(cos_theta_i, -1.0, 1.0);
    let (eta_i, eta_t) = if cos_i > 0.0 {
        (eta_i, eta_t)
    } else {
        cos_i = -cos_i;
        (eta_t, eta_i)
    };

    let sin_i = (1.0 - cos_i * cos_i).max(0.0).sqrt();
    let sin_t = eta_i / eta_t * sin_i;
    if sin_t >= 1.0 {
        return 1.0; // Total internal reflection.
    }
    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();

    let r_parl = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Schlick approximation to conductor reflectance from the normal-incidence
/// reflectance color.
///
/// * `cos_theta_i` - Cosine of the incident angle.
/// * `r0`          - Reflectance at normal incidence.
pub fn fresnel_schlick(cos_theta_i: Float, r0: Spectrum) -> Spectrum {
    let c = clamp(1.0 - cos_theta_i.abs(), 0.0, 1.0);
    let c5 = (c * c) * (c * c) * c;
    r0 + (Spectrum::ONE - r0) * c5
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn dielectric_limits() {
        // Normal incidence on glass: ((n-1)/(n+1))².
        let f = fresnel_dielectric(1.0, 1.0, 1.5);
        assert!(approx_eq!(Float, f, 0.04, epsilon = 1e-3));
        // Grazing incidence reflects everything.
        let f = fresnel_dielectric(1e-4, 1.0, 1.5);
        assert!(f > 0.99);
        // Dense-to-sparse beyond the critical angle: total internal reflection.
        let f = fresnel_dielectric(-0.3, 1.0, 1.5);
        assert_eq!(f, 1.0);
    }

    #[test]
    fn schlick_interpolates_to_white_at_grazing() {
        let r0 = Spectrum::new(0.9, 0.6, 0.3);
        let f = fresnel_schlick(1.0, r0);
        assert!((f.r - 0.9).abs() < 1e-6);
        let f = fresnel_schlick(0.0, r0);
        assert!((f.r - 1.0).abs() < 1e-5 && (f.b - 1.0).abs() < 1e-5);
    }
}
