//! Homogeneous media.

use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{Frame, Point3f, Ray};
use rad_core::interaction::MediumInteraction;
use rad_core::medium::{cancel_tr_pdf, HenyeyGreenstein, Medium};
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;

/// A medium with constant coefficients filling all space along the ray. The
/// extinction itself is the tightest possible majorant, so the free-flight
/// distribution is exact and no null collisions ever occur.
pub struct HomogeneousMedium {
    sigma_s: Spectrum,
    sigma_t: Spectrum,
    phase: HenyeyGreenstein,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium`.
    ///
    /// * `sigma_a` - Absorption coefficient.
    /// * `sigma_s` - Scattering coefficient.
    /// * `g`       - Phase asymmetry parameter.
    pub fn new(sigma_a: Spectrum, sigma_s: Spectrum, g: Float) -> Self {
        Self {
            sigma_s,
            sigma_t: sigma_a + sigma_s,
            phase: HenyeyGreenstein::new(g),
        }
    }

    /// Create a `HomogeneousMedium` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.find_one_spectrum("sigma_a", Spectrum::splat(0.1)),
            params.find_one_spectrum("sigma_s", Spectrum::splat(0.5)),
            params.find_one_float("g", 0.0),
        ))
    }
}

impl Medium for HomogeneousMedium {
    fn intersect_bound(&self, ray: &Ray) -> Option<(Float, Float)> {
        Some((ray.t_min, ray.t_max))
    }

    fn majorant(&self) -> Spectrum {
        self.sigma_t
    }

    fn coefficients(&self, _p: &Point3f) -> (Spectrum, Spectrum, Spectrum) {
        (self.sigma_s, Spectrum::ZERO, self.sigma_t)
    }

    fn sample_interaction(&self, ray: &Ray, u: Float, channel: usize) -> Option<MediumInteraction> {
        let (t_min, t_max) = self.intersect_bound(ray)?;
        let m = self.sigma_t[channel];
        if m <= 0.0 {
            return None;
        }
        let t = t_min - (1.0 - u).ln() / m;
        if t >= t_max {
            return None;
        }
        Some(MediumInteraction {
            p: ray.at(t),
            frame: Frame::from_normal(-ray.d),
            sigma_s: self.sigma_s,
            sigma_n: Spectrum::ZERO,
            sigma_t: self.sigma_t,
            majorant: self.sigma_t,
            t_entry: t_min,
            t,
            phase: self.phase,
        })
    }

    fn eval_tr_and_pdf(&self, mi: &MediumInteraction, surface_t: Float) -> (Spectrum, Spectrum) {
        if surface_t <= mi.t_entry {
            return (Spectrum::ONE, Spectrum::ONE);
        }
        let dt = (mi.t.min(surface_t) - mi.t_entry).max(0.0);
        let tr = (-(self.sigma_t * dt)).exp();
        let pdf = if mi.t < surface_t {
            self.sigma_t * tr
        } else {
            tr
        };
        cancel_tr_pdf(tr, pdf)
    }

    fn phase(&self) -> HenyeyGreenstein {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::geometry::Vector3f;
    use rad_core::rng::Rng;

    fn medium(sigma_t: Float) -> HomogeneousMedium {
        HomogeneousMedium::new(Spectrum::splat(sigma_t / 2.0), Spectrum::splat(sigma_t / 2.0), 0.0)
    }

    #[test]
    fn free_flight_distances_are_exponential() {
        // The sampled distances follow t ~ Exp(σt): the mean is 1/σt and the
        // escape probability past L is e^{-σt L}.
        let sigma_t = 2.0;
        let m = medium(sigma_t);
        let mut rng = Rng::new(101);
        let draws = 100_000;
        let l = 0.8;
        let mut sum = 0.0;
        let mut escapes = 0usize;

        let long_ray = Ray::new(
            Point3f::default(),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        let short_ray = long_ray.clipped(l);
        for _ in 0..draws {
            let mi = m
                .sample_interaction(&long_ray, rng.uniform_float(), 0)
                .expect("unbounded ray always scatters");
            sum += mi.t;
            if m.sample_interaction(&short_ray, rng.uniform_float(), 0).is_none() {
                escapes += 1;
            }
        }
        let mean = sum / draws as Float;
        assert!((mean - 1.0 / sigma_t).abs() < 0.01, "mean = {mean}");
        let escape = escapes as Float / draws as Float;
        let expected = (-sigma_t * l).exp();
        assert!((escape - expected).abs() < 0.01, "escape = {escape}");
    }

    #[test]
    fn scatter_ratio_reduces_to_inverse_extinction() {
        let m = medium(4.0);
        let ray = Ray::new(
            Point3f::default(),
            Vector3f::new(1.0, 0.0, 0.0),
            0.0,
            INFINITY,
        );
        let mi = m.sample_interaction(&ray, 0.7, 0).unwrap();
        let (tr, pdf) = m.eval_tr_and_pdf(&mi, INFINITY);
        // tr / pdf = 1 / σt channel-wise for the exact majorant.
        assert!((tr.r / pdf.r - 0.25).abs() < 1e-5);
    }

    #[test]
    fn surface_before_the_medium_degenerates_to_unit() {
        let m = medium(1.0);
        let ray = Ray::new(
            Point3f::default(),
            Vector3f::new(1.0, 0.0, 0.0),
            2.0,
            INFINITY,
        );
        let mi = m.sample_interaction(&ray, 0.5, 0).unwrap();
        let (tr, pdf) = m.eval_tr_and_pdf(&mi, 1.0);
        assert_eq!(tr, Spectrum::ONE);
        assert_eq!(pdf, Spectrum::ONE);
    }
}
