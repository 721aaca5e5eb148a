//! Point lights.

use rad_core::common::*;
use rad_core::error::{Error, Result};
use rad_core::geometry::{Point2f, Point3f, Vector3f};
use rad_core::light::{DirectionSample, Light, ReferencePoint};
use rad_core::paramset::ParamSet;
use rad_core::shape::PositionSample;
use rad_core::spectrum::Spectrum;

/// An isotropic point emitter. Every sample is a Dirac delta in both position
/// and direction, so the reported densities are discrete markers and the
/// incident radiance already carries the inverse-square falloff.
pub struct PointLight {
    position: Point3f,
    intensity: Spectrum,
}

impl PointLight {
    /// Create a new `PointLight`.
    ///
    /// * `position`  - World-space position.
    /// * `intensity` - Radiant intensity.
    pub fn new(position: Point3f, intensity: Spectrum) -> Self {
        Self { position, intensity }
    }

    /// Create a `PointLight` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.find_one_point3("position", Point3f::default()),
            params.find_one_spectrum("intensity", Spectrum::ONE),
        ))
    }
}

impl Light for PointLight {
    fn sample_direction(&self, r: &ReferencePoint, _u: &Point2f) -> (DirectionSample, Spectrum) {
        let d = self.position - r.p;
        let dist2 = d.length_squared();
        if dist2 <= 0.0 {
            return (
                DirectionSample {
                    wi: Vector3f::new(0.0, 0.0, 1.0),
                    distance: 0.0,
                    pdf: 0.0,
                    delta: true,
                },
                Spectrum::ZERO,
            );
        }
        let distance = dist2.sqrt();
        let ds = DirectionSample {
            wi: d / distance,
            distance,
            pdf: 1.0,
            delta: true,
        };
        (ds, self.intensity / dist2)
    }

    fn pdf_direction(&self, _r: &ReferencePoint, _ds: &DirectionSample) -> Float {
        0.0
    }

    fn sample_position(&self, _u: &Point2f) -> (PositionSample, Spectrum) {
        let ps = PositionSample {
            p: self.position,
            n: Vector3f::new(0.0, 0.0, 1.0),
            uv: Point2f::default(),
            pdf: 1.0,
            delta: true,
        };
        (ps, self.intensity)
    }

    fn pdf_position(&self, _ps: &PositionSample) -> Result<Float> {
        Err(Error::Unsupported(
            "position density of a delta light".to_string(),
        ))
    }

    fn is_delta(&self) -> bool {
        true
    }

    fn power(&self) -> Spectrum {
        self.intensity * FOUR_PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn radiance_falls_off_with_squared_distance() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 2.0), Spectrum::splat(8.0));
        let r = ReferencePoint::on_surface(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        let (ds, radiance) = light.sample_direction(&r, &Point2f::new(0.5, 0.5));
        assert!(ds.delta);
        assert_eq!(ds.pdf, 1.0);
        assert!(approx_eq!(Float, ds.distance, 2.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, radiance.r, 2.0, epsilon = 1e-6));
        assert_eq!(light.pdf_direction(&r, &ds), 0.0);
    }

    #[test]
    fn position_density_is_unsupported() {
        let light = PointLight::new(Point3f::default(), Spectrum::ONE);
        let (ps, _) = light.sample_position(&Point2f::new(0.1, 0.9));
        assert!(ps.delta);
        assert!(matches!(
            light.pdf_position(&ps),
            Err(Error::Unsupported(_))
        ));
    }
}
