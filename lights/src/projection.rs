//! Projection lights.

use rad_core::common::*;
use rad_core::error::{Error, Result};
use rad_core::geometry::{Point2f, Point3f, Transform, Vector3f};
use rad_core::light::{DirectionSample, Light, ReferencePoint};
use rad_core::paramset::ParamSet;
use rad_core::shape::PositionSample;
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// A slide projector: a delta position emitting a textured image through a
/// perspective frustum. Points outside the frustum receive nothing.
pub struct ProjectionLight {
    position: Point3f,
    world_to_light: Transform,
    projection: Transform,
    image: ArcTexture,
    scale: Spectrum,
    tan_half_fov: Float,
    aspect: Float,
}

impl ProjectionLight {
    /// Create a new `ProjectionLight`.
    ///
    /// * `position` - Projector position.
    /// * `target`   - Point projected at.
    /// * `up`       - Up vector hint.
    /// * `fov`      - Vertical field of view in degrees.
    /// * `aspect`   - Image aspect ratio (width over height).
    /// * `image`    - Projected image.
    /// * `scale`    - Intensity scale.
    pub fn new(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        fov: Float,
        aspect: Float,
        image: ArcTexture,
        scale: Spectrum,
    ) -> Self {
        Self {
            position,
            world_to_light: Transform::look_at(position, target, up).inverse(),
            projection: Transform::perspective(fov, aspect),
            image,
            scale,
            tan_half_fov: (fov.to_radians() / 2.0).tan(),
            aspect,
        }
    }

    /// Create a `ProjectionLight` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.find_one_point3("position", Point3f::default()),
            params.find_one_point3("target", Point3f::new(0.0, 0.0, 1.0)),
            params.find_one_vector3("up", Vector3f::new(0.0, 1.0, 0.0)),
            params.find_one_float("fov", 45.0),
            params.find_one_float("aspect", 1.0),
            params.require_texture("image")?,
            params.find_one_spectrum("scale", Spectrum::ONE),
        ))
    }

    /// Projected image value toward a world-space point, black outside the
    /// frustum.
    fn projected(&self, p: &Point3f) -> Spectrum {
        let q = self.world_to_light.transform_point(p);
        if q.z <= 0.0 {
            return Spectrum::ZERO;
        }
        let s = self.projection.transform_point(&q);
        if s.x < -1.0 || s.x > 1.0 || s.y < -1.0 || s.y > 1.0 {
            return Spectrum::ZERO;
        }
        // NDC to image space with the row origin at the top.
        let uv = Point2f::new((s.x + 1.0) / 2.0, (1.0 - s.y) / 2.0);
        self.image.evaluate(&uv) * self.scale
    }
}

impl Light for ProjectionLight {
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
        (ds, self.projected(&r.p) / dist2)
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
        (ps, self.image.average() * self.scale)
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
        // Screen area at unit distance approximates the frustum solid angle;
        // adequate for relative light diagnostics.
        let screen_area = 4.0 * self.tan_half_fov * self.tan_half_fov * self.aspect;
        self.image.average() * self.scale * screen_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rad_core::texture::{ConstantTexture, ImageTexture};
    use std::sync::Arc;

    fn projector(image: ArcTexture) -> ProjectionLight {
        ProjectionLight::new(
            Point3f::new(0.0, 0.0, -4.0),
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            1.0,
            image,
            Spectrum::splat(10.0),
        )
    }

    #[test]
    fn illuminates_only_inside_the_frustum() {
        let light = projector(Arc::new(ConstantTexture::new(Spectrum::ONE)));
        let n = Vector3f::new(0.0, 0.0, -1.0);
        let inside = ReferencePoint::on_surface(Point3f::new(0.0, 0.0, 0.0), n);
        let behind = ReferencePoint::on_surface(Point3f::new(0.0, 0.0, -8.0), n);
        let beside = ReferencePoint::on_surface(Point3f::new(50.0, 0.0, 0.0), n);

        let (ds, radiance) = light.sample_direction(&inside, &Point2f::new(0.5, 0.5));
        assert!(ds.delta && ds.pdf == 1.0);
        assert!((radiance.r - 10.0 / 16.0).abs() < 1e-4);

        let (_, radiance) = light.sample_direction(&behind, &Point2f::new(0.5, 0.5));
        assert!(radiance.is_black());
        let (_, radiance) = light.sample_direction(&beside, &Point2f::new(0.5, 0.5));
        assert!(radiance.is_black());
    }

    #[test]
    fn image_quadrants_map_to_the_view() {
        // Left half red, right half green.
        let pixels = vec![
            Spectrum::new(1.0, 0.0, 0.0),
            Spectrum::new(0.0, 1.0, 0.0),
            Spectrum::new(1.0, 0.0, 0.0),
            Spectrum::new(0.0, 1.0, 0.0),
        ];
        let light = projector(Arc::new(ImageTexture::new(2, 2, pixels).unwrap()));
        let n = Vector3f::new(0.0, 0.0, -1.0);

        // Well into the right half of the frustum as seen from the projector
        // (+x in light space).
        let right = ReferencePoint::on_surface(Point3f::new(1.5, 0.0, 0.0), n);
        let (_, radiance) = light.sample_direction(&right, &Point2f::new(0.5, 0.5));
        assert!(radiance.g > radiance.r);
    }
}
