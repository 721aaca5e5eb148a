//! Cameras.

use crate::common::*;
use crate::geometry::{Point2f, Point3f, Ray, Transform, Vector3f};
use std::sync::Arc;

/// A camera maps film positions to primary rays.
pub trait Camera: Send + Sync {
    /// Generate the primary ray through a film position.
    ///
    /// * `p_film` - Film position in `[0, 1]²` (origin at the top-left).
    fn generate_ray(&self, p_film: &Point2f) -> Ray;
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera>;

/// A pinhole perspective camera.
pub struct PerspectiveCamera {
    /// Camera-to-world transform.
    camera_to_world: Transform,

    /// Half-extent of the film plane at unit distance, vertically.
    tan_half_fov: Float,

    /// Film aspect ratio (width over height).
    aspect: Float,
}

impl PerspectiveCamera {
    /// Create a new `PerspectiveCamera`.
    ///
    /// * `eye`    - Camera position.
    /// * `center` - Point looked at.
    /// * `up`     - Up vector hint.
    /// * `vfov`   - Vertical field of view in degrees.
    /// * `aspect` - Film aspect ratio (width over height).
    pub fn new(eye: Point3f, center: Point3f, up: Vector3f, vfov: Float, aspect: Float) -> Self {
        Self {
            camera_to_world: Transform::look_at(eye, center, up),
            tan_half_fov: (vfov.to_radians() / 2.0).tan(),
            aspect,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn generate_ray(&self, p_film: &Point2f) -> Ray {
        // Film (0,0) is the top-left corner; flip y into camera space.
        let x = (2.0 * p_film.x - 1.0) * self.tan_half_fov * self.aspect;
        let y = (1.0 - 2.0 * p_film.y) * self.tan_half_fov;
        let d_camera = Vector3f::new(x, y, 1.0).normalize();
        let o = self.camera_to_world.transform_point(&Point3f::default());
        let d = self.camera_to_world.transform_vector(&d_camera).normalize();
        Ray::new(o, d, 0.0, INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_at_target() {
        let eye = Point3f::new(0.0, 0.0, -5.0);
        let camera = PerspectiveCamera::new(
            eye,
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            1.0,
        );
        let ray = camera.generate_ray(&Point2f::new(0.5, 0.5));
        assert!((ray.o.distance(&eye)).abs() < 1e-5);
        assert!((ray.d - Vector3f::new(0.0, 0.0, 1.0)).length() < 1e-4);
    }
}
