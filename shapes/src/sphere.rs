//! Spheres.

use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{Bounds3f, Frame, Point2f, Point3f, Ray, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::paramset::ParamSet;
use rad_core::sampling::uniform_sample_sphere;
use rad_core::shape::{
    HitRecord, ParametricPoint, PositionSample, PrimitiveHit, Shape,
};

/// A full sphere given by center and radius. The surface carries the usual
/// spherical parameterization (u along longitude, v along colatitude), so it
/// supports parametric evaluation for textured emission sampling.
pub struct Sphere {
    center: Point3f,
    radius: Float,
}

impl Sphere {
    /// Create a new `Sphere`.
    ///
    /// * `center` - Center position.
    /// * `radius` - Radius.
    pub fn new(center: Point3f, radius: Float) -> Self {
        Self { center, radius }
    }

    /// Create a `Sphere` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let center = params.find_one_point3("center", Point3f::default());
        let radius = params.find_one_float("radius", 1.0);
        Ok(Self::new(center, radius))
    }

    /// Spherical UV of a unit direction from the center.
    fn direction_uv(d: &Vector3f) -> Point2f {
        let mut phi = d.y.atan2(d.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let theta = clamp(d.z, -1.0, 1.0).acos();
        Point2f::new(phi * INV_TWO_PI, theta * INV_PI)
    }

    /// Parametric derivatives at a surface point given its UV.
    fn derivatives(&self, uv: &Point2f) -> (Vector3f, Vector3f) {
        let phi = uv.x * TWO_PI;
        let theta = uv.y * PI;
        let (sin_phi, cos_phi) = (phi.sin(), phi.cos());
        let (sin_theta, cos_theta) = (theta.sin(), theta.cos());
        let dpdu = Vector3f::new(-sin_theta * sin_phi, sin_theta * cos_phi, 0.0) * TWO_PI * self.radius;
        let dpdv = Vector3f::new(cos_theta * cos_phi, cos_theta * sin_phi, -sin_theta) * PI * self.radius;
        (dpdu, dpdv)
    }
}

impl Shape for Sphere {
    fn primitive_count(&self) -> usize {
        1
    }

    fn primitive_bound(&self, _index: usize) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    fn intersect_primitive(&self, _index: usize, ray: &Ray) -> Option<PrimitiveHit> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let t0 = (-b - sqrt_d) / (2.0 * a);
        let t1 = (-b + sqrt_d) / (2.0 * a);
        let t = if t0 >= ray.t_min && t0 <= ray.t_max {
            t0
        } else if t1 >= ray.t_min && t1 <= ray.t_max {
            t1
        } else {
            return None;
        };

        let n = (ray.at(t) - self.center) / self.radius;
        Some(PrimitiveHit {
            t,
            uv: Self::direction_uv(&n),
            n,
        })
    }

    fn fill_interaction(&self, hit: &HitRecord, ray: &Ray) -> SurfaceInteraction {
        let p = ray.at(hit.t);
        let n = ((p - self.center) / self.radius).normalize();
        let (dpdu, dpdv) = self.derivatives(&hit.uv);
        let frame = Frame::from_normal_tangent(n, dpdu);
        SurfaceInteraction {
            p,
            n,
            frame,
            uv: hit.uv,
            dpdu,
            dpdv,
            wo: frame.to_local(&-ray.d),
            shape_index: hit.shape_index,
            primitive_index: hit.primitive_index,
            t: hit.t,
        }
    }

    fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    fn sample_position(&self, u: &Point2f) -> PositionSample {
        let n = uniform_sample_sphere(u);
        PositionSample {
            p: self.center + n * self.radius,
            n,
            uv: Self::direction_uv(&n),
            pdf: 1.0 / self.area(),
            delta: false,
        }
    }

    fn pdf_position(&self) -> Float {
        1.0 / self.area()
    }

    fn eval_parametric(&self, uv: &Point2f) -> Option<ParametricPoint> {
        let phi = uv.x * TWO_PI;
        let theta = uv.y * PI;
        let n = Vector3f::new(
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        );
        let (dpdu, dpdv) = self.derivatives(uv);
        Some(ParametricPoint {
            p: self.center + n * self.radius,
            n,
            dpdu,
            dpdv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn intersects_from_outside_and_inside() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 0.0), 1.0);
        let outside = Ray::new(
            Point3f::new(0.0, 0.0, -3.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        let hit = sphere.intersect_primitive(0, &outside).unwrap();
        assert!(approx_eq!(Float, hit.t, 2.0, epsilon = 1e-5));
        assert!((hit.n - Vector3f::new(0.0, 0.0, -1.0)).length() < 1e-4);

        let inside = Ray::new(
            Point3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        let hit = sphere.intersect_primitive(0, &inside).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn parametric_point_matches_hit_uv() {
        let sphere = Sphere::new(Point3f::new(1.0, 2.0, 3.0), 0.5);
        let ray = Ray::new(
            Point3f::new(1.0, 2.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        let hit = sphere.intersect_primitive(0, &ray).unwrap();
        let pp = sphere.eval_parametric(&hit.uv).unwrap();
        assert!((pp.p - ray.at(hit.t)).length() < 1e-4);
        assert!((pp.n - hit.n).length() < 1e-4);
    }

    #[test]
    fn parametric_derivatives_are_tangent() {
        let sphere = Sphere::new(Point3f::default(), 2.0);
        let uv = Point2f::new(0.3, 0.6);
        let pp = sphere.eval_parametric(&uv).unwrap();
        assert!(pp.n.dot(&pp.dpdu).abs() < 1e-4 * pp.dpdu.length());
        assert!(pp.n.dot(&pp.dpdv).abs() < 1e-4 * pp.dpdv.length());
        // |dpdu x dpdv| is the area Jacobian of the (u, v) parameterization;
        // integrating it over the unit square gives the sphere area.
        let jac = pp.dpdu.cross(&pp.dpdv).length();
        let theta = uv.y * PI;
        let expected = TWO_PI * PI * sphere.radius * sphere.radius * theta.sin();
        assert!((jac - expected).abs() < 1e-2 * expected);
    }

    #[test]
    fn sampled_positions_lie_on_the_surface() {
        let sphere = Sphere::new(Point3f::new(0.0, 1.0, 0.0), 3.0);
        let mut rng = rad_core::rng::Rng::new(9);
        for _ in 0..200 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let ps = sphere.sample_position(&u);
            assert!((ps.p.distance(&Point3f::new(0.0, 1.0, 0.0)) - 3.0).abs() < 1e-3);
            assert!((ps.pdf - 1.0 / sphere.area()).abs() < 1e-9);
        }
    }
}
