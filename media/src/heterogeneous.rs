//! Heterogeneous grid media.

use rad_core::common::*;
use rad_core::error::{Error, Result};
use rad_core::geometry::{Bounds3f, Frame, Point3f, Ray, Transform};
use rad_core::interaction::MediumInteraction;
use rad_core::medium::{cancel_tr_pdf, HenyeyGreenstein, Medium};
use rad_core::paramset::ParamSet;
use rad_core::spectrum::Spectrum;
use std::sync::Arc;

/// A density grid filling the unit cube of its medium space, scaled into the
/// scene by an affine transform. Extinction varies as `density · σt`; the
/// majorant is the grid maximum, and the gap to the local extinction shows up
/// as the null-collision coefficient during tracking.
pub struct GridMedium {
    sigma_s: Spectrum,
    sigma_t: Spectrum,
    density: Arc<Vec<Float>>,
    nx: usize,
    ny: usize,
    nz: usize,
    world_to_medium: Transform,
    majorant: Spectrum,
    phase: HenyeyGreenstein,
}

impl GridMedium {
    /// Create a new `GridMedium`.
    ///
    /// * `sigma_a`         - Absorption coefficient at unit density.
    /// * `sigma_s`         - Scattering coefficient at unit density.
    /// * `g`               - Phase asymmetry parameter.
    /// * `density`         - Density samples, x-major then y then z.
    /// * `nx`, `ny`, `nz`  - Grid resolution.
    /// * `medium_to_world` - Placement of the unit cube in the scene.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sigma_a: Spectrum,
        sigma_s: Spectrum,
        g: Float,
        density: Arc<Vec<Float>>,
        nx: usize,
        ny: usize,
        nz: usize,
        medium_to_world: Transform,
    ) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 || density.len() != nx * ny * nz {
            return Err(Error::InvalidData(format!(
                "density grid size mismatch: {}x{}x{} with {} samples",
                nx,
                ny,
                nz,
                density.len()
            )));
        }
        let sigma_t = sigma_a + sigma_s;
        let max_density = density.iter().cloned().fold(0.0, Float::max);
        if max_density <= 0.0 {
            return Err(Error::InvalidData("density grid is empty".to_string()));
        }
        Ok(Self {
            sigma_s,
            sigma_t,
            density,
            nx,
            ny,
            nz,
            world_to_medium: medium_to_world.inverse(),
            majorant: sigma_t * max_density,
            phase: HenyeyGreenstein::new(g),
        })
    }

    /// Create a `GridMedium` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Self::new(
            params.find_one_spectrum("sigma_a", Spectrum::splat(0.1)),
            params.find_one_spectrum("sigma_s", Spectrum::splat(0.5)),
            params.find_one_float("g", 0.0),
            params.require_floats("density")?,
            params.find_one_int("nx", 1) as usize,
            params.find_one_int("ny", 1) as usize,
            params.find_one_int("nz", 1) as usize,
            params.find_one_transform("to_world"),
        )
    }

    fn lattice(&self, x: usize, y: usize, z: usize) -> Float {
        let x = x.min(self.nx - 1);
        let y = y.min(self.ny - 1);
        let z = z.min(self.nz - 1);
        self.density[(z * self.ny + y) * self.nx + x]
    }

    /// Trilinearly filtered density at a medium-space point; zero outside the
    /// unit cube.
    fn density_at(&self, q: &Point3f) -> Float {
        if !(0.0..=1.0).contains(&q.x) || !(0.0..=1.0).contains(&q.y) || !(0.0..=1.0).contains(&q.z)
        {
            return 0.0;
        }
        let gx = q.x * self.nx as Float - 0.5;
        let gy = q.y * self.ny as Float - 0.5;
        let gz = q.z * self.nz as Float - 0.5;
        let x0 = gx.floor().max(0.0) as usize;
        let y0 = gy.floor().max(0.0) as usize;
        let z0 = gz.floor().max(0.0) as usize;
        let dx = clamp(gx - x0 as Float, 0.0, 1.0);
        let dy = clamp(gy - y0 as Float, 0.0, 1.0);
        let dz = clamp(gz - z0 as Float, 0.0, 1.0);

        let lerp2 = |z: usize| {
            let d00 = lerp(dx, self.lattice(x0, y0, z), self.lattice(x0 + 1, y0, z));
            let d10 = lerp(dx, self.lattice(x0, y0 + 1, z), self.lattice(x0 + 1, y0 + 1, z));
            lerp(dy, d00, d10)
        };
        lerp(dz, lerp2(z0), lerp2(z0 + 1))
    }

    fn to_medium_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.world_to_medium.transform_point(&ray.o),
            self.world_to_medium.transform_vector(&ray.d),
            ray.t_min,
            ray.t_max,
        )
    }
}

impl Medium for GridMedium {
    fn intersect_bound(&self, ray: &Ray) -> Option<(Float, Float)> {
        // The affine map preserves the ray parameter, so the medium-space
        // interval is valid on the world-space ray as well.
        let unit = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0));
        unit.intersect_interval(&self.to_medium_ray(ray))
    }

    fn majorant(&self) -> Spectrum {
        self.majorant
    }

    fn coefficients(&self, p: &Point3f) -> (Spectrum, Spectrum, Spectrum) {
        let d = self.density_at(&self.world_to_medium.transform_point(p));
        let sigma_t = self.sigma_t * d;
        (self.sigma_s * d, self.majorant - sigma_t, sigma_t)
    }

    fn sample_interaction(&self, ray: &Ray, u: Float, channel: usize) -> Option<MediumInteraction> {
        let (t_min, t_max) = self.intersect_bound(ray)?;
        let m = self.majorant[channel];
        if m <= 0.0 {
            return None;
        }
        let t = t_min - (1.0 - u).ln() / m;
        if t >= t_max {
            return None;
        }
        let p = ray.at(t);
        let (sigma_s, sigma_n, sigma_t) = self.coefficients(&p);
        Some(MediumInteraction {
            p,
            frame: Frame::from_normal(-ray.d),
            sigma_s,
            sigma_n,
            sigma_t,
            majorant: self.majorant,
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
        let tr = (-(self.majorant * dt)).exp();
        let pdf = if mi.t < surface_t {
            self.majorant * tr
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

    fn constant_grid(sigma_t: Float) -> GridMedium {
        GridMedium::new(
            Spectrum::splat(sigma_t / 2.0),
            Spectrum::splat(sigma_t / 2.0),
            0.0,
            Arc::new(vec![1.0; 8]),
            2,
            2,
            2,
            Transform::default(),
        )
        .unwrap()
    }

    #[test]
    fn rays_outside_the_grid_never_scatter() {
        let m = constant_grid(5.0);
        let miss = Ray::new(
            Point3f::new(2.0, 2.0, -1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        assert!(m.intersect_bound(&miss).is_none());
        assert!(m.sample_interaction(&miss, 0.5, 0).is_none());
    }

    #[test]
    fn constant_grid_matches_homogeneous_escape_rate() {
        let sigma_t = 3.0;
        let m = constant_grid(sigma_t);
        let ray = Ray::new(
            Point3f::new(0.5, 0.5, -1.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        let mut rng = Rng::new(303);
        let draws = 50_000;
        let mut escapes = 0usize;
        for _ in 0..draws {
            match m.sample_interaction(&ray, rng.uniform_float(), 0) {
                Some(mi) => {
                    // Inside the unit-density grid there are no null collisions.
                    assert!(mi.sigma_n.max_channel() < 1e-5);
                    assert!(mi.t > 1.0 && mi.t < 2.0);
                }
                None => escapes += 1,
            }
        }
        let escape = escapes as Float / draws as Float;
        let expected = (-sigma_t).exp();
        assert!((escape - expected).abs() < 0.01, "escape = {escape}");
    }

    #[test]
    fn null_coefficient_tracks_the_density_gap() {
        // Two density levels: the majorant follows the peak, the thin half
        // carries the difference as null collisions.
        let m = GridMedium::new(
            Spectrum::splat(0.0),
            Spectrum::splat(2.0),
            0.0,
            Arc::new(vec![0.5, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0, 1.0]),
            2,
            2,
            2,
            Transform::default(),
        )
        .unwrap();
        assert!((m.majorant().r - 2.0).abs() < 1e-5);
        // Deep inside the thin half (z near 0).
        let (sigma_s, sigma_n, sigma_t) = m.coefficients(&Point3f::new(0.5, 0.5, 0.1));
        assert!((sigma_t.r - 1.0).abs() < 0.2);
        assert!((sigma_s.r + sigma_n.r - 2.0).abs() < 1e-4);
    }

    #[test]
    fn transform_places_the_grid() {
        let m = GridMedium::new(
            Spectrum::splat(0.5),
            Spectrum::splat(0.5),
            0.0,
            Arc::new(vec![1.0; 8]),
            2,
            2,
            2,
            Transform::translate(Vector3f::new(10.0, 0.0, 0.0)),
        )
        .unwrap();
        let ray = Ray::new(
            Point3f::new(10.5, 0.5, -5.0),
            Vector3f::new(0.0, 0.0, 1.0),
            0.0,
            INFINITY,
        );
        let (t0, t1) = m.intersect_bound(&ray).unwrap();
        assert!((t0 - 5.0).abs() < 1e-4 && (t1 - 6.0).abs() < 1e-4);
    }

    #[test]
    fn rejects_mismatched_grids() {
        assert!(GridMedium::new(
            Spectrum::ONE,
            Spectrum::ONE,
            0.0,
            Arc::new(vec![1.0; 7]),
            2,
            2,
            2,
            Transform::default(),
        )
        .is_err());
    }
}
