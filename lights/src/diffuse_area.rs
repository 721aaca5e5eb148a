//! Diffuse area lights.

use log::warn;
use rad_core::common::*;
use rad_core::error::Result;
use rad_core::geometry::{Point2f, Ray, Vector3f};
use rad_core::interaction::SurfaceInteraction;
use rad_core::light::{DirectionSample, Light, ReferencePoint};
use rad_core::paramset::ParamSet;
use rad_core::sampling::Distribution2D;
use rad_core::shape::{pdf_area_to_solid_angle, ArcShape, PositionSample, PrimitiveHit};
use rad_core::spectrum::Spectrum;
use rad_core::texture::ArcTexture;

/// An area light emitting one-sided diffuse radiance from a shape's surface.
///
/// With a constant emission profile, positions are drawn uniformly by area.
/// When the profile is an image and the shape exposes a global
/// parameterization, a 2-D distribution over texel luminance importance
/// samples the bright regions instead; the density is carried back to area
/// measure through the parameterization's Jacobian `|∂p/∂u x ∂p/∂v|`.
pub struct DiffuseAreaLight {
    shape: ArcShape,
    radiance: ArcTexture,
    importance: Option<Distribution2D>,
}

impl DiffuseAreaLight {
    /// Create a new `DiffuseAreaLight`.
    ///
    /// * `shape`    - The emitting shape.
    /// * `radiance` - Emitted radiance profile.
    pub fn new(shape: ArcShape, radiance: ArcTexture) -> Self {
        let importance = match radiance.raster() {
            Some((width, height, pixels)) => {
                if shape.eval_parametric(&Point2f::new(0.5, 0.5)).is_none() {
                    warn!("emission profile ignored for importance sampling: shape has no global parameterization");
                    None
                } else {
                    let luminance: Vec<Float> = pixels.iter().map(|p| p.y().max(0.0)).collect();
                    if luminance.iter().sum::<Float>() > 0.0 {
                        Some(Distribution2D::new(&luminance, width, height))
                    } else {
                        None
                    }
                }
            }
            None => None,
        };
        Self {
            shape,
            radiance,
            importance,
        }
    }

    /// Create a `DiffuseAreaLight` from resolved parameters.
    ///
    /// * `params` - Resolved parameters.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        Ok(Self::new(
            params.require_shape("shape")?,
            params.require_texture("radiance")?,
        ))
    }

    /// The emitting shape.
    pub fn shape(&self) -> &ArcShape {
        &self.shape
    }

    /// Closest hit of a ray against the emitting shape itself.
    fn intersect_shape(&self, ray: &Ray) -> Option<PrimitiveHit> {
        let mut closest: Option<PrimitiveHit> = None;
        let mut r = *ray;
        for prim in 0..self.shape.primitive_count() {
            if let Some(hit) = self.shape.intersect_primitive(prim, &r) {
                r = r.clipped(hit.t);
                closest = Some(hit);
            }
        }
        closest
    }

    /// Area-measure density of the position sampler at a surface UV.
    fn pdf_area_at(&self, uv: &Point2f) -> Float {
        match &self.importance {
            Some(dist) => {
                let pdf_uv = dist.pdf(uv);
                match self.shape.eval_parametric(uv) {
                    Some(pp) => {
                        let jacobian = pp.dpdu.cross(&pp.dpdv).length();
                        if jacobian > 0.0 {
                            pdf_uv / jacobian
                        } else {
                            0.0
                        }
                    }
                    None => 0.0,
                }
            }
            None => self.shape.pdf_position(),
        }
    }

    /// Sample a position by the emission profile, falling back to uniform
    /// area sampling for constant profiles.
    fn sample_profile_position(&self, u: &Point2f) -> Option<PositionSample> {
        match &self.importance {
            Some(dist) => {
                let (uv, pdf_uv) = dist.sample_continuous(u);
                let pp = self.shape.eval_parametric(&uv)?;
                let jacobian = pp.dpdu.cross(&pp.dpdv).length();
                if pdf_uv <= 0.0 || jacobian <= 0.0 {
                    return None;
                }
                Some(PositionSample {
                    p: pp.p,
                    n: pp.n,
                    uv,
                    pdf: pdf_uv / jacobian,
                    delta: false,
                })
            }
            None => Some(self.shape.sample_position(u)),
        }
    }
}

impl Light for DiffuseAreaLight {
    fn eval(&self, si: &SurfaceInteraction, w: &Vector3f) -> Spectrum {
        // One-sided emission along the geometric normal.
        if si.n.dot(w) > 0.0 {
            self.radiance.evaluate(&si.uv)
        } else {
            Spectrum::ZERO
        }
    }

    fn sample_direction(&self, r: &ReferencePoint, u: &Point2f) -> (DirectionSample, Spectrum) {
        let invalid = (
            DirectionSample {
                wi: Vector3f::new(0.0, 0.0, 1.0),
                distance: 0.0,
                pdf: 0.0,
                delta: false,
            },
            Spectrum::ZERO,
        );
        let ps = match self.sample_profile_position(u) {
            Some(ps) => ps,
            None => return invalid,
        };
        let d = ps.p - r.p;
        let dist2 = d.length_squared();
        if dist2 <= 0.0 {
            return invalid;
        }
        let distance = dist2.sqrt();
        let wi = d / distance;

        let pdf = pdf_area_to_solid_angle(ps.pdf, &r.p, &ps.p, &ps.n);
        if pdf <= 0.0 {
            return invalid;
        }
        // The sampled point emits toward the reference only when it faces it.
        let radiance = if ps.n.dot(&-wi) > 0.0 {
            self.radiance.evaluate(&ps.uv)
        } else {
            Spectrum::ZERO
        };
        (
            DirectionSample {
                wi,
                distance,
                pdf,
                delta: false,
            },
            radiance,
        )
    }

    fn pdf_direction(&self, r: &ReferencePoint, ds: &DirectionSample) -> Float {
        let ray = Ray::new(r.p, ds.wi, 1e-4, INFINITY);
        match self.intersect_shape(&ray) {
            Some(hit) => {
                let p = ray.at(hit.t);
                pdf_area_to_solid_angle(self.pdf_area_at(&hit.uv), &r.p, &p, &hit.n)
            }
            None => 0.0,
        }
    }

    fn sample_position(&self, u: &Point2f) -> (PositionSample, Spectrum) {
        match self.sample_profile_position(u) {
            Some(ps) if ps.pdf > 0.0 => {
                let weight = self.radiance.evaluate(&ps.uv) / ps.pdf;
                (ps, weight)
            }
            _ => (
                PositionSample {
                    p: rad_core::geometry::Point3f::default(),
                    n: Vector3f::new(0.0, 0.0, 1.0),
                    uv: Point2f::default(),
                    pdf: 0.0,
                    delta: false,
                },
                Spectrum::ZERO,
            ),
        }
    }

    fn pdf_position(&self, ps: &PositionSample) -> Result<Float> {
        Ok(self.pdf_area_at(&ps.uv))
    }

    fn power(&self) -> Spectrum {
        self.radiance.average() * self.shape.area() * PI
    }
}
