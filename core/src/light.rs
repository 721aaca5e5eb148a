//! Light interface.

use crate::common::*;
use crate::error::Result;
use crate::geometry::{Point2f, Point3f, Vector3f};
use crate::interaction::SurfaceInteraction;
use crate::shape::PositionSample;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// The point (surface or medium) from which a light is being sampled.
#[derive(Copy, Clone, Debug)]
pub struct ReferencePoint {
    /// Position of the reference point.
    pub p: Point3f,

    /// Surface normal when the reference lies on a surface; `None` inside a
    /// medium.
    pub n: Option<Vector3f>,
}

impl ReferencePoint {
    /// Reference point on a surface.
    ///
    /// * `p` - Position.
    /// * `n` - Geometric normal.
    pub fn on_surface(p: Point3f, n: Vector3f) -> Self {
        Self { p, n: Some(n) }
    }

    /// Reference point inside a medium.
    ///
    /// * `p` - Position.
    pub fn in_medium(p: Point3f) -> Self {
        Self { p, n: None }
    }
}

/// A direction sampled toward a light. The density is in solid-angle measure
/// unless `delta` is set, in which case it is a Dirac measure: callers must
/// check `delta` before forming MIS weights and never divide by the density.
#[derive(Copy, Clone, Debug)]
pub struct DirectionSample {
    /// Unit direction from the reference point toward the sampled light point.
    pub wi: Vector3f,

    /// Distance to the sampled point (infinite for environment emitters).
    pub distance: Float,

    /// Density in solid-angle measure (or a Dirac marker when `delta`).
    pub pdf: Float,

    /// True when the density is a Dirac measure.
    pub delta: bool,
}

/// An emitter.
pub trait Light: Send + Sync {
    /// Emitted radiance toward the viewer at a point on the light's surface.
    /// Zero if the surface faces away or the light has no surface.
    ///
    /// * `si` - Interaction on the light's surface.
    /// * `w`  - World-space direction toward the viewer.
    fn eval(&self, _si: &SurfaceInteraction, _w: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Sample a direction from a reference point toward the light. Returns
    /// the sample and the incident radiance; a zero pdf with black radiance
    /// means no valid sample.
    ///
    /// * `r` - The reference point.
    /// * `u` - Uniform random sample.
    fn sample_direction(&self, r: &ReferencePoint, u: &Point2f) -> (DirectionSample, Spectrum);

    /// Density of `sample_direction` in solid-angle measure; 0 for delta
    /// lights (their density is not representable as an ordinary number).
    ///
    /// * `r`  - The reference point.
    /// * `ds` - A previously sampled (or externally produced) direction.
    fn pdf_direction(&self, r: &ReferencePoint, ds: &DirectionSample) -> Float;

    /// Sample a position on the light. Returns the sample and the position
    /// weight (emitted radiance or intensity divided by the density).
    ///
    /// * `u` - Uniform random sample.
    fn sample_position(&self, u: &Point2f) -> (PositionSample, Spectrum);

    /// Density of `sample_position` in area measure. Delta lights cannot
    /// express this as an ordinary density; asking is a programming error
    /// reported as `Error::Unsupported`.
    ///
    /// * `ps` - A previously sampled position.
    fn pdf_position(&self, ps: &PositionSample) -> Result<Float>;

    /// Returns true if every sample of this light has a Dirac density.
    fn is_delta(&self) -> bool {
        false
    }

    /// Returns true for infinite (environment) emitters.
    fn is_environment(&self) -> bool {
        false
    }

    /// Total emitted power, used for diagnostics.
    fn power(&self) -> Spectrum;
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light>;
