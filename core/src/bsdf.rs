//! BSDF interface.
//!
//! All directions are expressed in the local shading frame where the surface
//! normal is the z-axis, so `cos_theta(w) == w.z`. Reflection requires
//! `cos_theta > 0`; a BSDF rejects wrong-side directions by returning zero.

use crate::common::*;
use crate::geometry::{Point2f, Vector3f};
use crate::interaction::SurfaceInteraction;
use crate::spectrum::Spectrum;
use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// Lobe classification flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct LobeType: u32 {
        /// Diffuse lobe.
        const DIFFUSE = 1 << 0;

        /// Glossy (rough specular) lobe.
        const GLOSSY = 1 << 1;

        /// Dirac delta lobe; reachable only through `sample`.
        const DELTA = 1 << 2;

        /// Lobe scatters into the upper hemisphere.
        const REFLECTION = 1 << 3;

        /// Lobe scatters into the lower hemisphere.
        const TRANSMISSION = 1 << 4;

        /// Pass-through lobe that continues the ray unchanged (opacity masks).
        const NULL = 1 << 5;

        /// All lobes.
        const ALL = Self::DIFFUSE.bits()
            | Self::GLOSSY.bits()
            | Self::DELTA.bits()
            | Self::REFLECTION.bits()
            | Self::TRANSMISSION.bits()
            | Self::NULL.bits();
    }
}

/// Whether a path carries radiance (from lights) or importance (from the
/// camera). Needed for the non-reciprocal refraction radiance scaling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportMode {
    /// Light-to-camera transport.
    Radiance,

    /// Camera-to-light transport.
    Importance,
}

/// Per-call evaluation context.
#[derive(Copy, Clone, Debug)]
pub struct BsdfContext {
    /// Transport mode of the path being built.
    pub mode: TransportMode,

    /// Lobe types the caller currently accepts. A BSDF whose lobes are all
    /// excluded must return an invalid sample.
    pub accept: LobeType,
}

impl Default for BsdfContext {
    fn default() -> Self {
        Self {
            mode: TransportMode::Radiance,
            accept: LobeType::ALL,
        }
    }
}

impl BsdfContext {
    /// Context accepting every lobe in the given transport mode.
    ///
    /// * `mode` - Transport mode.
    pub fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            accept: LobeType::ALL,
        }
    }

    /// Restrict the accepted lobes.
    ///
    /// * `accept` - Accepted lobe types.
    pub fn with_accept(self, accept: LobeType) -> Self {
        Self { accept, ..self }
    }
}

/// Result of importance-sampling a BSDF. A non-positive `pdf` signals "no
/// valid sample"; the paired weight must then be treated as black.
#[derive(Copy, Clone, Debug)]
pub struct BsdfSample {
    /// Sampled incident direction in the local shading frame.
    pub wi: Vector3f,

    /// Density of the sample in solid-angle measure (Dirac lobes report the
    /// discrete lobe-selection probability).
    pub pdf: Float,

    /// Relative index of refraction of the sampled lobe (1 for reflection).
    pub eta: Float,

    /// Classification of the sampled lobe.
    pub lobe: LobeType,
}

impl BsdfSample {
    /// The invalid sample.
    pub const INVALID: Self = Self {
        wi: Vector3f::ZERO,
        pdf: 0.0,
        eta: 1.0,
        lobe: LobeType::empty(),
    };

    /// Returns true if the sample is usable.
    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0
    }
}

/// A material's scattering model.
pub trait Bsdf: Send + Sync {
    /// The union of lobe types this BSDF may produce.
    fn lobes(&self) -> LobeType;

    /// Importance-sample an incident direction for the viewer direction
    /// stored in `si`. Returns the sample and the sampled weight
    /// `f · |cos θi| / pdf` (delta lobes fold the Dirac terms away).
    ///
    /// * `ctx`    - Evaluation context.
    /// * `si`     - Surface interaction (carries `wo` in the local frame).
    /// * `u_lobe` - Uniform variate selecting among lobes.
    /// * `u_dir`  - Uniform variates for the direction.
    fn sample(
        &self,
        ctx: &BsdfContext,
        si: &SurfaceInteraction,
        u_lobe: Float,
        u_dir: &Point2f,
    ) -> (BsdfSample, Spectrum);

    /// Evaluate the BSDF value for a given incident direction. Zero for lobes
    /// containing a Dirac delta component.
    ///
    /// * `ctx` - Evaluation context.
    /// * `si`  - Surface interaction.
    /// * `wi`  - Incident direction in the local frame.
    fn eval(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Spectrum;

    /// Density of `sample` for a given incident direction in solid-angle
    /// measure. Zero for delta lobes.
    ///
    /// * `ctx` - Evaluation context.
    /// * `si`  - Surface interaction.
    /// * `wi`  - Incident direction in the local frame.
    fn pdf(&self, ctx: &BsdfContext, si: &SurfaceInteraction, wi: &Vector3f) -> Float;

    /// Returns true if every lobe contains a Dirac delta.
    fn is_delta_only(&self) -> bool {
        let lobes = self.lobes();
        lobes.contains(LobeType::DELTA)
            && !lobes.intersects(LobeType::DIFFUSE | LobeType::GLOSSY)
    }
}

/// Atomic reference counted `Bsdf`.
pub type ArcBsdf = Arc<dyn Bsdf>;
