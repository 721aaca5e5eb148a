//! Renderer interface.

use crate::geometry::Ray;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// A per-ray radiance estimator. The tile-parallel integration loop drives
/// the estimator; variants differ only in what they compute per camera ray.
pub trait Renderer: Send + Sync {
    /// Estimate the radiance arriving along a camera ray.
    ///
    /// * `ray`     - The camera ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The worker's sampler.
    fn li(&self, ray: &Ray, scene: &Scene, sampler: &mut dyn Sampler) -> Spectrum;
}

/// Atomic reference counted `Renderer`.
pub type ArcRenderer = Arc<dyn Renderer>;
