//! Pixel sampler interface.

use crate::common::*;
use crate::geometry::Point2f;

/// Supplies decorrelated pseudo-random numbers to an estimator. A sampler
/// instance is never shared across workers; every tile worker clones the
/// scene's prototype with a seed derived from the tile's pixel-space origin,
/// making results reproducible for a fixed tile partition regardless of
/// scheduling order.
pub trait Sampler: Send + Sync {
    /// Returns the next sample value in `[0, 1)`.
    fn next_1d(&mut self) -> Float;

    /// Returns the next two sample values in `[0, 1)²`.
    fn next_2d(&mut self) -> Point2f {
        let x = self.next_1d();
        let y = self.next_1d();
        Point2f::new(x, y)
    }

    /// Create an independent instance seeded for a new worker.
    ///
    /// * `seed` - The derived per-worker seed.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler>;

    /// Re-seed this instance.
    ///
    /// * `seed` - The new seed.
    fn set_seed(&mut self, seed: u64);
}

// Allow `Box<dyn Sampler>` wherever `&mut dyn Sampler` is used.
impl<S: Sampler + ?Sized> Sampler for Box<S> {
    #[inline]
    fn next_1d(&mut self) -> Float {
        (**self).next_1d()
    }

    #[inline]
    fn next_2d(&mut self) -> Point2f {
        (**self).next_2d()
    }

    #[inline]
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        (**self).clone_sampler(seed)
    }

    #[inline]
    fn set_seed(&mut self, seed: u64) {
        (**self).set_seed(seed);
    }
}
