//! Rays.

use super::point::Point3f;
use super::vector3::Vector3f;
use crate::common::*;

/// A ray with a parametric `[t_min, t_max]` interval. Constructed per query
/// and never mutated.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction (unit length for all rays the renderer constructs).
    pub d: Vector3f,

    /// Parametric start of the valid interval.
    pub t_min: Float,

    /// Parametric end of the valid interval.
    pub t_max: Float,
}

impl Ray {
    /// Create a new `Ray`.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_min` - Parametric start of the valid interval.
    /// * `t_max` - Parametric end of the valid interval.
    pub fn new(o: Point3f, d: Vector3f, t_min: Float, t_max: Float) -> Self {
        Self { o, d, t_min, t_max }
    }

    /// Returns the position at parameter `t`.
    ///
    /// * `t` - The ray parameter.
    #[inline]
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns a copy with a shortened `t_max`.
    ///
    /// * `t_max` - New parametric end.
    pub fn clipped(&self, t_max: Float) -> Self {
        Self { t_max, ..*self }
    }
}
