//! Tri-channel RGB radiance values.

use crate::common::*;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub};

/// Number of color channels.
pub const SPECTRUM_CHANNELS: usize = 3;

/// An RGB radiance/reflectance value. Color is tri-channel throughout; there
/// is no wavelength-resolved representation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    /// Red channel.
    pub r: Float,

    /// Green channel.
    pub g: Float,

    /// Blue channel.
    pub b: Float,
}

impl Spectrum {
    /// Black.
    pub const ZERO: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// White (unit reflectance).
    pub const ONE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a spectrum with all channels set to the same value.
    ///
    /// * `v` - Channel value.
    pub const fn splat(v: Float) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Create a spectrum from its channels.
    ///
    /// * `r`, `g`, `b` - Channel values.
    pub const fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b }
    }

    /// Returns true if all channels are zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Returns true if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    /// Returns true if every channel is finite and non-negative. The tile
    /// loop drops samples failing this check.
    pub fn is_valid(&self) -> bool {
        let ok = |v: Float| v.is_finite() && v >= 0.0;
        ok(self.r) && ok(self.g) && ok(self.b)
    }

    /// Returns the luminance (CIE Y with sRGB weights).
    pub fn y(&self) -> Float {
        0.212671 * self.r + 0.715160 * self.g + 0.072169 * self.b
    }

    /// Returns the largest channel value.
    pub fn max_channel(&self) -> Float {
        self.r.max(self.g).max(self.b)
    }

    /// Returns the average of the channels.
    pub fn average(&self) -> Float {
        (self.r + self.g + self.b) / SPECTRUM_CHANNELS as Float
    }

    /// Component-wise `e^x`.
    pub fn exp(&self) -> Self {
        Self::new(self.r.exp(), self.g.exp(), self.b.exp())
    }

    /// Component-wise square root.
    pub fn sqrt(&self) -> Self {
        Self::new(self.r.sqrt(), self.g.sqrt(), self.b.sqrt())
    }

    /// Component-wise clamp to non-negative values.
    pub fn clamp_zero(&self) -> Self {
        Self::new(self.r.max(0.0), self.g.max(0.0), self.b.max(0.0))
    }
}

impl Add for Spectrum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Spectrum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul for Spectrum {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Float> for Spectrum {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<Spectrum> for Float {
    type Output = Spectrum;

    fn mul(self, rhs: Spectrum) -> Spectrum {
        rhs * self
    }
}

impl Div for Spectrum {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.r / rhs.r, self.g / rhs.g, self.b / rhs.b)
    }
}

impl Div<Float> for Spectrum {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        let inv = 1.0 / rhs;
        self * inv
    }
}

impl DivAssign<Float> for Spectrum {
    fn div_assign(&mut self, rhs: Float) {
        *self = *self / rhs;
    }
}

impl Neg for Spectrum {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.r, -self.g, -self.b)
    }
}

impl Index<usize> for Spectrum {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        match index {
            0 => &self.r,
            1 => &self.g,
            _ => &self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_rejects_nan_inf_and_negative() {
        assert!(Spectrum::new(0.1, 0.2, 0.3).is_valid());
        assert!(!Spectrum::new(Float::NAN, 0.0, 0.0).is_valid());
        assert!(!Spectrum::new(INFINITY, 0.0, 0.0).is_valid());
        assert!(!Spectrum::new(-0.01, 0.0, 0.0).is_valid());
    }

    #[test]
    fn luminance_of_white_is_one() {
        assert!((Spectrum::ONE.y() - 1.0).abs() < 1e-5);
    }
}
