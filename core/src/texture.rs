//! Textures.
//!
//! Image pixels arrive already decoded from the external asset layer; the
//! core never parses file formats.

use crate::common::*;
use crate::error::{Error, Result};
use crate::geometry::Point2f;
use crate::spectrum::Spectrum;
use std::sync::Arc;

/// Texture interface evaluated at a surface UV.
pub trait Texture: Send + Sync {
    /// Evaluate the texture at a UV coordinate.
    ///
    /// * `uv` - Texture coordinate.
    fn evaluate(&self, uv: &Point2f) -> Spectrum;

    /// Average value over the texture's domain.
    fn average(&self) -> Spectrum;

    /// Returns the raster `(width, height, pixels)` for image-backed
    /// textures, `None` for procedural/constant ones. Lights use this to
    /// build emission importance tables.
    fn raster(&self) -> Option<(usize, usize, &[Spectrum])> {
        None
    }
}

/// Atomic reference counted `Texture`.
pub type ArcTexture = Arc<dyn Texture>;

/// A texture with a single value everywhere.
pub struct ConstantTexture {
    /// The value.
    value: Spectrum,
}

impl ConstantTexture {
    /// Create a new `ConstantTexture`.
    ///
    /// * `value` - The value.
    pub fn new(value: Spectrum) -> Self {
        Self { value }
    }
}

impl Texture for ConstantTexture {
    fn evaluate(&self, _uv: &Point2f) -> Spectrum {
        self.value
    }

    fn average(&self) -> Spectrum {
        self.value
    }
}

/// A bilinearly filtered image texture over pre-decoded pixels.
pub struct ImageTexture {
    /// Width in texels.
    width: usize,

    /// Height in texels.
    height: usize,

    /// Row-major texel values, row 0 at v = 0.
    pixels: Vec<Spectrum>,
}

impl ImageTexture {
    /// Create a new `ImageTexture` from decoded pixel data.
    ///
    /// * `width`  - Width in texels.
    /// * `height` - Height in texels.
    /// * `pixels` - Row-major texel values.
    pub fn new(width: usize, height: usize, pixels: Vec<Spectrum>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(Error::InvalidData(format!(
                "image texture size mismatch: {}x{} with {} texels",
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    fn texel(&self, x: usize, y: usize) -> Spectrum {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}

impl Texture for ImageTexture {
    fn evaluate(&self, uv: &Point2f) -> Spectrum {
        // Wrap into [0, 1) and bilinearly filter.
        let u = uv.x - uv.x.floor();
        let v = uv.y - uv.y.floor();
        let x = u * self.width as Float - 0.5;
        let y = v * self.height as Float - 0.5;
        let x0 = x.floor().max(0.0) as usize;
        let y0 = y.floor().max(0.0) as usize;
        let dx = clamp(x - x0 as Float, 0.0, 1.0);
        let dy = clamp(y - y0 as Float, 0.0, 1.0);
        let top = self.texel(x0, y0) * (1.0 - dx) + self.texel(x0 + 1, y0) * dx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - dx) + self.texel(x0 + 1, y0 + 1) * dx;
        top * (1.0 - dy) + bottom * dy
    }

    fn average(&self) -> Spectrum {
        let mut sum = Spectrum::ZERO;
        for p in &self.pixels {
            sum += *p;
        }
        sum / self.pixels.len() as Float
    }

    fn raster(&self) -> Option<(usize, usize, &[Spectrum])> {
        Some((self.width, self.height, &self.pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_texture_rejects_size_mismatch() {
        assert!(ImageTexture::new(2, 2, vec![Spectrum::ONE; 3]).is_err());
        assert!(ImageTexture::new(2, 2, vec![Spectrum::ONE; 4]).is_ok());
    }

    #[test]
    fn bilinear_lookup_at_texel_centers() {
        let pixels = vec![
            Spectrum::splat(0.0),
            Spectrum::splat(1.0),
            Spectrum::splat(2.0),
            Spectrum::splat(3.0),
        ];
        let tex = ImageTexture::new(2, 2, pixels).unwrap();
        let v = tex.evaluate(&Point2f::new(0.25, 0.25));
        assert!((v.r - 0.0).abs() < 1e-5);
        let v = tex.evaluate(&Point2f::new(0.75, 0.75));
        assert!((v.r - 3.0).abs() < 1e-5);
        assert!((tex.average().r - 1.5).abs() < 1e-5);
    }
}
