//! Frame buffer.

use crate::common::*;
use crate::error::{Error, Result};
use crate::geometry::{Bounds2i, Point2i};
use crate::spectrum::Spectrum;
use log::info;
use std::sync::Mutex;

/// The floating-point frame buffer. Tiles accumulate privately and merge
/// their disjoint pixel ranges under a short lock; the buffer itself is only
/// read after rendering (or after a cooperative stop).
pub struct Film {
    /// Width in pixels.
    width: usize,

    /// Height in pixels.
    height: usize,

    /// Row-major pixel storage.
    pixels: Mutex<Vec<Spectrum>>,
}

impl Film {
    /// Create a black `Film`.
    ///
    /// * `width`  - Width in pixels.
    /// * `height` - Height in pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: Mutex::new(vec![Spectrum::ZERO; width * height]),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Full-frame pixel bounds.
    pub fn bounds(&self) -> Bounds2i {
        Bounds2i::new(
            Point2i::new(0, 0),
            Point2i::new(self.width as i32, self.height as i32),
        )
    }

    /// Create a private accumulation buffer for a tile.
    ///
    /// * `bounds` - The tile's pixel rectangle.
    pub fn tile(&self, bounds: Bounds2i) -> FilmTile {
        FilmTile {
            bounds,
            pixels: vec![Spectrum::ZERO; bounds.area()],
        }
    }

    /// Merge a finished tile. Tiles cover disjoint pixels, so merging simply
    /// overwrites the tile's range.
    ///
    /// * `tile` - The finished tile.
    pub fn merge_tile(&self, tile: &FilmTile) {
        let mut pixels = self.pixels.lock().unwrap();
        for (i, p) in tile.bounds.into_iter().enumerate() {
            pixels[p.y as usize * self.width + p.x as usize] = tile.pixels[i];
        }
    }

    /// Snapshot of the pixel data.
    pub fn to_vec(&self) -> Vec<Spectrum> {
        self.pixels.lock().unwrap().clone()
    }

    /// Read one pixel.
    ///
    /// * `x`, `y` - Pixel coordinates.
    pub fn pixel(&self, x: usize, y: usize) -> Spectrum {
        self.pixels.lock().unwrap()[y * self.width + x]
    }

    /// Serialize the frame buffer as an OpenEXR image.
    ///
    /// * `path` - Output path.
    pub fn save(&self, path: &str) -> Result<()> {
        info!("Writing image {path} with resolution {}x{}", self.width, self.height);
        let pixels = self.to_vec();
        let width = self.width;
        exr::prelude::write_rgb_file(path, self.width, self.height, |x, y| {
            let p = pixels[y * width + x];
            (p.r, p.g, p.b)
        })
        .map_err(|e| Error::Output(e.to_string()))
    }
}

/// A tile's private accumulation buffer.
pub struct FilmTile {
    /// The tile's pixel rectangle.
    pub bounds: Bounds2i,

    /// Row-major pixel storage local to the tile.
    pixels: Vec<Spectrum>,
}

impl FilmTile {
    /// Add a radiance sample to a pixel.
    ///
    /// * `p` - Pixel coordinate (within the tile's bounds).
    /// * `v` - Sample value.
    pub fn add_sample(&mut self, p: Point2i, v: Spectrum) {
        let local = p - self.bounds.p_min;
        let w = self.bounds.diagonal().x as usize;
        self.pixels[local.y as usize * w + local.x as usize] += v;
    }

    /// Scale a pixel by the reciprocal sample count once its samples are
    /// complete.
    ///
    /// * `p`     - Pixel coordinate.
    /// * `scale` - Reciprocal sample count.
    pub fn scale_pixel(&mut self, p: Point2i, scale: Float) {
        let local = p - self.bounds.p_min;
        let w = self.bounds.diagonal().x as usize;
        let px = &mut self.pixels[local.y as usize * w + local.x as usize];
        *px = *px * scale;
    }
}
