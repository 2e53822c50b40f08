//! RGBA pixel buffer that the raster renderer draws into.
//!
//! Pixels are tightly packed in row-major order, four bytes each. Region
//! luminance is reduced with trueno, which picks SIMD where the host
//! supports it.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::Vector;

/// Row-major RGBA framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// `width * height * 4` bytes, `[R, G, B, A]` per pixel.
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a new, fully transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use bench_surface::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(1000, 1000).unwrap();
    /// assert_eq!(fb.width(), 1000);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let size = (width as usize) * (height as usize) * 4;
        Ok(Self { width, height, pixels: vec![0; size] })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of RGBA bytes.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = self.pixel_index(0, y);
        Some(&self.pixels[start..start + (self.width as usize) * 4])
    }

    /// Fill the whole buffer with one color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Fill a rectangular region. Coordinates are clamped to the buffer.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        if x >= x2 || y >= y2 {
            return;
        }

        for row_y in y..y2 {
            self.fill_span(row_y, x, x2, color);
        }
    }

    /// Fill pixels `[x0, x1)` of row `y`, clamped to the buffer.
    pub fn fill_span(&mut self, y: u32, x0: u32, x1: u32, color: Rgba) {
        if y >= self.height {
            return;
        }
        let x1 = x1.min(self.width);
        if x0 >= x1 {
            return;
        }

        let rgba = color.to_array();
        let start = self.pixel_index(x0, y);
        let end = self.pixel_index(x1, y);
        for chunk in self.pixels[start..end].chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Color at a pixel, `None` when out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Composite a color over a pixel ("over" operator).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let mix = |src: u8, dst: u8| -> u8 {
            let out = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            out.clamp(0.0, 255.0) as u8
        };

        self.pixels[idx] = mix(color.r, self.pixels[idx]);
        self.pixels[idx + 1] = mix(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = mix(color.b, self.pixels[idx + 2]);
        self.pixels[idx + 3] = (out_a * 255.0) as u8;
    }

    /// Mean Rec. 709 luminance (0-255) of the pixels in `[x0, x1) x [y0, y1)`.
    ///
    /// The region is clipped to the buffer; an empty region reads as black.
    #[must_use]
    pub fn mean_luminance(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> f32 {
        let (x1, y1) = (x1.min(self.width), y1.min(self.height));
        if x0 >= x1 || y0 >= y1 {
            return 0.0;
        }

        let mut luminances = Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
        for y in y0..y1 {
            let start = self.pixel_index(x0, y);
            let end = self.pixel_index(x1 - 1, y) + 4;
            luminances.extend(self.pixels[start..end].chunks_exact(4).map(|px| {
                0.2126 * f32::from(px[0]) + 0.7152 * f32::from(px[1]) + 0.0722 * f32::from(px[2])
            }));
        }

        Vector::from_vec(luminances).mean().unwrap_or(0.0)
    }

    /// Number of pixels that differ from `color`.
    #[must_use]
    pub fn count_not(&self, color: Rgba) -> usize {
        let rgba = color.to_array();
        self.pixels.chunks_exact(4).filter(|px| *px != rgba).count()
    }

    /// Pixel bytes ready for an encoder that expects tightly packed RGBA.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }
}
