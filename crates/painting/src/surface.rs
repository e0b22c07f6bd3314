//! CPU paint surface - straight-alpha RGBA storage for one tier region

use glam::Vec2;

use crate::geometry::Rect;
use crate::types::{Color, TRANSPARENT};

/// A full-canvas RGBA surface holding the paint of one tier region
/// Stores pixels as [f32; 4] with straight (non-premultiplied) alpha
#[derive(Debug, Clone, PartialEq)]
pub struct PaintSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl PaintSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Overwrite this surface with the contents of another of the same size
    ///
    /// Returns false (and leaves the surface untouched) on a size mismatch.
    pub fn copy_from(&mut self, other: &PaintSurface) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        self.pixels.copy_from_slice(&other.pixels);
        true
    }

    /// True if no pixel carries any alpha
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p[3] <= 0.0)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Pixel under a canvas-space point
    pub fn sample(&self, point: Vec2) -> Option<Color> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        self.get_pixel(point.x as u32, point.y as u32)
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Composite a color over an existing pixel ("source over")
    /// `coverage` scales the source alpha
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        self.pixels[i] = blend_over(self.pixels[i], color, coverage);
    }

    /// Pixel-space rectangle covering `bounds`, clamped to the surface
    /// Returns (x_min, y_min, x_max, y_max) with exclusive maxima
    fn clamp_bounds(&self, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
        let x_min = (bounds.x.floor().max(0.0) as u32).min(self.width);
        let y_min = (bounds.y.floor().max(0.0) as u32).min(self.height);
        let x_max = (bounds.right().ceil().max(0.0) as u32).min(self.width);
        let y_max = (bounds.bottom().ceil().max(0.0) as u32).min(self.height);

        if x_min >= x_max || y_min >= y_max {
            return None;
        }
        Some((x_min, y_min, x_max, y_max))
    }

    /// Stamp an anti-aliased filled disk
    ///
    /// Pixels whose centers lie within `radius - 0.5` are fully covered;
    /// coverage falls off linearly over the one-pixel rim.
    /// Returns the number of pixels touched.
    pub fn stamp_disk(&mut self, center: Vec2, radius: f32, color: Color) -> usize {
        if radius <= 0.0 {
            return 0;
        }
        let reach = radius + 0.5;
        let bounds = Rect::new(center.x - reach, center.y - reach, reach * 2.0, reach * 2.0);
        let Some((x_min, y_min, x_max, y_max)) = self.clamp_bounds(bounds) else {
            return 0;
        };

        let mut touched = 0;
        for py in y_min..y_max {
            for px in x_min..x_max {
                let dist = pixel_center(px, py).distance(center);
                let coverage = (reach - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(px, py, color, coverage);
                    touched += 1;
                }
            }
        }
        touched
    }

    /// Overwrite every pixel inside `bounds` whose center satisfies `inside`
    pub fn fill_where(
        &mut self,
        bounds: Rect,
        color: Color,
        inside: impl Fn(Vec2) -> bool,
    ) -> usize {
        let Some((x_min, y_min, x_max, y_max)) = self.clamp_bounds(bounds) else {
            return 0;
        };

        let mut filled = 0;
        for py in y_min..y_max {
            for px in x_min..x_max {
                if inside(pixel_center(px, py)) {
                    self.set_pixel(px, py, color);
                    filled += 1;
                }
            }
        }
        filled
    }

    /// Blend `color` over every pixel inside `bounds` whose center satisfies `inside`
    pub fn blend_where(&mut self, bounds: Rect, color: Color, inside: impl Fn(Vec2) -> bool) {
        let Some((x_min, y_min, x_max, y_max)) = self.clamp_bounds(bounds) else {
            return;
        };

        for py in y_min..y_max {
            for px in x_min..x_max {
                if inside(pixel_center(px, py)) {
                    self.blend_pixel(px, py, color, 1.0);
                }
            }
        }
    }

    /// Composite another surface of the same size over this one
    ///
    /// Returns false (and leaves the surface untouched) on a size mismatch.
    pub fn blend_surface(&mut self, src: &PaintSurface) -> bool {
        if self.width != src.width || self.height != src.height {
            return false;
        }
        for (dst, &color) in self.pixels.iter_mut().zip(&src.pixels) {
            if color[3] > 0.0 {
                *dst = blend_over(*dst, color, 1.0);
            }
        }
        true
    }

    /// Quantized 8-bit RGBA copy of the pixel data, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| crate::types::color_to_rgba8(p))
            .collect()
    }

    /// Get raw pixel data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

/// Canvas-space center of a pixel
#[inline]
pub fn pixel_center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Straight-alpha "source over" compositing
#[inline]
fn blend_over(dst: Color, src: Color, coverage: f32) -> Color {
    let src_alpha = src[3] * coverage.clamp(0.0, 1.0);
    if src_alpha <= 0.0 {
        return dst;
    }
    let dst_weight = dst[3] * (1.0 - src_alpha);
    let out_alpha = src_alpha + dst_weight;
    if out_alpha <= 0.0 {
        return TRANSPARENT;
    }
    [
        (src[0] * src_alpha + dst[0] * dst_weight) / out_alpha,
        (src[1] * src_alpha + dst[1] * dst_weight) / out_alpha,
        (src[2] * src_alpha + dst[2] * dst_weight) / out_alpha,
        out_alpha,
    ]
}
