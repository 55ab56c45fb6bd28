//! In-memory raster implementing [`Canvas`].
//!
//! Pixels are packed `0xAARRGGBB`, row-major, top row first. A monochrome
//! frame buffer stores only black and white: every write is reduced with
//! [`colors::to_monochrome`].

use std::path::Path;

use super::canvas::{Canvas, Point};
use super::scanline;
use crate::colors;
use crate::error::RenderError;

pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
    color_mode: bool,
}

impl FrameBuffer {
    /// Allocates a color frame buffer cleared to black.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_mode(width, height, true)
    }

    pub fn monochrome(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_mode(width, height, false)
    }

    pub fn with_mode(width: u32, height: u32, color_mode: bool) -> Result<Self, RenderError> {
        let mut fb = Self {
            color_buffer: Vec::new(),
            width: 0,
            height: 0,
            color_mode,
        };
        fb.resize(width, height)?;
        Ok(fb)
    }

    pub fn clear(&mut self, color: u32) {
        let color = self.map_color(color);
        self.color_buffer.fill(color);
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color_buffer[i])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Raw pixel bytes in native byte order, as SDL's ARGB8888 textures
    /// expect them.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and a stricter alignment than u8; the
        // slice covers exactly the initialized buffer.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let color = self.color_buffer[(y * self.width + x) as usize];
            let (r, g, b) = colors::channels(color);
            image::Rgba([r, g, b, 255])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    #[inline]
    fn map_color(&self, color: u32) -> u32 {
        if self.color_mode {
            color
        } else {
            colors::to_monochrome(color)
        }
    }

    /// Writes one horizontal span, clipped to the raster.
    fn fill_span(&mut self, y: i32, x_start: i32, x_end: i32, color: u32, transparency: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let x_start = x_start.max(0);
        let x_end = x_end.min(self.width as i32 - 1);
        if x_start > x_end {
            return;
        }
        let row = (y as u32 * self.width) as usize;
        let span = &mut self.color_buffer[row + x_start as usize..=row + x_end as usize];
        if transparency == 0 {
            span.fill(color);
        } else {
            let color_mode = self.color_mode;
            for pixel in span {
                let mixed = colors::blend(color, *pixel, transparency);
                *pixel = if color_mode {
                    mixed
                } else {
                    colors::to_monochrome(mixed)
                };
            }
        }
    }
}

impl Canvas for FrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let size = (width as usize)
            .checked_mul(height as usize)
            .ok_or(RenderError::Allocation {
                what: "frame buffer",
                count: usize::MAX,
            })?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| RenderError::Allocation {
                what: "frame buffer",
                count: size,
            })?;
        buffer.resize(size, colors::BLACK);
        self.color_buffer = buffer;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn is_color_mode(&self) -> bool {
        self.color_mode
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.color_buffer[i] = self.map_color(color);
        }
    }

    /// Bresenham's line algorithm. Both endpoints are drawn.
    fn draw_line(&mut self, a: Point, b: Point, color: u32) {
        let color = self.map_color(color);
        let dx = (b.x - a.x).abs();
        let dy = (b.y - a.y).abs();
        let x_incr_direction = if a.x < b.x { 1 } else { -1 };
        let y_incr_direction = if a.y < b.y { 1 } else { -1 };

        // Positive error favors x movement, negative favors y.
        let mut err = dx - dy;
        let (mut x, mut y) = (a.x, a.y);

        loop {
            if let Some(i) = self.index(x, y) {
                self.color_buffer[i] = color;
            }
            if x == b.x && y == b.y {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    fn block_fill(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32) {
        let color = self.map_color(color);
        for row in y..y.saturating_add(height as i32) {
            self.fill_span(row, x, x.saturating_add(width as i32 - 1), color, 0);
        }
    }

    fn fill_triangle(&mut self, points: [Point; 3], color: u32, transparency: u8) {
        if transparency == u8::MAX {
            return;
        }
        let color = self.map_color(color);
        scanline::triangle_spans(points, |y, x0, x1| {
            self.fill_span(y, x0, x1, color, transparency)
        });
    }

    /// Splits along the 0-2 diagonal. The rows of the second triangle that
    /// overlap the first are skipped when blending so no pixel is mixed twice.
    fn fill_quad(&mut self, points: [Point; 4], color: u32, transparency: u8) {
        if transparency == u8::MAX {
            return;
        }
        let color = self.map_color(color);
        if transparency == 0 {
            scanline::triangle_spans([points[0], points[1], points[2]], |y, x0, x1| {
                self.fill_span(y, x0, x1, color, 0)
            });
            scanline::triangle_spans([points[0], points[2], points[3]], |y, x0, x1| {
                self.fill_span(y, x0, x1, color, 0)
            });
            return;
        }

        // Merge both halves into one span per row before blending.
        let top = points.iter().map(|p| p.y).min().unwrap_or(0);
        let bottom = points.iter().map(|p| p.y).max().unwrap_or(0);
        let rows = (bottom - top + 1).max(0) as usize;
        let mut spans: Vec<Option<(i32, i32)>> = vec![None; rows];
        let mut merge = |y: i32, x0: i32, x1: i32| {
            let slot = &mut spans[(y - top) as usize];
            *slot = Some(match *slot {
                Some((a, b)) => (a.min(x0), b.max(x1)),
                None => (x0, x1),
            });
        };
        scanline::triangle_spans([points[0], points[1], points[2]], &mut merge);
        scanline::triangle_spans([points[0], points[2], points[3]], &mut merge);
        for (offset, span) in spans.into_iter().enumerate() {
            if let Some((x0, x1)) = span {
                self.fill_span(top + offset as i32, x0, x1, color, transparency);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_buffer_is_black() {
        let fb = FrameBuffer::new(4, 3).unwrap();
        assert_eq!(fb.pixels().len(), 12);
        assert!(fb.pixels().iter().all(|&p| p == colors::BLACK));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(4, 4).unwrap();
        fb.set_pixel(-1, 0, colors::RED);
        fb.set_pixel(4, 0, colors::RED);
        assert!(fb.pixels().iter().all(|&p| p == colors::BLACK));
        assert_eq!(fb.get_pixel(4, 0), None);
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut fb = FrameBuffer::new(10, 10).unwrap();
        fb.draw_line(Point::new(1, 1), Point::new(8, 5), colors::WHITE);
        assert_eq!(fb.get_pixel(1, 1), Some(colors::WHITE));
        assert_eq!(fb.get_pixel(8, 5), Some(colors::WHITE));
        let lit = fb.pixels().iter().filter(|&&p| p == colors::WHITE).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn block_fill_is_clipped() {
        let mut fb = FrameBuffer::new(5, 5).unwrap();
        fb.block_fill(3, 3, 10, 10, colors::BLUE);
        let lit = fb.pixels().iter().filter(|&&p| p == colors::BLUE).count();
        assert_eq!(lit, 4);
    }

    #[test]
    fn quad_fill_covers_rectangle() {
        let mut fb = FrameBuffer::new(10, 10).unwrap();
        let quad = [
            Point::new(2, 2),
            Point::new(6, 2),
            Point::new(6, 5),
            Point::new(2, 5),
        ];
        fb.fill_quad(quad, colors::GREEN, 0);
        let lit = fb.pixels().iter().filter(|&&p| p == colors::GREEN).count();
        assert_eq!(lit, 5 * 4);
    }

    #[test]
    fn translucent_quad_blends_each_pixel_once() {
        let mut fb = FrameBuffer::new(10, 10).unwrap();
        fb.clear(colors::WHITE);
        let quad = [
            Point::new(2, 2),
            Point::new(6, 2),
            Point::new(6, 5),
            Point::new(2, 5),
        ];
        fb.fill_quad(quad, colors::BLACK, 128);
        let expected = colors::blend(colors::BLACK, colors::WHITE, 128);
        assert_eq!(fb.get_pixel(4, 3), Some(expected));
        assert_eq!(fb.get_pixel(2, 2), Some(expected));
        assert_eq!(fb.get_pixel(0, 0), Some(colors::WHITE));
    }

    #[test]
    fn fully_transparent_fill_draws_nothing() {
        let mut fb = FrameBuffer::new(10, 10).unwrap();
        let tri = [Point::new(0, 0), Point::new(9, 0), Point::new(0, 9)];
        fb.fill_triangle(tri, colors::RED, 255);
        assert!(fb.pixels().iter().all(|&p| p == colors::BLACK));
    }

    #[test]
    fn monochrome_stores_only_black_and_white() {
        let mut fb = FrameBuffer::monochrome(4, 4).unwrap();
        fb.set_pixel(0, 0, colors::YELLOW);
        fb.set_pixel(1, 0, colors::BLUE);
        assert!(!fb.is_color_mode());
        assert_eq!(fb.get_pixel(0, 0), Some(colors::WHITE));
        assert_eq!(fb.get_pixel(1, 0), Some(colors::BLACK));
    }

    #[test]
    fn resize_changes_dimensions() {
        let mut fb = FrameBuffer::new(2, 2).unwrap();
        fb.resize(7, 3).unwrap();
        assert_eq!((fb.width(), fb.height()), (7, 3));
        assert_eq!(fb.pixels().len(), 21);
    }
}
