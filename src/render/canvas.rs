//! The drawing surface the pipeline renders into.
//!
//! The pipeline never touches pixels directly; it hands already-clipped
//! integer coordinates to a [`Canvas`]. [`FrameBuffer`](super::FrameBuffer)
//! is the in-memory implementation shipped with the crate.

use crate::error::RenderError;
use crate::math::vec2::Vec2;

/// An integer pixel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rounds a screen-space position to the nearest pixel.
    #[inline]
    pub fn from_vec2(v: Vec2) -> Self {
        Self::new(v.x.round() as i32, v.y.round() as i32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Clamps into a `width` x `height` raster.
    #[inline]
    pub fn clamped(self, width: u32, height: u32) -> Self {
        Self::new(
            self.x.clamp(0, width.saturating_sub(1) as i32),
            self.y.clamp(0, height.saturating_sub(1) as i32),
        )
    }
}

/// Raster capability consumed by the renderer.
///
/// One interface serves both color and monochrome targets; the renderer asks
/// [`is_color_mode`](Canvas::is_color_mode) once per primitive and picks the
/// matching color path.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resizes the raster. Contents are unspecified afterwards.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn is_color_mode(&self) -> bool;

    fn set_pixel(&mut self, x: i32, y: i32, color: u32);

    fn draw_line(&mut self, a: Point, b: Point, color: u32);

    /// Fills the axis-aligned rectangle with its top-left corner at `(x, y)`.
    fn block_fill(&mut self, x: i32, y: i32, width: u32, height: u32, color: u32);

    /// Fills a triangle. `transparency` 0 is opaque, 255 is invisible.
    fn fill_triangle(&mut self, points: [Point; 3], color: u32, transparency: u8);

    /// Fills a quadrilateral given in cyclic vertex order.
    fn fill_quad(&mut self, points: [Point; 4], color: u32, transparency: u8);
}
