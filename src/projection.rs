//! Perspective projection from camera space to screen pixels.
//!
//! ```text
//! h = center_x + scale * x / max(y, 1)
//! v = horizon  - scale * z / max(y, 1)
//! ```
//!
//! Y is floored at 1 so points on the camera plane do not blow up, and the
//! result is clamped to ±[`COORD_LIMIT`] before anything casts it to
//! integer pixels.

use crate::camera::Camera;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::render::canvas::Point;

pub const COORD_LIMIT: f32 = 32000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub center_x: f32,
    pub horizon: f32,
    pub scale: f32,
}

impl Projector {
    pub fn new(center_x: f32, horizon: f32, scale: f32) -> Self {
        Self {
            center_x,
            horizon,
            scale,
        }
    }

    /// Projector for a camera drawing into a `width` x `height` raster.
    pub fn for_camera(camera: &Camera, width: u32, height: u32) -> Self {
        Self::new(
            width as f32 / 2.0,
            camera.horizon_row(height),
            camera.projection_scale,
        )
    }

    #[inline]
    pub fn project(&self, p: Vec3) -> Vec2 {
        let depth = p.y.max(1.0);
        let h = self.center_x + self.scale * p.x / depth;
        let v = self.horizon - self.scale * p.z / depth;
        Vec2::new(clamp_coord(h, self.center_x), clamp_coord(v, self.horizon))
    }

    #[inline]
    pub fn project_to_pixel(&self, p: Vec3) -> Point {
        Point::from_vec2(self.project(p))
    }
}

/// Clamps to the representable range; NaN falls back to `fallback`.
#[inline]
fn clamp_coord(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(-COORD_LIMIT, COORD_LIMIT)
    }
}
