//! Viewer camera
//!
//! # Coordinate System
//!
//! World space is **Z-up**. After the camera transform:
//! - X: positive right
//! - Y: distance in front of the viewer (negative = behind)
//! - Z: positive up
//!
//! # Orientation
//!
//! - **Heading** θ: rotation of the X/Y plane about the vertical axis.
//!   At θ = 0 the camera looks along world +Y.
//! - **Pitch** φ: rotation of the Y/Z plane. Positive looks up.
//!
//! A [`Camera`] is a plain value read by every render call. Auto-aim does
//! not write back into it; the render call returns the effective camera
//! and the caller decides whether to keep the recomputed angles.

use serde::{Deserialize, Serialize};

use crate::math::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    /// Heading θ in radians.
    pub heading: f32,
    /// Pitch φ in radians.
    pub pitch: f32,
    /// Per-axis world scale applied after translation.
    pub axis_scale: Vec3,
    /// Projection scale in pixels per unit of `x / y`.
    pub projection_scale: f32,
    /// Horizon pixel row. `None` uses the vertical centre of the canvas.
    pub horizon: Option<f32>,
    /// Point the camera at the world origin before every render.
    pub auto_aim: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            heading: 0.0,
            pitch: 0.0,
            axis_scale: Vec3::ONE,
            projection_scale: 1.0,
            horizon: None,
            auto_aim: false,
        }
    }

    /// Creates a camera at `position` looking at the world origin.
    pub fn looking_at_origin(position: Vec3) -> Self {
        Self::new(position).aimed_at_origin()
    }

    pub fn with_projection_scale(mut self, scale: f32) -> Self {
        self.projection_scale = scale;
        self
    }

    /// Returns a copy whose heading and pitch point at the world origin.
    /// A camera sitting on the origin keeps its angles.
    pub fn aimed_at_origin(&self) -> Self {
        let direction = -self.position;
        let horizontal = (direction.x * direction.x + direction.y * direction.y).sqrt();
        let mut aimed = *self;
        if horizontal > f32::EPSILON {
            aimed.heading = direction.x.atan2(direction.y);
        }
        if direction.magnitude() > f32::EPSILON {
            aimed.pitch = direction.z.atan2(horizontal);
        }
        aimed
    }

    /// The camera a render call actually uses: aimed at the origin when
    /// `auto_aim` is set, otherwise unchanged.
    pub fn effective(&self) -> Self {
        if self.auto_aim {
            self.aimed_at_origin()
        } else {
            *self
        }
    }

    /// World-space unit vector pointing to the viewer's right.
    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.heading.sin_cos();
        Vec3::new(cos, -sin, 0.0)
    }

    /// World-space unit vector along the horizontal view direction.
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.heading.sin_cos();
        Vec3::new(sin, cos, 0.0)
    }

    /// Returns a copy moved by `offset` in world space.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            position: self.position + offset,
            ..*self
        }
    }

    /// The projector's horizon row for a canvas of the given height.
    pub fn horizon_row(&self, height: u32) -> f32 {
        self.horizon.unwrap_or(height as f32 / 2.0)
    }

    /// Row where the world's horizontal plane meets the sky at infinity,
    /// clamped to the canvas. This splits the sky and ground bands.
    pub fn background_horizon_row(&self, height: u32) -> f32 {
        let (sin, cos) = self.pitch.sin_cos();
        let shift = if cos.abs() > f32::EPSILON {
            self.projection_scale * sin / cos
        } else {
            f32::INFINITY.copysign(sin)
        };
        (self.horizon_row(height) + shift).clamp(0.0, height as f32)
    }
}

// =============================================================================
// Camera Controller
// =============================================================================

/// Viewer input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

/// Maps [`CameraInput`] to camera movement.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Turn speed in radians per second.
    pub turn_speed: f32,
    /// Zoom factor per second.
    pub zoom_rate: f32,
    pitch_limit: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_speed: 1.5,
            zoom_rate: 2.0,
            pitch_limit: 89.0_f32.to_radians(),
        }
    }
}

impl CameraController {
    pub fn new(move_speed: f32, turn_speed: f32) -> Self {
        Self {
            move_speed,
            turn_speed,
            ..Self::default()
        }
    }

    /// Returns the camera after applying `input` for `delta_time` seconds.
    pub fn update(&self, camera: &Camera, input: &CameraInput, delta_time: f32) -> Camera {
        let mut next = *camera;
        let step = self.move_speed * delta_time;
        let turn = self.turn_speed * delta_time;
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;

        next.heading = (next.heading + axis(input.turn_right, input.turn_left) * turn)
            .rem_euclid(std::f32::consts::TAU);
        next.pitch = (next.pitch + axis(input.look_up, input.look_down) * turn)
            .clamp(-self.pitch_limit, self.pitch_limit);

        next.position = next.position
            + next.forward() * (axis(input.forward, input.back) * step)
            + next.right() * (axis(input.right, input.left) * step)
            + Vec3::UP * (axis(input.up, input.down) * step);

        let zoom = axis(input.zoom_in, input.zoom_out);
        if zoom != 0.0 {
            next.projection_scale *= self.zoom_rate.powf(zoom * delta_time);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn aim_from_negative_y_looks_straight_ahead() {
        let camera = Camera::looking_at_origin(Vec3::new(0.0, -10.0, 0.0));
        assert_relative_eq!(camera.heading, 0.0);
        assert_relative_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn aim_from_above_looks_down() {
        let camera = Camera::looking_at_origin(Vec3::new(0.0, -10.0, 10.0));
        assert_relative_eq!(camera.pitch, -FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn aim_from_the_side_turns() {
        let camera = Camera::looking_at_origin(Vec3::new(-10.0, 0.0, 0.0));
        assert_relative_eq!(camera.heading, FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(camera.forward().x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn aim_at_origin_from_origin_keeps_angles() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.heading = 0.3;
        camera.pitch = 0.2;
        assert_eq!(camera.aimed_at_origin(), camera);
    }

    #[test]
    fn effective_leaves_manual_camera_alone() {
        let mut camera = Camera::new(Vec3::new(5.0, 5.0, 5.0));
        camera.heading = 1.0;
        assert_eq!(camera.effective(), camera);
        camera.auto_aim = true;
        assert_ne!(camera.effective().heading, 1.0);
    }

    #[test]
    fn right_is_perpendicular_to_forward() {
        let mut camera = Camera::default();
        camera.heading = 0.7;
        assert_relative_eq!(camera.right().dot(camera.forward()), 0.0, epsilon = 1e-6);
        camera.heading = 0.0;
        assert_eq!(camera.right(), Vec3::new(1.0, -0.0, 0.0));
    }

    #[test]
    fn looking_up_moves_background_horizon_down() {
        let mut camera = Camera::default().with_projection_scale(100.0);
        assert_relative_eq!(camera.background_horizon_row(200), 100.0);
        camera.pitch = 0.2;
        assert!(camera.background_horizon_row(200) > 100.0);
        camera.pitch = FRAC_PI_2;
        assert_relative_eq!(camera.background_horizon_row(200), 200.0);
    }

    #[test]
    fn controller_moves_along_heading() {
        let controller = CameraController::new(2.0, 1.0);
        let input = CameraInput {
            forward: true,
            ..Default::default()
        };
        let camera = controller.update(&Camera::default(), &input, 0.5);
        assert_relative_eq!(camera.position.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn controller_clamps_pitch() {
        let controller = CameraController::new(1.0, 10.0);
        let input = CameraInput {
            look_up: true,
            ..Default::default()
        };
        let camera = controller.update(&Camera::default(), &input, 1.0);
        assert!(camera.pitch < FRAC_PI_2);
    }
}
