//! Lighting used for patch shading.

use serde::{Deserialize, Serialize};

use crate::math::vec3::Vec3;

/// A directional light fixed relative to the viewer.
///
/// Shading is computed in camera space, so the light turns with the camera
/// and a maze keeps the same look from every heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    /// The direction the light travels (not where it comes from).
    pub direction: Vec3,
    /// Intensity floor for faces turned away from the light.
    pub ambient: f32,
}

impl Default for Light {
    /// Light coming from above, slightly to the left of and behind the viewer.
    fn default() -> Self {
        Self::new(Vec3::new(0.4, 0.8, -1.0), 0.25)
    }
}

impl Light {
    pub fn new(direction: Vec3, ambient: f32) -> Self {
        Light {
            direction: direction.try_normalize().unwrap_or(Vec3::FORWARD),
            ambient: ambient.clamp(0.0, 1.0),
        }
    }

    /// Intensity in `[ambient, 1.0]` for a face with the given (not
    /// necessarily unit) normal.
    ///
    /// A face is lit by its absolute angle to the light, so both sides of a
    /// two-sided patch shade the same. Degenerate normals are fully lit.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        let Some(normal) = normal.try_normalize() else {
            return 1.0;
        };
        let direction = self.direction.try_normalize().unwrap_or(Vec3::FORWARD);
        let lambert = direction.dot(normal).abs();
        self.ambient + (1.0 - self.ambient) * lambert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn face_square_to_the_light_is_fully_lit() {
        let light = Light::new(Vec3::new(0.0, 0.0, -1.0), 0.2);
        assert_relative_eq!(light.intensity(Vec3::new(0.0, 0.0, 1.0)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn grazing_face_gets_ambient_only() {
        let light = Light::new(Vec3::new(0.0, 0.0, -1.0), 0.2);
        assert_relative_eq!(light.intensity(Vec3::new(1.0, 0.0, 0.0)), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn angled_face() {
        let light = Light::new(Vec3::new(0.0, -1.0, 0.0), 0.0);
        let intensity = light.intensity(Vec3::new(0.0, 1.0, 1.0));
        assert!((intensity - 0.707).abs() < 0.01);
    }

    #[test]
    fn degenerate_normal_does_not_produce_nan() {
        let light = Light::default();
        assert_eq!(light.intensity(Vec3::ZERO), 1.0);
    }
}
