//! Near-plane clipping in camera space.
//!
//! Camera-space Y is the distance in front of the viewer, so the near plane
//! is `y = 0`. Lines crossing it are shortened; patches touching the space
//! behind it are dropped whole. This is not a general polygon clipper.

use crate::geometry::{LineSegment, Patch};
use crate::math::vec3::Vec3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NearClipper {
    /// Subtracted from Z of every surviving point.
    pub depth_bias: f32,
    /// Keep patches that face away from the viewer.
    pub two_sided: bool,
}

impl NearClipper {
    pub fn new(depth_bias: f32, two_sided: bool) -> Self {
        Self {
            depth_bias,
            two_sided,
        }
    }

    /// Clips a camera-space line against `y = 0`.
    ///
    /// Returns `None` when both endpoints are behind the viewer. If exactly
    /// one is behind, it slides along the segment to `y = 0`.
    pub fn clip_line(&self, a: Vec3, b: Vec3) -> Option<(Vec3, Vec3)> {
        let (a, b) = match (a.y < 0.0, b.y < 0.0) {
            (true, true) => return None,
            (false, false) => (a, b),
            (true, false) => (Self::to_plane(a, b), b),
            (false, true) => (a, Self::to_plane(b, a)),
        };
        Some((self.bias(a), self.bias(b)))
    }

    pub fn clip_segment(&self, segment: &LineSegment) -> Option<LineSegment> {
        self.clip_line(segment.start, segment.end)
            .map(|(start, end)| LineSegment::new(start, end, segment.color))
    }

    /// Moves `behind` (y < 0) along the segment towards `front` (y >= 0)
    /// until it reaches `y = 0`.
    fn to_plane(behind: Vec3, front: Vec3) -> Vec3 {
        let t = behind.y / (behind.y - front.y);
        let mut p = behind.lerp(front, t);
        p.y = 0.0;
        p
    }

    #[inline]
    fn bias(&self, mut p: Vec3) -> Vec3 {
        p.z -= self.depth_bias;
        p
    }

    /// Whether the face normal points away from a viewer at the origin.
    pub fn is_back_facing(patch: &Patch) -> bool {
        patch.normal().dot(patch.vertices()[0].position) > 0.0
    }

    /// Decides whether a camera-space patch survives.
    ///
    /// A surviving patch gets its sort key (mean squared distance of its
    /// vertices) stored and the depth bias applied to its vertices.
    pub fn clip_patch(&self, patch: &mut Patch) -> bool {
        if patch.vertices().iter().any(|v| v.position.y < 0.0) {
            return false;
        }
        if !self.two_sided && Self::is_back_facing(patch) {
            return false;
        }

        let count = patch.vertices().len() as f32;
        patch.depth = patch
            .vertices()
            .iter()
            .map(|v| v.position.magnitude_squared())
            .sum::<f32>()
            / count;

        for v in patch.vertices_mut() {
            v.position = self.bias(v.position);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::geometry::Vertex;
    use approx::assert_relative_eq;

    fn patch(points: [(f32, f32, f32); 3]) -> Patch {
        let v = |(x, y, z): (f32, f32, f32)| Vertex::new(Vec3::new(x, y, z), false);
        Patch::triangle([v(points[0]), v(points[1]), v(points[2])], colors::RED)
    }

    #[test]
    fn endpoint_behind_viewer_moves_to_near_plane() {
        let clipper = NearClipper::default();
        let (a, b) = clipper
            .clip_line(Vec3::new(0.0, -5.0, 0.0), Vec3::new(0.0, 5.0, 0.0))
            .unwrap();
        assert_eq!(a, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn clipping_interpolates_x_and_z() {
        let clipper = NearClipper::default();
        let (a, b) = clipper
            .clip_line(Vec3::new(4.0, 6.0, 2.0), Vec3::new(-4.0, -2.0, 10.0))
            .unwrap();
        assert_eq!(a, Vec3::new(4.0, 6.0, 2.0));
        assert_relative_eq!(b.x, -2.0, epsilon = 1e-6);
        assert_relative_eq!(b.y, 0.0);
        assert_relative_eq!(b.z, 8.0, epsilon = 1e-6);
    }

    #[test]
    fn segment_fully_behind_is_dropped() {
        let clipper = NearClipper::default();
        assert!(clipper
            .clip_line(Vec3::new(0.0, -1.0, 0.0), Vec3::new(3.0, -0.5, 1.0))
            .is_none());
    }

    #[test]
    fn depth_bias_lowers_z() {
        let clipper = NearClipper::new(2.5, false);
        let (a, _) = clipper
            .clip_line(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        assert_eq!(a.z, -2.5);
    }

    #[test]
    fn back_facing_patch_is_culled_unless_two_sided() {
        let mut p = patch([(0.0, 1.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 1.0)]);
        assert!(NearClipper::is_back_facing(&p));
        let mut culled = p;
        assert!(!NearClipper::new(0.0, false).clip_patch(&mut culled));
        assert!(NearClipper::new(0.0, true).clip_patch(&mut p));
    }

    #[test]
    fn front_facing_patch_survives_with_depth() {
        let mut p = patch([(0.0, 1.0, 0.0), (0.0, 1.0, 1.0), (1.0, 1.0, 0.0)]);
        assert!(NearClipper::default().clip_patch(&mut p));
        // (1 + 2 + 2) / 3
        assert_relative_eq!(p.depth, 5.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn patch_touching_space_behind_is_dropped() {
        let mut p = patch([(0.0, 1.0, 0.0), (0.0, -0.1, 1.0), (1.0, 1.0, 0.0)]);
        assert!(!NearClipper::new(0.0, true).clip_patch(&mut p));
    }
}
