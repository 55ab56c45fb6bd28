//! World to camera space transform.
//!
//! [`CameraTransform`] is built once per render from a [`Camera`] and then
//! applied to every vertex: translate by the camera position, scale per
//! axis, rotate by heading and, if non-zero, by pitch. Each angle's
//! `(sin, cos)` pair is computed once up front.

use crate::camera::Camera;
use crate::geometry::{LineSegment, Patch};
use crate::math::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    position: Vec3,
    scale: Vec3,
    heading: (f32, f32),
    pitch: Option<(f32, f32)>,
}

impl CameraTransform {
    pub fn new(camera: &Camera) -> Self {
        Self {
            position: camera.position,
            scale: camera.axis_scale,
            heading: camera.heading.sin_cos(),
            pitch: (camera.pitch != 0.0).then(|| camera.pitch.sin_cos()),
        }
    }

    /// Maps a world-space point to camera space.
    #[inline]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.rotate((point - self.position).scale_by(self.scale))
    }

    /// Applies only the rotations, for directions such as star positions.
    #[inline]
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let (sin, cos) = self.heading;
        let v = v.rotate_xy(sin, cos);
        match self.pitch {
            Some((sin, cos)) => v.rotate_yz(sin, cos),
            None => v,
        }
    }

    pub fn apply_to_segment(&self, segment: &mut LineSegment) {
        segment.start = self.apply(segment.start);
        segment.end = self.apply(segment.end);
    }

    pub fn apply_to_patch(&self, patch: &mut Patch) {
        for vertex in patch.vertices_mut() {
            vertex.position = self.apply(vertex.position);
        }
    }
}

/// Mirrors world Y of every endpoint about the middle of the list's Y
/// extent.
pub fn reflect_segments(segments: &mut [LineSegment]) {
    let Some(mid2) = extent_sum(segments.iter().flat_map(|s| [s.start.y, s.end.y])) else {
        return;
    };
    for s in segments {
        s.start.y = mid2 - s.start.y;
        s.end.y = mid2 - s.end.y;
    }
}

/// Patch counterpart of [`reflect_segments`]. Reflection flips the
/// winding of every patch, so vertex order is reversed to keep front faces
/// facing the same way. Outline flags move with their edges.
pub fn reflect_patches(patches: &mut [Patch]) {
    let Some(mid2) = extent_sum(
        patches
            .iter()
            .flat_map(|p| p.vertices().iter().map(|v| v.position.y)),
    ) else {
        return;
    };
    for patch in patches {
        let vertices = patch.vertices_mut();
        for v in vertices.iter_mut() {
            v.position.y = mid2 - v.position.y;
        }
        reverse_winding(vertices);
    }
}

/// Reverses the vertex order while keeping each outline flag on the same
/// geometric edge.
fn reverse_winding(vertices: &mut [crate::geometry::Vertex]) {
    let n = vertices.len();
    // Edge i runs from vertex i to i+1; after reversal it runs from
    // (n-1-i-1) to (n-1-i), so flags shift by one.
    let flags: Vec<bool> = vertices.iter().map(|v| v.outline).collect();
    vertices.reverse();
    for (i, v) in vertices.iter_mut().enumerate() {
        v.outline = flags[(2 * n - 2 - i) % n];
    }
}

/// `min + max` of the values, i.e. twice the midpoint.
fn extent_sum(mut values: impl Iterator<Item = f32>) -> Option<f32> {
    let first = values.next()?;
    let (lo, hi) = values.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    Some(lo + hi)
}
