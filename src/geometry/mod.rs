//! Geometry handed to the renderer: line segments and polygon patches.
//!
//! Both list types are read-only inputs to a render call. The renderer takes
//! a private working copy (see [`WireList::working_copy`]) so the caller's
//! list is never touched and repeated renders are side-effect free.

pub mod obj;
pub mod patch_file;
pub mod wire_file;

use crate::error::RenderError;
use crate::math::vec3::Vec3;

/// A single colored 3D line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: u32,
}

impl LineSegment {
    pub const fn new(start: Vec3, end: Vec3, color: u32) -> Self {
        Self { start, end, color }
    }
}

/// A patch corner. `outline` asks for a stroke along the edge from this
/// vertex to the next one in cyclic order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub outline: bool,
}

impl Vertex {
    pub const fn new(position: Vec3, outline: bool) -> Self {
        Self { position, outline }
    }
}

/// A triangle or quadrilateral with fill color and transparency.
///
/// The vertex count is fixed at construction; [`vertices_mut`](Self::vertices_mut)
/// hands out a slice of exactly that length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    vertices: [Vertex; 4],
    count: u8,
    pub color: u32,
    /// 0 is opaque, 255 is invisible.
    pub transparency: u8,
    /// Scratch sort key, only meaningful inside a render call.
    pub(crate) depth: f32,
}

impl Patch {
    pub fn triangle(vertices: [Vertex; 3], color: u32) -> Self {
        Self {
            vertices: [vertices[0], vertices[1], vertices[2], Vertex::default()],
            count: 3,
            color,
            transparency: 0,
            depth: 0.0,
        }
    }

    pub fn quad(vertices: [Vertex; 4], color: u32) -> Self {
        Self {
            vertices,
            count: 4,
            color,
            transparency: 0,
            depth: 0.0,
        }
    }

    pub fn with_transparency(mut self, transparency: u8) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.count as usize]
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices[..self.count as usize]
    }

    pub fn is_quad(&self) -> bool {
        self.count == 4
    }

    /// Unnormalized face normal. Patches are front-facing when their
    /// vertices run clockwise as seen by the viewer.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ];
        (c - a).cross(b - a)
    }
}

fn y_extent(mut ys: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    let first = ys.next()?;
    Some(ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
}

fn copy_into<T: Copy>(items: &[T], what: &'static str) -> Result<Vec<T>, RenderError> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(items.len())
        .map_err(|_| RenderError::Allocation {
            what,
            count: items.len(),
        })?;
    copy.extend_from_slice(items);
    Ok(copy)
}

/// Line segments in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireList {
    segments: Vec<LineSegment>,
}

impl WireList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineSegment> {
        self.segments.iter()
    }

    /// Smallest and largest world Y over all endpoints.
    pub fn y_extent(&self) -> Option<(f32, f32)> {
        y_extent(self.segments.iter().flat_map(|s| [s.start.y, s.end.y]))
    }

    /// Private copy of the segments for one render call.
    pub fn working_copy(&self) -> Result<Vec<LineSegment>, RenderError> {
        copy_into(&self.segments, "wire working copy")
    }
}

impl From<Vec<LineSegment>> for WireList {
    fn from(segments: Vec<LineSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<LineSegment> for WireList {
    fn from_iter<I: IntoIterator<Item = LineSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Patches in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchList {
    patches: Vec<Patch>,
}

impl PatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    pub fn y_extent(&self) -> Option<(f32, f32)> {
        y_extent(
            self.patches
                .iter()
                .flat_map(|p| p.vertices().iter().map(|v| v.position.y)),
        )
    }

    pub fn working_copy(&self) -> Result<Vec<Patch>, RenderError> {
        copy_into(&self.patches, "patch working copy")
    }
}

impl From<Vec<Patch>> for PatchList {
    fn from(patches: Vec<Patch>) -> Self {
        Self { patches }
    }
}

impl FromIterator<Patch> for PatchList {
    fn from_iter<I: IntoIterator<Item = Patch>>(iter: I) -> Self {
        Self {
            patches: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;

    fn v(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), true)
    }

    #[test]
    fn triangle_exposes_three_vertices() {
        let mut p = Patch::triangle([v(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0), v(0.0, 0.0, 1.0)], colors::RED);
        assert_eq!(p.vertices().len(), 3);
        assert_eq!(p.vertices_mut().len(), 3);
        assert!(!p.is_quad());
    }

    #[test]
    fn normal_follows_clockwise_front_faces() {
        let p = Patch::triangle([v(0.0, 1.0, 0.0), v(1.0, 1.0, 0.0), v(0.0, 1.0, 1.0)], colors::RED);
        let n = p.normal();
        assert_eq!(n, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn y_extent_spans_all_endpoints() {
        let list: WireList = vec![
            LineSegment::new(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 3.0, 0.0), colors::BLACK),
            LineSegment::new(Vec3::new(0.0, 7.0, 0.0), Vec3::new(0.0, 1.0, 0.0), colors::BLACK),
        ]
        .into();
        assert_eq!(list.y_extent(), Some((-2.0, 7.0)));
        assert_eq!(WireList::new().y_extent(), None);
    }

    #[test]
    fn working_copy_is_independent() {
        let list: WireList = vec![LineSegment::new(Vec3::ZERO, Vec3::ONE, colors::BLACK)].into();
        let mut copy = list.working_copy().unwrap();
        copy[0].start.x = 99.0;
        assert_eq!(list.segments()[0].start, Vec3::ZERO);
    }
}
