//! The patch pipeline: transform, cull, sort, project and fill a
//! [`PatchList`], with optional outline strokes and a touch-up pass.

use super::canvas::{Canvas, Point};
use super::wire::depth_bias;
use super::Yielder;
use crate::camera::Camera;
use crate::clipper::{patch_outside, NearClipper};
use crate::colors;
use crate::error::RenderError;
use crate::geometry::{Patch, PatchList};
use crate::math::vec2::Vec2;
use crate::projection::Projector;
use crate::settings::RenderSettings;
use crate::sorting::heap_sort_by_key_descending;
use crate::transform::{reflect_patches, CameraTransform};

/// A patch in screen space, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProjectedPatch {
    points: [Point; 4],
    count: usize,
    outlines: [bool; 4],
    color: u32,
    transparency: u8,
    /// Light intensity when shading is on.
    intensity: Option<f32>,
    min: Point,
    max: Point,
}

impl ProjectedPatch {
    fn new(patch: &Patch, points: [Point; 4], intensity: Option<f32>) -> Self {
        let count = patch.vertices().len();
        let mut outlines = [false; 4];
        for (flag, vertex) in outlines.iter_mut().zip(patch.vertices()) {
            *flag = vertex.outline;
        }
        let used = &points[..count];
        let min = Point::new(
            used.iter().map(|p| p.x).min().unwrap_or(0),
            used.iter().map(|p| p.y).min().unwrap_or(0),
        );
        let max = Point::new(
            used.iter().map(|p| p.x).max().unwrap_or(0),
            used.iter().map(|p| p.y).max().unwrap_or(0),
        );
        Self {
            points,
            count,
            outlines,
            color: patch.color,
            transparency: patch.transparency,
            intensity,
            min,
            max,
        }
    }

    /// Outlined edges as point pairs.
    fn outline_edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.count)
            .filter(|&i| self.outlines[i])
            .map(|i| (self.points[i], self.points[(i + 1) % self.count]))
    }

    /// Strictly inside the projected bounding box.
    fn encloses(&self, p: Point) -> bool {
        self.min.x < p.x && p.x < self.max.x && self.min.y < p.y && p.y < self.max.y
    }

    fn fill_color(&self, color_mode: bool) -> u32 {
        match (self.intensity, color_mode) {
            (Some(i), true) => colors::modulate(self.color, i),
            (Some(i), false) => {
                if i >= 0.5 {
                    colors::WHITE
                } else {
                    colors::BLACK
                }
            }
            (None, true) => self.color,
            (None, false) => colors::to_monochrome(self.color),
        }
    }
}

/// Transforms, culls and sorts a working copy of `list`, then projects the
/// survivors. Patches come back farthest first.
pub(crate) fn project(
    list: &PatchList,
    camera: &Camera,
    settings: &RenderSettings,
    width: u32,
    height: u32,
) -> Result<Vec<ProjectedPatch>, RenderError> {
    let mut work = list.working_copy()?;
    if settings.reflect {
        reflect_patches(&mut work);
    }

    let transform = CameraTransform::new(camera);
    let near = NearClipper::new(depth_bias(settings, camera, height), settings.two_sided);
    work.retain_mut(|patch| {
        transform.apply_to_patch(patch);
        near.clip_patch(patch)
    });
    let kept = work.len();
    heap_sort_by_key_descending(&mut work, |patch| patch.depth);

    let projector = Projector::for_camera(camera, width, height);
    let mut projected = Vec::new();
    projected
        .try_reserve_exact(work.len())
        .map_err(|_| RenderError::Allocation {
            what: "projected patches",
            count: work.len(),
        })?;

    for patch in &work {
        let mut screen = [Vec2::ZERO; 4];
        for (s, v) in screen.iter_mut().zip(patch.vertices()) {
            *s = projector.project(v.position);
        }
        let count = patch.vertices().len();
        if patch_outside(&screen[..count], width, height) {
            continue;
        }
        let intensity = settings
            .shading
            .then(|| settings.light.intensity(patch.normal()));
        projected.push(ProjectedPatch::new(
            patch,
            screen.map(Point::from_vec2),
            intensity,
        ));
    }

    log::trace!(
        "patch pipeline: {} patches, {} past the near plane, {} on screen",
        list.len(),
        kept,
        projected.len()
    );
    Ok(projected)
}

/// Fills the patches in order, then strokes outlines. Returns how many
/// patches were drawn.
pub(crate) fn draw(
    patches: &[ProjectedPatch],
    settings: &RenderSettings,
    canvas: &mut dyn Canvas,
    yielder: &mut Yielder<'_>,
) -> usize {
    let edge_color = if canvas.is_color_mode() {
        settings.edge_color
    } else {
        colors::to_monochrome(settings.edge_color)
    };

    for patch in patches {
        let color = patch.fill_color(canvas.is_color_mode());
        if patch.count == 4 {
            canvas.fill_quad(patch.points, color, patch.transparency);
        } else {
            let [a, b, c, _] = patch.points;
            canvas.fill_triangle([a, b, c], color, patch.transparency);
        }
        if !settings.touch_up {
            for (a, b) in patch.outline_edges() {
                canvas.draw_line(a, b, edge_color);
            }
        }
        yielder.primitive();
    }

    if settings.touch_up {
        let redrawn = touch_up(patches, edge_color, canvas, yielder);
        log::trace!("touch-up redrew {} outline edges", redrawn);
    }
    patches.len()
}

/// Redraws every outline edge after all fills, except edges whose endpoints
/// both fall strictly inside the bounding box of a patch drawn later (and so
/// nearer). Quadratic in the patch count.
fn touch_up(
    patches: &[ProjectedPatch],
    edge_color: u32,
    canvas: &mut dyn Canvas,
    yielder: &mut Yielder<'_>,
) -> usize {
    let mut redrawn = 0;
    for (i, patch) in patches.iter().enumerate() {
        let nearer = &patches[i + 1..];
        for (a, b) in patch.outline_edges() {
            let hidden = nearer.iter().any(|q| q.encloses(a) && q.encloses(b));
            if !hidden {
                canvas.draw_line(a, b, edge_color);
                redrawn += 1;
            }
        }
        yielder.primitive();
    }
    redrawn
}
