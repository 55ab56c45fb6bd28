//! The line pipeline: transform, clip, project, sort and stroke a
//! [`WireList`].

use super::canvas::{Canvas, Point};
use super::Yielder;
use crate::camera::Camera;
use crate::clipper::NearClipper;
use crate::colors;
use crate::error::RenderError;
use crate::geometry::WireList;
use crate::projection::Projector;
use crate::settings::RenderSettings;
use crate::sorting::heap_sort_by_key_descending;
use crate::transform::{reflect_segments, CameraTransform};

/// Extra strokes added per thickening threshold, in order.
pub const THICKEN_OFFSETS: [(i32, i32); 3] = [(1, 0), (0, 1), (1, 1)];

/// A segment after clipping and projection, ready to stroke or export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedLine {
    pub start: Point,
    pub end: Point,
    pub color: u32,
    /// Sum of the endpoints' camera-space Y. Larger is farther.
    pub depth: f32,
}

/// Runs every stage up to and including the depth sort. Lines come back
/// farthest first.
pub(crate) fn project(
    list: &WireList,
    camera: &Camera,
    settings: &RenderSettings,
    width: u32,
    height: u32,
) -> Result<Vec<ProjectedLine>, RenderError> {
    let mut work = list.working_copy()?;
    if settings.reflect {
        reflect_segments(&mut work);
    }

    let transform = CameraTransform::new(camera);
    let near = NearClipper::new(depth_bias(settings, camera, height), settings.two_sided);
    let projector = Projector::for_camera(camera, width, height);

    let mut lines = Vec::new();
    lines
        .try_reserve_exact(work.len())
        .map_err(|_| RenderError::Allocation {
            what: "projected lines",
            count: work.len(),
        })?;

    for segment in &mut work {
        transform.apply_to_segment(segment);
        let Some(clipped) = near.clip_segment(segment) else {
            continue;
        };
        let depth = clipped.start.y + clipped.end.y;
        let a = projector.project(clipped.start);
        let b = projector.project(clipped.end);
        let Some((a, b)) = settings.viewport_clip.clip(a, b, width, height) else {
            continue;
        };
        lines.push(ProjectedLine {
            start: Point::from_vec2(a),
            end: Point::from_vec2(b),
            color: segment.color,
            depth,
        });
    }

    // A single-color drawing looks the same in any order.
    let uniform = lines.windows(2).all(|pair| pair[0].color == pair[1].color);
    if !uniform {
        heap_sort_by_key_descending(&mut lines, |line| line.depth);
    }

    log::trace!(
        "wire pipeline: {} segments, {} visible, sorted: {}",
        work.len(),
        lines.len(),
        !uniform
    );
    Ok(lines)
}

/// Vertical shift applied by the near clipper: `height - horizon_row`, or
/// zero with horizon bias turned off.
pub(crate) fn depth_bias(settings: &RenderSettings, camera: &Camera, height: u32) -> f32 {
    if settings.horizon_bias {
        height as f32 - camera.horizon_row(height)
    } else {
        0.0
    }
}

/// Strokes the lines in order. Returns how many were drawn.
pub(crate) fn draw(
    lines: &[ProjectedLine],
    settings: &RenderSettings,
    canvas: &mut dyn Canvas,
    yielder: &mut Yielder<'_>,
) -> usize {
    let (width, height) = (canvas.width(), canvas.height());
    let thresholds = &settings.thicken_distances[..settings.thicken_distances.len().min(3)];

    for line in lines {
        let color = if canvas.is_color_mode() {
            line.color
        } else {
            colors::to_monochrome(line.color)
        };
        canvas.draw_line(line.start, line.end, color);

        let extra = thresholds.iter().filter(|&&t| line.depth < t).count();
        for &(dx, dy) in THICKEN_OFFSETS.iter().take(extra) {
            canvas.draw_line(
                line.start.offset(dx, dy).clamped(width, height),
                line.end.offset(dx, dy).clamped(width, height),
                color,
            );
        }
        yielder.primitive();
    }
    lines.len()
}
