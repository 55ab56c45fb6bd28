//! Background pass: sky and ground gradients, the horizon bar and stars.

use super::canvas::Canvas;
use super::stars::StarCatalog;
use super::Yielder;
use crate::camera::Camera;
use crate::colors;
use crate::error::RenderError;
use crate::projection::Projector;
use crate::settings::BackgroundSettings;
use crate::transform::CameraTransform;

/// Stars are projected from this distance so the projector's depth floor
/// never flattens them.
const STAR_DISTANCE: f32 = 1.0e4;

/// Pixel offsets lit for a star, brightest last.
const STAR_FOOTPRINT: [(i32, i32); 5] = [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)];

pub(crate) fn paint(
    settings: &BackgroundSettings,
    camera: &Camera,
    canvas: &mut dyn Canvas,
    stars: &mut StarCatalog,
    yielder: &mut Yielder<'_>,
) -> Result<(), RenderError> {
    let (width, height) = (canvas.width(), canvas.height());
    let color_mode = canvas.is_color_mode();
    let shade = |color: u32| {
        if color_mode {
            color
        } else {
            colors::to_monochrome(color)
        }
    };

    let horizon = camera.background_horizon_row(height).round() as u32;

    if settings.gradient {
        for y in 0..height {
            let color = if y < horizon {
                band_color(settings.sky_high, settings.sky_low, y, horizon)
            } else {
                band_color(
                    settings.ground_high,
                    settings.ground_low,
                    y - horizon,
                    height - horizon,
                )
            };
            canvas.block_fill(0, y as i32, width, 1, shade(color));
            yielder.row();
        }
        if settings.stars && horizon > 0 {
            paint_stars(settings, camera, canvas, stars, horizon)?;
        }
    } else {
        canvas.block_fill(0, 0, width, height, shade(settings.clear_color));
        yielder.row();
    }

    if settings.horizon_thickness > 0 {
        let top = horizon as i32 - (settings.horizon_thickness / 2) as i32;
        canvas.block_fill(
            0,
            top,
            width,
            settings.horizon_thickness,
            shade(settings.horizon_color),
        );
    }
    Ok(())
}

/// Linear interpolation from `high` at row 0 to `low` at row `rows - 1`.
fn band_color(high: u32, low: u32, row: u32, rows: u32) -> u32 {
    let t = if rows > 1 {
        row as f32 / (rows - 1) as f32
    } else {
        0.0
    };
    colors::lerp_color(high, low, t)
}

fn paint_stars(
    settings: &BackgroundSettings,
    camera: &Camera,
    canvas: &mut dyn Canvas,
    catalog: &mut StarCatalog,
    horizon: u32,
) -> Result<(), RenderError> {
    let (width, height) = (canvas.width(), canvas.height());
    let color_mode = canvas.is_color_mode();
    let transform = CameraTransform::new(camera);
    let projector = Projector::for_camera(camera, width, height);

    let mut drawn = 0usize;
    for star in catalog.stars()?.iter().take(settings.star_count) {
        let v = transform.rotate(star.direction() * STAR_DISTANCE);
        if v.y <= 0.0 {
            continue;
        }
        let p = projector.project_to_pixel(v);
        if p.x < 0 || p.x >= width as i32 || p.y < 0 || p.y >= horizon as i32 {
            continue;
        }
        let color = if color_mode {
            star.color
        } else {
            colors::WHITE
        };
        for &(dx, dy) in STAR_FOOTPRINT.iter().take(star.brightness as usize) {
            let (x, y) = (p.x + dx, p.y + dy);
            if y < horizon as i32 {
                canvas.set_pixel(x, y, color);
            }
        }
        drawn += 1;
    }
    log::trace!("stars drawn: {}", drawn);
    Ok(())
}
