//! Stereo compositing: render each eye into a scratch frame buffer, then
//! place the two views side by side or merge them into a red/cyan
//! anaglyph.

use super::canvas::Canvas;
use super::framebuffer::FrameBuffer;
use super::{RenderReport, Renderer, Scene};
use crate::camera::Camera;
use crate::colors;
use crate::error::RenderError;
use crate::settings::StereoMode;

/// Eye cameras for a viewer at `camera`. Each eye sits `separation` to the
/// side along the camera's lateral axis and keeps the camera's angles.
pub fn eye_cameras(camera: &Camera, separation: f32) -> (Camera, Camera) {
    let mut center = camera.effective();
    center.auto_aim = false;
    let offset = center.right() * separation;
    (center.translated(-offset), center.translated(offset))
}

pub(crate) fn render(
    renderer: &mut Renderer,
    scene: Scene<'_>,
    camera: &Camera,
    canvas: &mut dyn Canvas,
) -> Result<RenderReport, RenderError> {
    let (width, height) = (canvas.width(), canvas.height());
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyCanvas { width, height });
    }
    let stereo = renderer.settings().stereo;
    let (left_eye, right_eye) = eye_cameras(camera, stereo.separation);

    let (left_report, right_report) = match stereo.mode {
        StereoMode::Off => return renderer.render_mono(scene, camera, canvas),
        StereoMode::SideBySide => {
            let half = width / 2;
            let color_mode = canvas.is_color_mode();
            let mut left = FrameBuffer::with_mode(half, height, color_mode)?;
            let mut right = FrameBuffer::with_mode(half, height, color_mode)?;
            let l = renderer.render_mono(scene, &left_eye, &mut left)?;
            let r = renderer.render_mono(scene, &right_eye, &mut right)?;

            let divider = renderer.settings().edge_color;
            let mut yielder = renderer.yielder();
            for y in 0..height {
                copy_row(&left, y, canvas, 0);
                copy_row(&right, y, canvas, width - half);
                yielder.row();
            }
            if width % 2 == 1 {
                canvas.block_fill(half as i32, 0, 1, height, divider);
            }
            (l, r)
        }
        StereoMode::Anaglyph => {
            let mut left = FrameBuffer::new(width, height)?;
            let mut right = FrameBuffer::new(width, height)?;
            let l = renderer.render_mono(scene, &left_eye, &mut left)?;
            let r = renderer.render_mono(scene, &right_eye, &mut right)?;

            let mut yielder = renderer.yielder();
            let rows = left.pixels().chunks(width as usize);
            let right_rows = right.pixels().chunks(width as usize);
            for (y, (l_row, r_row)) in rows.zip(right_rows).enumerate() {
                for (x, (&lp, &rp)) in l_row.iter().zip(r_row).enumerate() {
                    canvas.set_pixel(x as i32, y as i32, anaglyph(lp, rp));
                }
                yielder.row();
            }
            (l, r)
        }
    };

    log::debug!(
        "stereo {:?}: separation {}, {} + {} primitives drawn",
        stereo.mode,
        stereo.separation,
        left_report.drawn,
        right_report.drawn
    );
    Ok(RenderReport {
        camera: camera.effective(),
        considered: left_report.considered,
        drawn: left_report.drawn + right_report.drawn,
    })
}

/// Red from the left eye's luminance, green and blue from the right's.
pub fn anaglyph(left: u32, right: u32) -> u32 {
    let l = colors::luminance(left);
    let r = colors::luminance(right);
    colors::rgb(l, r, r)
}

fn copy_row(source: &FrameBuffer, y: u32, target: &mut dyn Canvas, x_offset: u32) {
    let width = source.width() as usize;
    let start = y as usize * width;
    for (x, &pixel) in source.pixels()[start..start + width].iter().enumerate() {
        target.set_pixel((x_offset as usize + x) as i32, y as i32, pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineSegment, WireList};
    use crate::render::Point;
    use crate::math::vec3::Vec3;
    use crate::settings::{BackgroundSettings, RenderSettings, StereoSettings};
    use approx::assert_relative_eq;

    fn settings(mode: StereoMode) -> RenderSettings {
        RenderSettings {
            background: BackgroundSettings {
                gradient: false,
                clear_color: colors::BLACK,
                ..Default::default()
            },
            stereo: StereoSettings {
                mode,
                separation: 1.0,
            },
            edge_color: colors::GREEN,
            horizon_bias: false,
            ..RenderSettings::default()
        }
    }

    fn post() -> WireList {
        vec![LineSegment::new(
            Vec3::new(0.0, 5.0, -1.0),
            Vec3::new(0.0, 5.0, 1.0),
            colors::WHITE,
        )]
        .into()
    }

    #[test]
    fn eyes_straddle_the_camera() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.heading = std::f32::consts::FRAC_PI_2;
        let (left, right) = eye_cameras(&camera, 0.5);
        // Facing +X, the viewer's right is -Y.
        assert_relative_eq!(left.position.y, 2.5, epsilon = 1e-6);
        assert_relative_eq!(right.position.y, 1.5, epsilon = 1e-6);
        assert_relative_eq!(left.position.x, 1.0, epsilon = 1e-6);
        assert_eq!(left.heading, camera.heading);
    }

    #[test]
    fn side_by_side_places_each_eye_in_its_half() {
        let mut renderer = Renderer::new(settings(StereoMode::SideBySide));
        let camera = Camera::default().with_projection_scale(20.0);
        let mut fb = FrameBuffer::new(41, 20).unwrap();
        let report = renderer.render(Scene::Wires(&post()), &camera, &mut fb).unwrap();
        assert_eq!(report.drawn, 2);

        // Each half is 20 wide with its centre at x = 10. The left eye sees
        // the post shifted right, the right eye shifted left.
        let lit = |x0: i32, x1: i32| {
            (x0..x1)
                .filter(|&x| fb.get_pixel(x, 10) == Some(colors::WHITE))
                .collect::<Vec<_>>()
        };
        assert_eq!(lit(0, 20), vec![14]);
        assert_eq!(lit(21, 41), vec![21 + 6]);
        // Odd width: one-pixel divider in the edge color.
        assert_eq!(fb.get_pixel(20, 0), Some(colors::GREEN));
    }

    #[test]
    fn anaglyph_splits_channels_by_eye() {
        assert_eq!(anaglyph(colors::WHITE, colors::BLACK), colors::RED);
        assert_eq!(anaglyph(colors::BLACK, colors::WHITE), colors::CYAN);

        let mut renderer = Renderer::new(settings(StereoMode::Anaglyph));
        let camera = Camera::default().with_projection_scale(20.0);
        let mut fb = FrameBuffer::new(40, 20).unwrap();
        renderer.render(Scene::Wires(&post()), &camera, &mut fb).unwrap();
        assert_eq!(fb.get_pixel(24, 10), Some(colors::RED));
        assert_eq!(fb.get_pixel(16, 10), Some(colors::CYAN));
    }

    #[test]
    fn side_by_side_needs_two_columns() {
        let mut renderer = Renderer::new(settings(StereoMode::SideBySide));
        let mut fb = FrameBuffer::new(1, 20).unwrap();
        let result = renderer.render(Scene::Wires(&post()), &Camera::default(), &mut fb);
        assert!(matches!(result, Err(RenderError::EmptyCanvas { width: 0, .. })));
    }

    /// Reports a huge raster and counts every pixel write it receives.
    #[derive(Default)]
    struct HugeCanvas {
        writes: usize,
    }

    impl Canvas for HugeCanvas {
        fn width(&self) -> u32 {
            u32::MAX
        }
        fn height(&self) -> u32 {
            u32::MAX
        }
        fn resize(&mut self, _: u32, _: u32) -> Result<(), RenderError> {
            Ok(())
        }
        fn is_color_mode(&self) -> bool {
            true
        }
        fn set_pixel(&mut self, _: i32, _: i32, _: u32) {
            self.writes += 1;
        }
        fn draw_line(&mut self, _: Point, _: Point, _: u32) {
            self.writes += 1;
        }
        fn block_fill(&mut self, _: i32, _: i32, _: u32, _: u32, _: u32) {
            self.writes += 1;
        }
        fn fill_triangle(&mut self, _: [Point; 3], _: u32, _: u8) {
            self.writes += 1;
        }
        fn fill_quad(&mut self, _: [Point; 4], _: u32, _: u8) {
            self.writes += 1;
        }
    }

    #[test]
    fn scratch_allocation_failure_aborts_the_render() {
        for mode in [StereoMode::SideBySide, StereoMode::Anaglyph] {
            let mut renderer = Renderer::new(settings(mode));
            let mut canvas = HugeCanvas::default();
            let result = renderer.render(Scene::Wires(&post()), &Camera::default(), &mut canvas);
            assert!(matches!(result, Err(RenderError::Allocation { .. })));
            assert_eq!(canvas.writes, 0);
        }
    }

    #[test]
    fn stereo_off_renders_a_single_view() {
        let mut renderer = Renderer::new(settings(StereoMode::Off));
        let camera = Camera::default().with_projection_scale(20.0);
        let mut fb = FrameBuffer::new(40, 20).unwrap();
        let report = render(&mut renderer, Scene::Wires(&post()), &camera, &mut fb).unwrap();
        assert_eq!(report.drawn, 1);
        assert_eq!(fb.get_pixel(20, 10), Some(colors::WHITE));
    }
}
