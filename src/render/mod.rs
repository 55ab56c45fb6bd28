//! Rendering: the [`Renderer`] context and everything that touches a canvas.
//!
//! A render call runs the whole pipeline for one scene and one camera:
//!
//! ```text
//! working copy -> (reflect) -> camera transform -> near clip / cull
//!     -> depth sort -> project -> viewport clip -> background -> draw
//! ```
//!
//! The caller's geometry is never modified. Each call either completes or
//! returns a [`RenderError`]; a failed call may leave the canvas partially
//! painted.

pub mod background;
pub mod canvas;
pub mod framebuffer;
pub mod patch;
pub mod scanline;
pub mod stars;
pub mod stereo;
pub mod wire;

pub use canvas::{Canvas, Point};
pub use framebuffer::FrameBuffer;
pub use stars::{Star, StarCatalog};
pub use wire::ProjectedLine;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::geometry::{PatchList, WireList};
use crate::settings::{RenderSettings, StereoMode};

/// Yield to the host every this many primitives.
pub const PRIMITIVES_PER_YIELD: usize = 256;

/// What to draw.
#[derive(Debug, Clone, Copy)]
pub enum Scene<'a> {
    Wires(&'a WireList),
    Patches(&'a PatchList),
}

impl Scene<'_> {
    pub fn len(&self) -> usize {
        match self {
            Scene::Wires(list) => list.len(),
            Scene::Patches(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a successful render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    /// The camera actually used, with auto-aim applied.
    pub camera: Camera,
    /// Primitives in the input list.
    pub considered: usize,
    /// Primitives that reached the canvas. Stereo renders count both eyes.
    pub drawn: usize,
}

/// Calls the host's yield hook once per background row and once every
/// [`PRIMITIVES_PER_YIELD`] primitives.
pub(crate) struct Yielder<'a> {
    hook: Option<&'a mut Box<dyn FnMut()>>,
    primitives: usize,
}

impl<'a> Yielder<'a> {
    pub(crate) fn new(hook: Option<&'a mut Box<dyn FnMut()>>) -> Self {
        Self {
            hook,
            primitives: 0,
        }
    }

    pub(crate) fn row(&mut self) {
        self.call();
    }

    pub(crate) fn primitive(&mut self) {
        self.primitives += 1;
        if self.primitives % PRIMITIVES_PER_YIELD == 0 {
            self.call();
        }
    }

    fn call(&mut self) {
        if let Some(hook) = self.hook.as_deref_mut() {
            hook();
        }
    }
}

/// Owns everything that outlives a single render call: the settings, the
/// star catalog and the host's yield hook.
pub struct Renderer {
    settings: RenderSettings,
    stars: StarCatalog,
    yield_hook: Option<Box<dyn FnMut()>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            stars: StarCatalog::new(),
            yield_hook: None,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
    }

    pub fn stars(&self) -> &StarCatalog {
        &self.stars
    }

    /// Replaces the star catalog with one built from `seed` on next use.
    pub fn regenerate_stars(&mut self, seed: u64) {
        self.stars.regenerate(seed);
    }

    /// Installs a hook the renderer calls periodically during long loops so
    /// an interactive host can pump its event queue.
    pub fn set_yield_hook<F>(&mut self, hook: F)
    where
        F: FnMut() + 'static,
    {
        self.yield_hook = Some(Box::new(hook));
    }

    pub fn clear_yield_hook(&mut self) {
        self.yield_hook = None;
    }

    pub(crate) fn yielder(&mut self) -> Yielder<'_> {
        Yielder::new(self.yield_hook.as_mut())
    }

    /// Renders a scene, side by side or as an anaglyph when stereo is on.
    pub fn render(
        &mut self,
        scene: Scene<'_>,
        camera: &Camera,
        canvas: &mut dyn Canvas,
    ) -> Result<RenderReport, RenderError> {
        match self.settings.stereo.mode {
            StereoMode::Off => self.render_mono(scene, camera, canvas),
            _ => stereo::render(self, scene, camera, canvas),
        }
    }

    /// Single-eye line rendering.
    pub fn render_wires(
        &mut self,
        list: &WireList,
        camera: &Camera,
        canvas: &mut dyn Canvas,
    ) -> Result<RenderReport, RenderError> {
        self.render_mono(Scene::Wires(list), camera, canvas)
    }

    /// Single-eye patch rendering.
    pub fn render_patches(
        &mut self,
        list: &PatchList,
        camera: &Camera,
        canvas: &mut dyn Canvas,
    ) -> Result<RenderReport, RenderError> {
        self.render_mono(Scene::Patches(list), camera, canvas)
    }

    /// The line pipeline without drawing, for the vector exporters.
    pub fn project_wires(
        &self,
        list: &WireList,
        camera: &Camera,
        width: u32,
        height: u32,
    ) -> Result<Vec<ProjectedLine>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }
        wire::project(list, &camera.effective(), &self.settings, width, height)
    }

    pub(crate) fn render_mono(
        &mut self,
        scene: Scene<'_>,
        camera: &Camera,
        canvas: &mut dyn Canvas,
    ) -> Result<RenderReport, RenderError> {
        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            log::warn!("render skipped: canvas is {}x{}", width, height);
            return Err(RenderError::EmptyCanvas { width, height });
        }
        let camera = camera.effective();
        let settings = &self.settings;
        let mut yielder = Yielder::new(self.yield_hook.as_mut());

        let drawn = match scene {
            Scene::Wires(list) => {
                let lines = wire::project(list, &camera, settings, width, height)?;
                background::paint(
                    &settings.background,
                    &camera,
                    canvas,
                    &mut self.stars,
                    &mut yielder,
                )?;
                wire::draw(&lines, settings, canvas, &mut yielder)
            }
            Scene::Patches(list) => {
                let patches = patch::project(list, &camera, settings, width, height)?;
                background::paint(
                    &settings.background,
                    &camera,
                    canvas,
                    &mut self.stars,
                    &mut yielder,
                )?;
                patch::draw(&patches, settings, canvas, &mut yielder)
            }
        };

        log::debug!(
            "rendered {}x{}: {} of {} primitives drawn",
            width,
            height,
            drawn,
            scene.len()
        );
        Ok(RenderReport {
            camera,
            considered: scene.len(),
            drawn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::geometry::LineSegment;
    use crate::math::vec3::Vec3;
    use std::cell::Cell;
    use std::rc::Rc;

    fn maze() -> WireList {
        let mut list = WireList::new();
        for i in 0..5 {
            let x = i as f32 - 2.0;
            list.push(LineSegment::new(
                Vec3::new(x, 4.0, -1.0),
                Vec3::new(x, 12.0, -1.0),
                if i % 2 == 0 { colors::RED } else { colors::BLUE },
            ));
        }
        list
    }

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 0.5)).with_projection_scale(60.0)
    }

    fn unbiased() -> RenderSettings {
        RenderSettings {
            horizon_bias: false,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn rendering_is_repeatable() {
        let mut renderer = Renderer::new(RenderSettings {
            background: crate::settings::BackgroundSettings {
                stars: true,
                ..Default::default()
            },
            ..unbiased()
        });
        let list = maze();
        let mut a = FrameBuffer::new(80, 60).unwrap();
        let mut b = FrameBuffer::new(80, 60).unwrap();
        renderer.render_wires(&list, &camera(), &mut a).unwrap();
        renderer.render_wires(&list, &camera(), &mut b).unwrap();
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn report_counts_and_effective_camera() {
        let mut renderer = Renderer::new(unbiased());
        let mut cam = camera();
        cam.position = Vec3::new(0.0, -10.0, 0.0);
        cam.auto_aim = true;
        cam.heading = 1.0;
        let mut fb = FrameBuffer::new(80, 60).unwrap();
        let report = renderer.render_wires(&maze(), &cam, &mut fb).unwrap();
        assert_eq!(report.considered, 5);
        assert_eq!(report.drawn, 5);
        assert_eq!(report.camera.heading, 0.0);
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        let mut renderer = Renderer::new(unbiased());
        let mut fb = FrameBuffer::new(0, 10).unwrap();
        let result = renderer.render(Scene::Wires(&maze()), &camera(), &mut fb);
        assert!(matches!(result, Err(RenderError::EmptyCanvas { .. })));
    }

    #[test]
    fn yield_hook_is_called_during_render() {
        let calls = Rc::new(Cell::new(0usize));
        let counter = calls.clone();
        let mut renderer = Renderer::new(unbiased());
        renderer.set_yield_hook(move || counter.set(counter.get() + 1));
        let mut fb = FrameBuffer::new(20, 15).unwrap();
        renderer.render_wires(&maze(), &camera(), &mut fb).unwrap();
        assert_eq!(calls.get(), 15);
    }

    #[test]
    fn project_wires_matches_what_is_drawn() {
        let renderer = Renderer::new(unbiased());
        let lines = renderer.project_wires(&maze(), &camera(), 80, 60).unwrap();
        assert_eq!(lines.len(), 5);
        assert!(lines
            .windows(2)
            .all(|pair| pair[0].depth >= pair[1].depth));
    }
}
