//! A CPU perspective renderer for maze-style 3D line drawings and polygon
//! patches.
//!
//! Geometry goes in as a [`WireList`] or [`PatchList`]; a [`Renderer`] runs
//! it through the camera transform, near-plane clip, projection, viewport
//! clip and a painter's-algorithm depth sort, then draws into any
//! [`Canvas`]. There is no depth buffer. SDL2 is only used by the viewer
//! window.
//!
//! # Quick Start
//!
//! ```ignore
//! use mazeview::prelude::*;
//!
//! let list = load_wires("maze.dw")?;
//! let mut renderer = Renderer::new(RenderSettings::default());
//! let mut frame = FrameBuffer::new(800, 600)?;
//! let camera = Camera::looking_at_origin(Vec3::new(0.0, -20.0, 5.0))
//!     .with_projection_scale(600.0);
//! renderer.render(Scene::Wires(&list), &camera, &mut frame)?;
//! frame.save_png("maze.png")?;
//! ```

pub mod camera;
pub mod clipper;
pub mod colors;
pub mod error;
pub mod export;
pub mod geometry;
pub mod light;
pub mod math;
pub mod projection;
pub mod render;
pub mod settings;
pub mod sorting;
pub mod transform;
pub mod window;

pub use camera::{Camera, CameraController, CameraInput};
pub use error::{ExportError, LoadError, RenderError, SettingsError};
pub use geometry::{LineSegment, Patch, PatchList, Vertex, WireList};
pub use render::{Canvas, FrameBuffer, RenderReport, Renderer, Scene};
pub use settings::RenderSettings;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use mazeview::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, CameraController, CameraInput};

    // Geometry
    pub use crate::geometry::obj::load_obj;
    pub use crate::geometry::patch_file::{load_patches, save_patches};
    pub use crate::geometry::wire_file::{load_wires, save_wires};
    pub use crate::geometry::{LineSegment, Patch, PatchList, Vertex, WireList};

    // Rendering
    pub use crate::render::{Canvas, FrameBuffer, Point, RenderReport, Renderer, Scene};
    pub use crate::settings::{RenderSettings, StereoMode};

    // Export
    pub use crate::export::{export_wires, ExportFormat};

    // Math
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Window & Input
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}
