//! Per-call renderer configuration.
//!
//! [`RenderSettings`] is an immutable value handed to the
//! [`Renderer`](crate::render::Renderer); nothing in the pipeline mutates it.
//! Settings are read from human-readable RON files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clipper::ViewportClip;
use crate::colors;
use crate::error::SettingsError;
use crate::light::Light;

/// Sky, ground, horizon bar and star field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    /// Paint the sky/ground gradient. When off the canvas is cleared to
    /// `clear_color` instead.
    pub gradient: bool,
    pub clear_color: u32,
    /// Sky color at the top row of the canvas.
    pub sky_high: u32,
    /// Sky color just above the horizon row.
    pub sky_low: u32,
    /// Ground color just below the horizon row.
    pub ground_high: u32,
    /// Ground color at the bottom row of the canvas.
    pub ground_low: u32,
    /// Horizon bar thickness in pixels; 0 disables the bar.
    pub horizon_thickness: u32,
    pub horizon_color: u32,
    pub stars: bool,
    /// Number of catalog stars drawn, capped at [`MAX_STARS`](crate::render::stars::MAX_STARS).
    pub star_count: usize,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            gradient: true,
            clear_color: colors::WHITE,
            sky_high: colors::SKY_HIGH,
            sky_low: colors::SKY_LOW,
            ground_high: colors::GROUND_HIGH,
            ground_low: colors::GROUND_LOW,
            horizon_thickness: 0,
            horizon_color: colors::BLACK,
            stars: false,
            star_count: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StereoMode {
    #[default]
    Off,
    /// Left and right eye images placed next to each other.
    SideBySide,
    /// Red/cyan anaglyph for colored 3D glasses.
    Anaglyph,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoSettings {
    pub mode: StereoMode,
    /// Lateral distance between the camera and each eye, in world units.
    pub separation: f32,
}

impl Default for StereoSettings {
    fn default() -> Self {
        Self {
            mode: StereoMode::Off,
            separation: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub background: BackgroundSettings,
    /// Derive patch colors from the light angle instead of using the stored
    /// color directly.
    pub shading: bool,
    pub light: Light,
    /// Keep patches whose face normal points away from the viewer.
    pub two_sided: bool,
    /// Sort-key distances below which lines get an extra offset stroke. At
    /// most three entries are used.
    pub thicken_distances: Vec<f32>,
    /// Color of patch outline strokes.
    pub edge_color: u32,
    /// Redraw patch outlines after all fills to close seams between patches.
    pub touch_up: bool,
    pub viewport_clip: ViewportClip,
    /// Subtract `raster_height - horizon_row` from camera-space Z before
    /// projection. On by default; turn it off to project raw camera space.
    pub horizon_bias: bool,
    /// Mirror world Y about the middle of the list's Y extent.
    pub reflect: bool,
    pub stereo: StereoSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background: BackgroundSettings::default(),
            shading: true,
            light: Light::default(),
            two_sided: false,
            thicken_distances: Vec::new(),
            edge_color: colors::BLACK,
            touch_up: false,
            viewport_clip: ViewportClip::default(),
            horizon_bias: true,
            reflect: false,
            stereo: StereoSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Loads settings from a RON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(s)?)
    }

    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }
}
