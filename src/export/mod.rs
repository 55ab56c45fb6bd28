//! Write-only vector exports of a wireframe view.
//!
//! Exports run the line pipeline without a canvas
//! ([`Renderer::project_wires`]) and write the clipped, depth-sorted 2D
//! segments out.

pub mod svg;
pub mod vector;

use std::path::Path;

pub use svg::{save_svg, write_svg};
pub use vector::{save_vector, write_vector, DEFAULT_UNITS_PER_INCH};

use crate::camera::Camera;
use crate::error::ExportError;
use crate::geometry::WireList;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Vector { units_per_inch: u32 },
}

impl ExportFormat {
    /// Picks a format from the file extension: `.svg`, or `.vec` for the
    /// vector line format.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(ExportFormat::Svg),
            "vec" => Some(ExportFormat::Vector {
                units_per_inch: DEFAULT_UNITS_PER_INCH,
            }),
            _ => None,
        }
    }
}

/// Projects `list` for a `width` x `height` view and writes it to `path`.
/// Returns the number of segments written.
pub fn export_wires<P: AsRef<Path>>(
    renderer: &Renderer,
    list: &WireList,
    camera: &Camera,
    width: u32,
    height: u32,
    format: ExportFormat,
    path: P,
) -> Result<usize, ExportError> {
    let lines = renderer.project_wires(list, camera, width, height)?;
    match format {
        ExportFormat::Svg => save_svg(&lines, width, height, path.as_ref())?,
        ExportFormat::Vector { units_per_inch } => {
            save_vector(&lines, width, height, units_per_inch, path.as_ref())?
        }
    }
    log::debug!(
        "exported {} of {} segments to {}",
        lines.len(),
        list.len(),
        path.as_ref().display()
    );
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path("maze.SVG"), Some(ExportFormat::Svg));
        assert_eq!(
            ExportFormat::from_path("out/maze.vec"),
            Some(ExportFormat::Vector {
                units_per_inch: DEFAULT_UNITS_PER_INCH
            })
        );
        assert_eq!(ExportFormat::from_path("maze.png"), None);
        assert_eq!(ExportFormat::from_path("maze"), None);
    }
}
