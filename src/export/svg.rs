//! SVG export of projected line drawings.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::colors;
use crate::render::ProjectedLine;

/// Writes `lines` as an SVG document sized to the raster. Consecutive lines
/// of the same color share one `<g>` group.
pub fn write_svg<W: Write>(
    lines: &[ProjectedLine],
    width: u32,
    height: u32,
    w: &mut W,
) -> io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        w,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
        width, height
    )?;

    let mut current = None;
    for line in lines {
        if current != Some(line.color) {
            if current.is_some() {
                writeln!(w, "</g>")?;
            }
            writeln!(
                w,
                r#"<g stroke="{}" stroke-width="1" stroke-linecap="square">"#,
                colors::to_hex(line.color)
            )?;
            current = Some(line.color);
        }
        writeln!(
            w,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            line.start.x, line.start.y, line.end.x, line.end.y
        )?;
    }
    if current.is_some() {
        writeln!(w, "</g>")?;
    }
    writeln!(w, "</svg>")
}

pub fn save_svg<P: AsRef<Path>>(
    lines: &[ProjectedLine],
    width: u32,
    height: u32,
    path: P,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write_svg(lines, width, height, &mut file)?;
    file.flush()
}
