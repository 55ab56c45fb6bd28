//! Plain-text vector line format for plotters and external viewers.
//!
//! ```text
//! VECTOR <units_per_inch> <width> <height>
//! PL 2 x1 y1 x2 y2
//! ...
//! ```
//!
//! Width, height and coordinates are in units, converted from pixels at
//! 96 pixels per inch. The origin is the top-left corner of the raster.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::render::ProjectedLine;

pub const VECTOR_HEADER: &str = "VECTOR";
pub const PIXELS_PER_INCH: f32 = 96.0;
pub const DEFAULT_UNITS_PER_INCH: u32 = 1000;

fn to_units(pixels: i32, units_per_inch: u32) -> f32 {
    let units = pixels as f32 * units_per_inch as f32 / PIXELS_PER_INCH;
    (units * 100.0).round() / 100.0
}

pub fn write_vector<W: Write>(
    lines: &[ProjectedLine],
    width: u32,
    height: u32,
    units_per_inch: u32,
    w: &mut W,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {} {}",
        VECTOR_HEADER,
        units_per_inch,
        to_units(width as i32, units_per_inch),
        to_units(height as i32, units_per_inch)
    )?;
    for line in lines {
        writeln!(
            w,
            "PL 2 {} {} {} {}",
            to_units(line.start.x, units_per_inch),
            to_units(line.start.y, units_per_inch),
            to_units(line.end.x, units_per_inch),
            to_units(line.end.y, units_per_inch)
        )?;
    }
    Ok(())
}

pub fn save_vector<P: AsRef<Path>>(
    lines: &[ProjectedLine],
    width: u32,
    height: u32,
    units_per_inch: u32,
    path: P,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write_vector(lines, width, height, units_per_inch, &mut file)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::render::Point;

    #[test]
    fn header_and_records_are_in_units() {
        let lines = [ProjectedLine {
            start: Point::new(0, 48),
            end: Point::new(96, 192),
            color: colors::RED,
            depth: 3.0,
        }];
        let mut out = Vec::new();
        write_vector(&lines, 192, 96, 1000, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut rows = text.lines();
        assert_eq!(rows.next(), Some("VECTOR 1000 2000 1000"));
        assert_eq!(rows.next(), Some("PL 2 0 500 1000 2000"));
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn fractional_units_are_rounded_to_hundredths() {
        assert_eq!(to_units(1, 1000), 10.42);
        assert_eq!(to_units(3, 96), 3.0);
    }
}
