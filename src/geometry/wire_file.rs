//! Text format for [`WireList`]s.
//!
//! ```text
//! DW
//! #2
//! (255,0,0)
//! 0 0 0 10 0 0
//! 10 0 0 10 10 0
//! ```
//!
//! The `#N` count line is optional when reading; without it the record
//! count is found by scanning the file. A color token (a color name or
//! `(r,g,b)`) sets the color of every following segment. The writer always
//! emits the count and only repeats a color when it changes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::{LineSegment, WireList};
use crate::colors;
use crate::error::{LoadError, RenderError};
use crate::math::vec3::Vec3;

pub const WIRE_HEADER: &str = "DW";

pub fn load_wires<P: AsRef<Path>>(path: P) -> Result<WireList, LoadError> {
    let contents = fs::read_to_string(path)?;
    parse_wires(&contents)
}

pub fn save_wires<P: AsRef<Path>>(list: &WireList, path: P) -> Result<(), LoadError> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write_wires(list, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Parses a number token, rejecting NaN and infinities.
pub(crate) fn parse_number(token: &str) -> Option<Result<f32, ()>> {
    let value = token.parse::<f32>().ok()?;
    Some(if value.is_finite() { Ok(value) } else { Err(()) })
}

/// Splits off the header token and the optional `#N` count.
pub(crate) fn parse_preamble<'a>(
    text: &'a str,
    expected: &'static str,
) -> Result<(Option<usize>, Vec<&'a str>), LoadError> {
    let mut tokens = text.split_whitespace();
    let header = tokens.next().unwrap_or_default();
    if header != expected {
        return Err(LoadError::BadHeader {
            expected,
            found: header.to_string(),
        });
    }

    let mut rest: Vec<&str> = tokens.collect();
    let declared = match rest.first().and_then(|t| t.strip_prefix('#')) {
        Some(count) => {
            let count = count.parse::<usize>().map_err(|_| LoadError::BadNumber {
                token: rest[0].to_string(),
                record: 0,
            })?;
            rest.remove(0);
            Some(count)
        }
        None => None,
    };
    Ok((declared, rest))
}

pub fn parse_wires(text: &str) -> Result<WireList, LoadError> {
    let (declared, tokens) = parse_preamble(text, WIRE_HEADER)?;

    let capacity = match declared {
        Some(count) => count.min(tokens.len() / 6),
        None => tokens.iter().filter(|t| parse_number(t).is_some()).count() / 6,
    };
    let mut segments = Vec::new();
    segments
        .try_reserve_exact(capacity)
        .map_err(|_| RenderError::Allocation {
            what: "wire list",
            count: capacity,
        })?;

    let mut color = colors::BLACK;
    let mut i = 0;
    let limit = declared.unwrap_or(usize::MAX);
    while i < tokens.len() && segments.len() < limit {
        let record = segments.len() + 1;
        let token = tokens[i];
        if parse_number(token).is_none() {
            color = colors::parse(token).ok_or_else(|| LoadError::BadColor {
                token: token.to_string(),
                record,
            })?;
            i += 1;
            continue;
        }

        let fields = tokens
            .get(i..i + 6)
            .ok_or(LoadError::Truncated { record, expected: 6 })?;
        let mut values = [0.0f32; 6];
        for (value, token) in values.iter_mut().zip(fields) {
            *value = match parse_number(token) {
                Some(Ok(v)) => v,
                Some(Err(())) | None => {
                    return Err(LoadError::BadNumber {
                        token: token.to_string(),
                        record,
                    })
                }
            };
        }
        segments.push(LineSegment::new(
            Vec3::new(values[0], values[1], values[2]),
            Vec3::new(values[3], values[4], values[5]),
            color,
        ));
        i += 6;
    }

    if let Some(declared) = declared {
        if segments.len() != declared {
            return Err(LoadError::CountMismatch {
                declared,
                found: segments.len(),
            });
        }
    }
    log::debug!("parsed {} wire segments", segments.len());
    Ok(WireList::from(segments))
}

pub fn write_wires<W: Write>(list: &WireList, w: &mut W) -> io::Result<()> {
    writeln!(w, "{}", WIRE_HEADER)?;
    writeln!(w, "#{}", list.len())?;
    let mut current = None;
    for s in list.iter() {
        if current != Some(s.color) {
            writeln!(w, "{}", colors::format(s.color))?;
            current = Some(s.color);
        }
        writeln!(
            w,
            "{} {} {} {} {} {}",
            s.start.x, s.start.y, s.start.z, s.end.x, s.end.y, s.end.z
        )?;
    }
    Ok(())
}
