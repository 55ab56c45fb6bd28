//! Text format for [`PatchList`]s.
//!
//! ```text
//! DP
//! #2
//! -1 (200,40,40)
//! -2 0
//! 15 (0 0 0) (0 0 1) (1 0 1) (1 0 0)
//! 6 (0 0 0) (1 0 0) (0 0 1)
//! ```
//!
//! `-1 <color>` sets the current color and `-2 <n>` the current
//! transparency (0..=255). Any other record starts with a flag integer:
//! bit 0 marks a quadrilateral, bit `1 + i` gives vertex `i` an outline
//! edge. Parentheses around coordinate triples are optional when reading.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::wire_file::{parse_number, parse_preamble};
use super::{Patch, PatchList, Vertex};
use crate::colors;
use crate::error::{LoadError, RenderError};
use crate::math::vec3::Vec3;

pub const PATCH_HEADER: &str = "DP";

const SET_COLOR: i32 = -1;
const SET_TRANSPARENCY: i32 = -2;
const FLAG_QUAD: u32 = 1;
const FLAG_ALL: u32 = 0b11111;

pub const DEFAULT_PATCH_COLOR: u32 = colors::GRAY;

pub fn load_patches<P: AsRef<Path>>(path: P) -> Result<PatchList, LoadError> {
    let contents = fs::read_to_string(path)?;
    parse_patches(&contents)
}

pub fn save_patches<P: AsRef<Path>>(list: &PatchList, path: P) -> Result<(), LoadError> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    write_patches(list, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Flag word for a patch: quad bit plus one outline bit per vertex.
pub fn patch_flags(patch: &Patch) -> u32 {
    let outlines = patch
        .vertices()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.outline)
        .fold(0, |acc, (i, _)| acc | (1 << (i + 1)));
    outlines | if patch.is_quad() { FLAG_QUAD } else { 0 }
}

fn coordinate(token: &str, record: usize) -> Result<f32, LoadError> {
    let trimmed = token.trim_matches(|c| c == '(' || c == ')');
    match parse_number(trimmed) {
        Some(Ok(v)) => Ok(v),
        _ => Err(LoadError::BadNumber {
            token: token.to_string(),
            record,
        }),
    }
}

pub fn parse_patches(text: &str) -> Result<PatchList, LoadError> {
    let (declared, tokens) = parse_preamble(text, PATCH_HEADER)?;

    let capacity = declared.unwrap_or(0).min(tokens.len() / 10);
    let mut patches = Vec::new();
    patches
        .try_reserve_exact(capacity)
        .map_err(|_| RenderError::Allocation {
            what: "patch list",
            count: capacity,
        })?;

    let mut color = DEFAULT_PATCH_COLOR;
    let mut transparency = 0u8;
    let mut i = 0;
    let limit = declared.unwrap_or(usize::MAX);
    while i < tokens.len() && patches.len() < limit {
        let record = patches.len() + 1;
        let token = tokens[i];
        let code = token.parse::<i32>().map_err(|_| LoadError::BadFlags {
            token: token.to_string(),
            record,
        })?;

        match code {
            SET_COLOR => {
                let value = tokens
                    .get(i + 1)
                    .ok_or(LoadError::Truncated { record, expected: 2 })?;
                color = colors::parse(value).ok_or_else(|| LoadError::BadColor {
                    token: value.to_string(),
                    record,
                })?;
                i += 2;
            }
            SET_TRANSPARENCY => {
                let value = tokens
                    .get(i + 1)
                    .ok_or(LoadError::Truncated { record, expected: 2 })?;
                transparency = value.parse::<u8>().map_err(|_| LoadError::BadNumber {
                    token: value.to_string(),
                    record,
                })?;
                i += 2;
            }
            flags if flags >= 0 && (flags as u32) & !FLAG_ALL == 0 => {
                let flags = flags as u32;
                let count = if flags & FLAG_QUAD != 0 { 4 } else { 3 };
                let fields = tokens
                    .get(i + 1..i + 1 + count * 3)
                    .ok_or(LoadError::Truncated {
                        record,
                        expected: 1 + count * 3,
                    })?;

                let mut vertices = [Vertex::default(); 4];
                for (index, (vertex, xyz)) in vertices.iter_mut().zip(fields.chunks(3)).enumerate() {
                    vertex.position = Vec3::new(
                        coordinate(xyz[0], record)?,
                        coordinate(xyz[1], record)?,
                        coordinate(xyz[2], record)?,
                    );
                    vertex.outline = flags & (1 << (index + 1)) != 0;
                }

                let patch = if count == 4 {
                    Patch::quad(vertices, color)
                } else {
                    Patch::triangle([vertices[0], vertices[1], vertices[2]], color)
                };
                patches.push(patch.with_transparency(transparency));
                i += 1 + count * 3;
            }
            _ => {
                return Err(LoadError::BadFlags {
                    token: token.to_string(),
                    record,
                })
            }
        }
    }

    if let Some(declared) = declared {
        if patches.len() != declared {
            return Err(LoadError::CountMismatch {
                declared,
                found: patches.len(),
            });
        }
    }
    log::debug!("parsed {} patches", patches.len());
    Ok(PatchList::from(patches))
}

pub fn write_patches<W: Write>(list: &PatchList, w: &mut W) -> io::Result<()> {
    writeln!(w, "{}", PATCH_HEADER)?;
    writeln!(w, "#{}", list.len())?;
    let mut color = None;
    let mut transparency = 0u8;
    for patch in list.iter() {
        if color != Some(patch.color) {
            writeln!(w, "{} {}", SET_COLOR, colors::format(patch.color))?;
            color = Some(patch.color);
        }
        if transparency != patch.transparency {
            writeln!(w, "{} {}", SET_TRANSPARENCY, patch.transparency)?;
            transparency = patch.transparency;
        }
        write!(w, "{}", patch_flags(patch))?;
        for v in patch.vertices() {
            write!(w, " ({} {} {})", v.position.x, v.position.y, v.position.z)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vert(x: f32, y: f32, z: f32, outline: bool) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), outline)
    }

    fn sample() -> PatchList {
        vec![
            Patch::quad(
                [
                    vert(0.0, 0.0, 0.0, true),
                    vert(0.0, 0.0, 1.0, false),
                    vert(1.0, 0.0, 1.0, true),
                    vert(1.0, 0.0, 0.0, true),
                ],
                colors::RED,
            ),
            Patch::triangle(
                [
                    vert(0.5, 2.0, 0.0, false),
                    vert(1.5, 2.0, 0.0, false),
                    vert(0.5, 2.0, 1.25, true),
                ],
                colors::RED,
            )
            .with_transparency(128),
            Patch::triangle(
                [
                    vert(0.0, 0.0, 0.0, true),
                    vert(1.0, 0.0, 0.0, true),
                    vert(0.0, 0.0, 1.0, true),
                ],
                colors::GREEN,
            ),
        ]
        .into()
    }

    #[test]
    fn round_trip_preserves_patches() {
        let list = sample();
        let mut out = Vec::new();
        write_patches(&list, &mut out).unwrap();
        let back = parse_patches(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn flags_encode_shape_and_outlines() {
        let list = sample();
        assert_eq!(patch_flags(&list.patches()[0]), 1 | 2 | 8 | 16);
        assert_eq!(patch_flags(&list.patches()[1]), 8);
        assert_eq!(patch_flags(&list.patches()[2]), 2 | 4 | 8);
    }

    #[test]
    fn directives_are_run_length_compressed() {
        let mut out = Vec::new();
        write_patches(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("-1 ")).count(), 2);
        // transparency goes 0 -> 128 -> 0
        assert_eq!(text.lines().filter(|l| l.starts_with("-2 ")).count(), 2);
    }

    #[test]
    fn unparenthesized_triples_are_accepted() {
        let list = parse_patches("DP 0 0 0 0 1 0 0 0 0 1").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.patches()[0].color, DEFAULT_PATCH_COLOR);
        assert!(!list.patches()[0].is_quad());
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(matches!(
            parse_patches("DP\n#1\n1 (0 0 0) (1 0 0) (1 1 0)\n"),
            Err(LoadError::Truncated { record: 1, .. })
        ));
        assert!(matches!(
            parse_patches("DP\n#1\n64 (0 0 0) (1 0 0) (1 1 0)\n"),
            Err(LoadError::BadFlags { .. })
        ));
        assert!(matches!(
            parse_patches("DW\n#0\n"),
            Err(LoadError::BadHeader { .. })
        ));
    }
}
