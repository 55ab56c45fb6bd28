//! Wavefront OBJ import into a [`PatchList`].

use std::io::BufRead;
use std::path::Path;

use super::{Patch, PatchList, Vertex};
use crate::colors;
use crate::error::LoadError;
use crate::geometry::patch_file::DEFAULT_PATCH_COLOR;
use crate::math::vec3::Vec3;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: false,
        ..Default::default()
    }
}

/// Loads every object in an OBJ file as patches.
///
/// Faces with three or four corners map to one patch, larger faces are
/// fanned into triangles. All edges are outlined. OBJ is Y-up with
/// counter-clockwise front faces, so positions are turned Z-up and the
/// winding is reversed.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<PatchList, LoadError> {
    let (models, materials) = tobj::load_obj(path.as_ref(), &load_options())?;
    let materials = materials.unwrap_or_else(|e| {
        log::warn!("ignoring OBJ materials: {}", e);
        Vec::new()
    });
    Ok(patches_from_models(&models, &materials))
}

/// Like [`load_obj`] for in-memory data. Material libraries are not resolved.
pub fn parse_obj<R: BufRead>(reader: &mut R) -> Result<PatchList, LoadError> {
    let (models, _) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    Ok(patches_from_models(&models, &[]))
}

fn to_z_up(positions: &[f32], index: u32) -> Option<Vec3> {
    let i = index as usize * 3;
    let p = positions.get(i..i + 3)?;
    Some(Vec3::new(p[0], -p[2], p[1]))
}

pub fn patches_from_models(models: &[tobj::Model], materials: &[tobj::Material]) -> PatchList {
    let mut list = PatchList::new();
    for model in models {
        let mesh = &model.mesh;
        let color = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse)
            .map(|[r, g, b]| colors::pack_color(r, g, b))
            .unwrap_or(DEFAULT_PATCH_COLOR);

        // An empty arity list means every face is a triangle.
        let arities: Vec<u32> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.clone()
        };

        let mut start = 0usize;
        let mut skipped = 0usize;
        for arity in arities {
            let end = start + arity as usize;
            let corners: Option<Vec<Vec3>> = mesh
                .indices
                .get(start..end)
                .and_then(|face| face.iter().rev().map(|&i| to_z_up(&mesh.positions, i)).collect());
            start = end;

            let Some(corners) = corners else {
                skipped += 1;
                continue;
            };
            let vertex = |p: Vec3| Vertex::new(p, true);
            match corners.len() {
                3 => list.push(Patch::triangle(
                    [vertex(corners[0]), vertex(corners[1]), vertex(corners[2])],
                    color,
                )),
                4 => list.push(Patch::quad(
                    [
                        vertex(corners[0]),
                        vertex(corners[1]),
                        vertex(corners[2]),
                        vertex(corners[3]),
                    ],
                    color,
                )),
                n if n > 4 => {
                    for k in 1..n - 1 {
                        // Interior fan edges are not outlined.
                        let mut tri = [
                            vertex(corners[0]),
                            vertex(corners[k]),
                            vertex(corners[k + 1]),
                        ];
                        tri[0].outline = k == 1;
                        tri[2].outline = k == n - 2;
                        list.push(Patch::triangle(tri, color));
                    }
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("skipped {} degenerate faces in OBJ object `{}`", skipped, model.name);
        }
    }
    log::debug!("imported {} patches from OBJ", list.len());
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SQUARE_AND_TRIANGLE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
f 1 2 3
";

    #[test]
    fn faces_become_patches() {
        let list = parse_obj(&mut Cursor::new(SQUARE_AND_TRIANGLE)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.patches()[0].is_quad());
        assert!(!list.patches()[1].is_quad());
        assert!(list.patches()[0].vertices().iter().all(|v| v.outline));
    }

    #[test]
    fn positions_are_converted_to_z_up_with_reversed_winding() {
        let list = parse_obj(&mut Cursor::new(SQUARE_AND_TRIANGLE)).unwrap();
        let tri = &list.patches()[1];
        // Corners 1 2 3 reversed: 3, 2, 1. OBJ (1,1,0) -> (1,0,1).
        assert_eq!(tri.vertices()[0].position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(tri.vertices()[2].position, Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn large_faces_are_fanned() {
        let pentagon = "v 0 0 0\nv 2 0 0\nv 3 1 0\nv 1 2 0\nv -1 1 0\nf 1 2 3 4 5\n";
        let list = parse_obj(&mut Cursor::new(pentagon)).unwrap();
        assert_eq!(list.len(), 3);
    }
}
