//! Wavefront OBJ decoding for externally loaded models.

use std::collections::HashMap;
use std::str::SplitWhitespace;

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec3;

use crate::mesh::Mesh;

/// Decodes an OBJ document into an indexed [`Mesh`].
///
/// Polygons are fan-triangulated and negative (relative) indices are
/// resolved. Normals present in the file are kept; vertices without one get
/// a zero normal, so callers that need lighting should run
/// [`Mesh::recompute_normals`].
pub fn decode_obj(source: &str) -> Result<Mesh> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut triangles: Vec<[Corner; 3]> = Vec::new();

    for (line_no, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => positions.push(
                parse_vec3(&mut parts)
                    .with_context(|| format!("invalid vertex on line {}", line_no + 1))?,
            ),
            Some("vn") => normals.push(
                parse_vec3(&mut parts)
                    .with_context(|| format!("invalid normal on line {}", line_no + 1))?,
            ),
            Some("f") => {
                let polygon = parse_polygon(parts)
                    .with_context(|| format!("invalid face on line {}", line_no + 1))?;
                for i in 1..polygon.len() - 1 {
                    triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("OBJ document does not define any vertices");
    }
    if triangles.is_empty() {
        bail!("OBJ document does not define any faces");
    }

    assemble(&positions, &normals, &triangles)
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    position: i32,
    normal: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CornerKey {
    position: usize,
    normal: Option<usize>,
}

fn parse_vec3(parts: &mut SplitWhitespace<'_>) -> Result<Vec3> {
    let mut component = || -> Result<f32> {
        let text = parts
            .next()
            .ok_or_else(|| anyhow!("missing vector component"))?;
        Ok(text.parse::<f32>()?)
    };
    Ok(Vec3::new(component()?, component()?, component()?))
}

fn parse_polygon(parts: SplitWhitespace<'_>) -> Result<Vec<Corner>> {
    let corners = parts
        .map(|part| {
            let mut segments = part.split('/');
            let position = segments
                .next()
                .ok_or_else(|| anyhow!("missing vertex index"))?
                .parse::<i32>()?;
            // texture coordinate slot is skipped; textures are applied per object
            let _ = segments.next();
            let normal = match segments.next() {
                Some(text) if !text.is_empty() => text.parse::<i32>()?,
                _ => 0,
            };
            Ok(Corner { position, normal })
        })
        .collect::<Result<Vec<_>>>()?;
    if corners.len() < 3 {
        bail!("faces must reference at least 3 vertices");
    }
    Ok(corners)
}

fn assemble(positions: &[Vec3], normals: &[Vec3], triangles: &[[Corner; 3]]) -> Result<Mesh> {
    let mut lookup: HashMap<CornerKey, u32> = HashMap::new();
    let mut mesh = Mesh::default();

    for corner in triangles.iter().flatten() {
        let position = resolve_index(corner.position, positions.len())
            .ok_or_else(|| anyhow!("vertex index {} out of range", corner.position))?;
        let key = CornerKey {
            position,
            normal: resolve_index(corner.normal, normals.len()),
        };
        let index = match lookup.get(&key) {
            Some(index) => *index,
            None => {
                let normal = key.normal.map(|i| normals[i]).unwrap_or(Vec3::ZERO);
                let index = mesh.push_vertex(positions[position], normal);
                lookup.insert(key, index);
                index
            }
        };
        mesh.indices.push(index);
    }

    Ok(mesh)
}

fn resolve_index(index: i32, len: usize) -> Option<usize> {
    match index {
        0 => None,
        i if i > 0 => {
            let zero_based = i as usize - 1;
            (zero_based < len).then_some(zero_based)
        }
        i => {
            let back = i.unsigned_abs() as usize;
            (back <= len).then(|| len - back)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_triangle() {
        let mesh = decode_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.has_missing_normals());
    }

    #[test]
    fn triangulates_quads_and_resolves_relative_indices() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf -4 -3 -2 -1\n";
        let mesh = decode_obj(obj).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn keeps_declared_normals() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh = decode_obj(obj).unwrap();
        assert!(!mesh.has_missing_normals());
        assert_eq!(mesh.normal(0), Vec3::Z);
    }

    #[test]
    fn rejects_documents_without_geometry() {
        assert!(decode_obj("# nothing here\n").is_err());
        assert!(decode_obj("v 0 0 0\n").is_err());
        assert!(decode_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").is_err());
    }
}
