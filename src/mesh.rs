use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Floats per interleaved vertex: `position.xyz` followed by `normal.xyz`.
pub const VERTEX_STRIDE: usize = 6;

/// Indexed triangle mesh with interleaved position/normal vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let start = index * VERTEX_STRIDE;
        Vec3::from_slice(&self.vertices[start..start + 3])
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        let start = index * VERTEX_STRIDE + 3;
        Vec3::from_slice(&self.vertices[start..start + 3])
    }

    pub(crate) fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&[
            position.x, position.y, position.z, normal.x, normal.y, normal.z,
        ]);
        index
    }

    /// True when any vertex carries a zero normal.
    pub fn has_missing_normals(&self) -> bool {
        self.vertices
            .chunks_exact(VERTEX_STRIDE)
            .any(|chunk| chunk[3] == 0.0 && chunk[4] == 0.0 && chunk[5] == 0.0)
    }

    /// Replaces every normal with the area-weighted average of the faces
    /// sharing the vertex.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertex_count()];

        for triangle in self.indices.chunks_exact(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;
            let p0 = self.position(i0);
            let p1 = self.position(i1);
            let p2 = self.position(i2);
            let normal = (p1 - p0).cross(p2 - p0);
            if normal.length_squared() > f32::EPSILON * f32::EPSILON {
                accum[i0] += normal;
                accum[i1] += normal;
                accum[i2] += normal;
            }
        }

        for (i, normal) in accum.into_iter().enumerate() {
            let normal = normal.normalize_or_zero();
            let start = i * VERTEX_STRIDE + 3;
            self.vertices[start..start + 3].copy_from_slice(&normal.to_array());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::default();
        mesh.push_vertex(Vec3::ZERO, Vec3::ZERO);
        mesh.push_vertex(Vec3::X, Vec3::ZERO);
        mesh.push_vertex(Vec3::Y, Vec3::ZERO);
        mesh.indices = vec![0, 1, 2];
        mesh
    }

    #[test]
    fn recompute_fills_missing_normals() {
        let mut mesh = triangle();
        assert!(mesh.has_missing_normals());
        mesh.recompute_normals();
        assert!(!mesh.has_missing_normals());
        for i in 0..mesh.vertex_count() {
            assert!((mesh.normal(i) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn recompute_overwrites_wrong_normals() {
        let mut mesh = triangle();
        for i in 0..3 {
            let start = i * VERTEX_STRIDE + 3;
            mesh.vertices[start..start + 3].copy_from_slice(&[1.0, 0.0, 0.0]);
        }
        mesh.recompute_normals();
        assert!((mesh.normal(1) - Vec3::Z).length() < 1e-6);
    }
}
