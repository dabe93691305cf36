use glam::Vec3;

use crate::mesh::Mesh;

/// Vertices per cube face.
pub const CUBE_FACE_VERTICES: usize = 4;
pub const CUBE_FACES: usize = 6;
/// Vertices per tetrahedron face; faces do not share vertices.
pub const PYRAMID_FACE_VERTICES: usize = 3;
pub const PYRAMID_FACES: usize = 4;

// unit cube, four vertices per face so each face keeps a flat normal
const CUBE_FACE_NORMALS: [Vec3; CUBE_FACES] = [
    Vec3::Z,
    Vec3::NEG_Z,
    Vec3::NEG_X,
    Vec3::X,
    Vec3::NEG_Y,
    Vec3::Y,
];

const CUBE_CORNERS: [[[f32; 3]; CUBE_FACE_VERTICES]; CUBE_FACES] = [
    [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
    [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
    [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
    [[0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5]],
    [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
    [[-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
];

const CUBE_FACE_INDICES: [[u32; 6]; CUBE_FACES] = [
    [0, 1, 2, 0, 2, 3], // front
    [0, 2, 1, 0, 3, 2], // back
    [0, 1, 2, 0, 2, 3], // left
    [0, 2, 1, 0, 3, 2], // right
    [0, 1, 2, 0, 2, 3], // bottom
    [0, 2, 1, 0, 3, 2], // top
];

const TETRAHEDRON_CORNERS: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
];

const TETRAHEDRON_FACES: [[usize; 3]; PYRAMID_FACES] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

/// Axis aligned cube with edge length `size`, centered on the origin.
pub fn cube(size: f32) -> Mesh {
    let mut mesh = Mesh::default();
    for ((corners, normal), indices) in CUBE_CORNERS
        .iter()
        .zip(CUBE_FACE_NORMALS)
        .zip(CUBE_FACE_INDICES)
    {
        let base = mesh.vertex_count() as u32;
        for corner in corners {
            mesh.push_vertex(Vec3::from_array(*corner) * size, normal);
        }
        mesh.indices.extend(indices.iter().map(|index| base + index));
    }
    mesh
}

/// Regular tetrahedron whose vertices lie on a sphere of `radius`.
pub fn pyramid(radius: f32) -> Mesh {
    let mut mesh = Mesh::default();
    for face in TETRAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from_array(TETRAHEDRON_CORNERS[i]).normalize() * radius);
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for position in [a, b, c] {
            let index = mesh.push_vertex(position, normal);
            mesh.indices.push(index);
        }
    }
    mesh
}
