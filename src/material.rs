use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Outcome of a texture fetch. A missing texture leaves the surface untextured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureStatus {
    Ready { bytes: usize },
    Missing,
}

/// Reference to a texture asset as handed back by an asset loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureHandle {
    pub path: PathBuf,
    pub status: TextureStatus,
}

impl TextureHandle {
    pub fn ready(path: impl Into<PathBuf>, bytes: usize) -> Self {
        Self {
            path: path.into(),
            status: TextureStatus::Ready { bytes },
        }
    }

    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status: TextureStatus::Missing,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, TextureStatus::Ready { .. })
    }
}

/// Surface description of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Flat-shaded solid colors, one per face. Every vertex of a face shares
    /// the face color.
    FaceColors {
        colors: Vec<Vec3>,
        vertices_per_face: usize,
    },
    /// One texture per face for cubes, or a single diffuse map.
    Textured { maps: Vec<TextureHandle> },
}

impl Material {
    /// Expands face colors into a per-vertex color stream. Textured
    /// materials have no vertex colors.
    pub fn vertex_colors(&self) -> Option<Vec<Vec3>> {
        match self {
            Material::FaceColors {
                colors,
                vertices_per_face,
            } => Some(
                colors
                    .iter()
                    .flat_map(|color| std::iter::repeat(*color).take(*vertices_per_face))
                    .collect(),
            ),
            Material::Textured { .. } => None,
        }
    }

    pub fn textures(&self) -> &[TextureHandle] {
        match self {
            Material::FaceColors { .. } => &[],
            Material::Textured { maps } => maps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_colors_expand_to_flat_vertex_colors() {
        let material = Material::FaceColors {
            colors: vec![Vec3::X, Vec3::Y],
            vertices_per_face: 3,
        };
        let colors = material.vertex_colors().unwrap();
        assert_eq!(colors.len(), 6);
        assert!(colors[..3].iter().all(|c| *c == Vec3::X));
        assert!(colors[3..].iter().all(|c| *c == Vec3::Y));
        assert!(material.textures().is_empty());
    }

    #[test]
    fn textured_material_exposes_maps() {
        let material = Material::Textured {
            maps: vec![TextureHandle::missing("wood.jpg")],
        };
        assert!(material.vertex_colors().is_none());
        assert!(!material.textures()[0].is_ready());
    }
}
