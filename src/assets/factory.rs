use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use glam::Vec3;
use log::debug;
use rand::Rng;

use super::catalog::{ModelCatalog, ModelEntry};
use super::pending::{LoadCompletion, PendingLoad, PendingLoads};
use super::primitives::{self, CUBE_FACES, CUBE_FACE_VERTICES, PYRAMID_FACES, PYRAMID_FACE_VERTICES};
use super::{AssetLoader, LoadError};
use crate::material::Material;
use crate::scene::{Geometry, PrimitiveKind, Prototype};

/// Texture set used by textured primitives: one per cube face, in face
/// order. Pyramids draw a single diffuse map from the same set.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureWardrobe {
    faces: [PathBuf; CUBE_FACES],
}

impl Default for TextureWardrobe {
    fn default() -> Self {
        Self {
            faces: [
                "textures/crate.jpg",
                "textures/brick.jpg",
                "textures/marble.jpg",
                "textures/wood.jpg",
                "textures/metal.jpg",
                "textures/stone.jpg",
            ]
            .map(PathBuf::from),
        }
    }
}

impl TextureWardrobe {
    pub fn new(faces: [PathBuf; CUBE_FACES]) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[PathBuf] {
        &self.faces
    }
}

/// Builds primitives on the calling thread and hands model loads to loader
/// threads.
pub struct AssetFactory {
    loader: Arc<dyn AssetLoader>,
    catalog: ModelCatalog,
    wardrobe: TextureWardrobe,
    size_range: Range<f32>,
}

impl AssetFactory {
    pub fn new(loader: Arc<dyn AssetLoader>, catalog: ModelCatalog) -> Self {
        Self {
            loader,
            catalog,
            wardrobe: TextureWardrobe::default(),
            size_range: 0.1..0.5,
        }
    }

    pub fn with_wardrobe(mut self, wardrobe: TextureWardrobe) -> Self {
        self.wardrobe = wardrobe;
        self
    }

    pub fn with_size_range(mut self, size_range: Range<f32>) -> Self {
        self.size_range = size_range;
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Synthesizes a cube or pyramid of random size, either flat colored per
    /// face or textured, each with even odds.
    pub fn create_primitive<R: Rng>(&self, rng: &mut R, kind: PrimitiveKind) -> Prototype {
        let size = rng.gen_range(self.size_range.clone());
        let colored = rng.gen_bool(0.5);
        let (geometry, mesh, faces, vertices_per_face) = match kind {
            PrimitiveKind::Cube => (
                Geometry::Cube { size },
                primitives::cube(size),
                CUBE_FACES,
                CUBE_FACE_VERTICES,
            ),
            PrimitiveKind::Pyramid => (
                Geometry::Pyramid { radius: size },
                primitives::pyramid(size),
                PYRAMID_FACES,
                PYRAMID_FACE_VERTICES,
            ),
        };

        let material = if colored {
            Material::FaceColors {
                colors: (0..faces).map(|_| random_color(rng)).collect(),
                vertices_per_face,
            }
        } else {
            let maps = match kind {
                PrimitiveKind::Cube => self
                    .wardrobe
                    .faces()
                    .iter()
                    .map(|path| self.loader.load_texture(path))
                    .collect::<Vec<_>>(),
                PrimitiveKind::Pyramid => {
                    let path = &self.wardrobe.faces()[rng.gen_range(0..CUBE_FACES)];
                    vec![self.loader.load_texture(path)]
                }
            };
            Material::Textured { maps }
        };

        Prototype {
            geometry,
            mesh,
            material,
            scale: 1.0,
        }
    }

    /// Picks a catalog model and loads it on a loader thread. The result is
    /// delivered through `loads`; the caller never waits on it here.
    pub fn request_external_model<R: Rng>(
        &self,
        rng: &mut R,
        target_position: Vec3,
        loads: &mut PendingLoads,
    ) -> PendingLoad {
        let entry = self.catalog.choose(rng).clone();
        let request = PendingLoad {
            model_id: entry.name.clone(),
            mesh_path: entry.mesh.clone(),
            texture_path: entry.texture.clone(),
            target_position,
        };
        let reply = loads.issue();
        let loader = Arc::clone(&self.loader);
        let job = request.clone();
        let spawned = thread::Builder::new()
            .name(format!("load-{}", entry.name))
            .spawn({
                let reply = reply.clone();
                move || {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        resolve_model(loader.as_ref(), &entry)
                    }))
                    .unwrap_or_else(|_| {
                        Err(LoadError {
                            model_id: entry.name.clone(),
                            cause: "loader panicked".into(),
                        })
                    });
                    // the receiver lives as long as the session
                    let _ = reply.send(LoadCompletion {
                        request: job,
                        result,
                    });
                }
            });

        if let Err(err) = spawned {
            let _ = reply.send(LoadCompletion {
                request: request.clone(),
                result: Err(LoadError {
                    model_id: request.model_id.clone(),
                    cause: format!("unable to start loader thread: {err}"),
                }),
            });
        }
        debug!("requested model {}", request.model_id);
        request
    }
}

/// Loads the mesh and texture for a catalog entry. Normals are always
/// recomputed since some source meshes ship with broken ones.
pub fn resolve_model(loader: &dyn AssetLoader, entry: &ModelEntry) -> Result<Prototype, LoadError> {
    let mut mesh = loader
        .load_model(Path::new(&entry.mesh))
        .map_err(|err| LoadError {
            model_id: entry.name.clone(),
            cause: format!("{err:#}"),
        })?;
    mesh.recompute_normals();
    let texture = loader.load_texture(&entry.texture);
    Ok(Prototype {
        geometry: Geometry::ExternalModel {
            model_id: entry.name.clone(),
        },
        mesh,
        material: Material::Textured {
            maps: vec![texture],
        },
        scale: entry.scale,
    })
}

fn random_color<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(rng.gen(), rng.gen(), rng.gen())
}
