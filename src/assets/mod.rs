//! Asset factory and the loader seam it depends on.

pub mod catalog;
pub mod factory;
pub mod fs;
pub mod pending;
pub mod primitives;

use std::path::Path;

use anyhow::Result;
use thiserror::Error;

use crate::material::TextureHandle;
use crate::mesh::Mesh;

pub use catalog::{ModelCatalog, ModelEntry};
pub use factory::{AssetFactory, TextureWardrobe};
pub use fs::FsAssetLoader;
pub use pending::{LoadCompletion, PendingLoad, PendingLoads};

/// Model and texture fetching supplied by the host.
///
/// `load_model` runs on loader threads, never on the thread that owns the
/// scene.
pub trait AssetLoader: Send + Sync {
    fn load_model(&self, path: &Path) -> Result<Mesh>;

    /// Never fails: an unreadable texture comes back as
    /// [`TextureHandle::missing`] and the surface renders untextured.
    fn load_texture(&self, path: &Path) -> TextureHandle;
}

/// An external model request that will never reach the scene.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to load model {model_id}: {cause}")]
pub struct LoadError {
    pub model_id: String,
    pub cause: String,
}
