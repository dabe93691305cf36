use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use parking_lot::RwLock;

use super::AssetLoader;
use crate::material::TextureHandle;
use crate::mesh::Mesh;
use crate::obj::decode_obj;

/// Loads OBJ meshes and texture files relative to an asset root.
///
/// Texture lookups are cached; loader threads share the cache.
#[derive(Debug)]
pub struct FsAssetLoader {
    root: PathBuf,
    textures: RwLock<HashMap<PathBuf, TextureHandle>>,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cached_textures(&self) -> usize {
        self.textures.read().len()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetLoader for FsAssetLoader {
    fn load_model(&self, path: &Path) -> Result<Mesh> {
        let full = self.resolve(path);
        let source = fs::read_to_string(&full)
            .with_context(|| format!("unable to read {}", full.display()))?;
        decode_obj(&source).with_context(|| format!("unable to decode {}", full.display()))
    }

    fn load_texture(&self, path: &Path) -> TextureHandle {
        if let Some(handle) = self.textures.read().get(path) {
            return handle.clone();
        }
        let full = self.resolve(path);
        let handle = match fs::metadata(&full) {
            Ok(meta) if meta.is_file() => TextureHandle::ready(path, meta.len() as usize),
            Ok(_) | Err(_) => {
                warn!("texture {} unavailable; rendering untextured", full.display());
                TextureHandle::missing(path)
            }
        };
        self.textures
            .write()
            .entry(path.to_path_buf())
            .or_insert(handle)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_models_and_textures_from_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut obj = fs::File::create(dir.path().join("tri.obj")).unwrap();
        writeln!(obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        fs::write(dir.path().join("skin.jpg"), [0u8; 32]).unwrap();

        let loader = FsAssetLoader::new(dir.path());
        let mesh = loader.load_model(Path::new("tri.obj")).unwrap();
        assert_eq!(mesh.triangle_count(), 1);

        let texture = loader.load_texture(Path::new("skin.jpg"));
        assert!(texture.is_ready());
        assert_eq!(texture.path(), Path::new("skin.jpg"));
        assert_eq!(loader.cached_textures(), 1);
    }

    #[test]
    fn missing_assets_degrade_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsAssetLoader::new(dir.path());
        assert!(loader.load_model(Path::new("absent.obj")).is_err());
        let texture = loader.load_texture(Path::new("absent.png"));
        assert!(!texture.is_ready());
        assert_eq!(loader.load_texture(Path::new("absent.png")), texture);
        assert_eq!(loader.cached_textures(), 1);
    }
}
