use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use rand::Rng;
use roxmltree::{Document, Node};

/// External model with its companion texture. Source meshes are not
/// normalized, so each entry carries the uniform scale it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub name: String,
    pub mesh: PathBuf,
    pub texture: PathBuf,
    pub scale: f32,
}

impl ModelEntry {
    pub fn new(
        name: impl Into<String>,
        mesh: impl Into<PathBuf>,
        texture: impl Into<PathBuf>,
        scale: f32,
    ) -> Self {
        Self {
            name: name.into(),
            mesh: mesh.into(),
            texture: texture.into(),
            scale,
        }
    }
}

/// Fixed list of models the population step can request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                ModelEntry::new("bird", "modelos/bird.obj", "modelos/bird_texture.jpg", 0.02),
                ModelEntry::new(
                    "tiger",
                    "modelos/tiger.obj",
                    "modelos/tiger_texture.jpg",
                    0.005,
                ),
            ],
        }
    }
}

impl ModelCatalog {
    pub fn new(entries: Vec<ModelEntry>) -> Result<Self> {
        if entries.is_empty() {
            bail!("model catalog must list at least one model");
        }
        Ok(Self { entries })
    }

    /// Reads a catalog manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path)
            .with_context(|| format!("unable to read catalog {}", path.display()))?;
        Self::from_xml(&xml).with_context(|| format!("invalid catalog {}", path.display()))
    }

    /// Parses a manifest of the form
    /// `<catalog><model><name/><mesh/><texture/><scale/></model></catalog>`.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid catalog XML")?;
        let entries = document
            .descendants()
            .filter(|node| node.has_tag_name("model"))
            .map(|node| -> Result<ModelEntry> {
                let name = required_text(&node, "name")?;
                let scale = match optional_text(&node, "scale") {
                    Some(text) => text
                        .parse::<f32>()
                        .map_err(|err| anyhow!("model {name}: invalid scale: {err}"))?,
                    None => 1.0,
                };
                if !(scale.is_finite() && scale > 0.0) {
                    bail!("model {name}: scale must be positive");
                }
                Ok(ModelEntry {
                    mesh: PathBuf::from(required_text(&node, "mesh")?),
                    texture: PathBuf::from(required_text(&node, "texture")?),
                    name,
                    scale,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn choose<R: Rng>(&self, rng: &mut R) -> &ModelEntry {
        // construction guarantees a non-empty list
        &self.entries[rng.gen_range(0..self.entries.len())]
    }
}

fn required_text(node: &Node<'_, '_>, tag: &str) -> Result<String> {
    optional_text(node, tag).ok_or_else(|| anyhow!("<{tag}> tag is missing"))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLE: &str = r#"
    <catalog>
        <model>
            <name>fox</name>
            <mesh>models/fox.obj</mesh>
            <texture>models/fox.png</texture>
            <scale>0.1</scale>
        </model>
        <model>
            <name>crate</name>
            <mesh>models/crate.obj</mesh>
            <texture>models/crate.png</texture>
        </model>
    </catalog>
    "#;

    #[test]
    fn parses_manifest_entries() {
        let catalog = ModelCatalog::from_xml(SAMPLE).unwrap();
        assert_eq!(catalog.entries().len(), 2);
        let fox = &catalog.entries()[0];
        assert_eq!(fox.name, "fox");
        assert_eq!(fox.mesh, PathBuf::from("models/fox.obj"));
        assert!((fox.scale - 0.1).abs() < f32::EPSILON);
        assert_eq!(catalog.entries()[1].scale, 1.0);
    }

    #[test]
    fn rejects_incomplete_or_empty_manifests() {
        assert!(ModelCatalog::from_xml("<catalog/>").is_err());
        let missing_texture = "<catalog><model><name>a</name><mesh>a.obj</mesh></model></catalog>";
        assert!(ModelCatalog::from_xml(missing_texture).is_err());
        let bad_scale = "<catalog><model><name>a</name><mesh>a.obj</mesh>\
                         <texture>a.png</texture><scale>-1</scale></model></catalog>";
        assert!(ModelCatalog::from_xml(bad_scale).is_err());
    }

    #[test]
    fn default_catalog_lists_bird_and_tiger() {
        let catalog = ModelCatalog::default();
        let names: Vec<_> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bird", "tiger"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(names.contains(&catalog.choose(&mut rng).name.as_str()));
        }
    }
}
