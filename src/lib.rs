//! Runtime scene-state engine for a procedural 3D sandbox.
//!
//! The crate populates a scene with random primitives and externally loaded
//! models, tracks keyboard input, keeps a single UI-controlled light and
//! drives the per-frame update. Rasterization, windowing and asset decoding
//! beyond OBJ stay behind the [`Renderer`], [`CameraController`] and
//! [`AssetLoader`] seams so the engine runs headless and in tests.

pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod input;
pub mod light;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod population;
pub mod render;
pub mod scene;
pub mod scheduler;

pub use app::{print_final_state, Sandbox};
pub use assets::{AssetFactory, AssetLoader, FsAssetLoader, LoadError, ModelCatalog};
pub use camera::{CameraController, FirstPersonCamera};
pub use config::SandboxConfig;
pub use input::{Direction, InputState, KeyBindings, KeyCode, NamedKey};
pub use light::{InputError, LightController, LightKind};
pub use mesh::Mesh;
pub use obj::decode_obj;
pub use population::ScenePopulator;
pub use render::{CameraParams, LightParams, Renderer, SummaryRenderer};
pub use scene::{Geometry, ObjectId, PrimitiveKind, Scene, SceneObject};
pub use scheduler::{AnimationScheduler, TickReport};
