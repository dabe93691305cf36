use std::fmt;

use glam::Vec3;
use log::debug;

use crate::light::{AttachedLight, LightKind};
use crate::material::Material;
use crate::mesh::Mesh;

/// Identifier handed out when an object is attached to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The procedural shapes the asset factory can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Cube,
    Pyramid,
}

/// Geometry of a scene object together with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Cube { size: f32 },
    Pyramid { radius: f32 },
    ExternalModel { model_id: String },
}

impl Geometry {
    pub fn kind_name(&self) -> &str {
        match self {
            Geometry::Cube { .. } => "cube",
            Geometry::Pyramid { .. } => "pyramid",
            Geometry::ExternalModel { model_id } => model_id,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Geometry::ExternalModel { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians. Never wrapped.
    pub rotation: Vec3,
    /// Uniform scale; external models carry a per-model factor.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

/// Fully built object that has not been placed in the scene yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub geometry: Geometry,
    pub mesh: Mesh,
    pub material: Material,
    pub scale: f32,
}

/// Object attached to the scene and animated every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub geometry: Geometry,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
    /// Rotation increment added every tick, fixed at attach time.
    pub angular_velocity: Vec3,
}

/// Static ground grid drawn for orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
}

impl Default for GridHelper {
    fn default() -> Self {
        Self {
            size: 200.0,
            divisions: 50,
        }
    }
}

/// Every attached object plus the active light.
///
/// The object list doubles as the animation registry: an object becomes
/// visible to the scheduler in the same call that attaches it, with its
/// angular velocity already set.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    light: Option<AttachedLight>,
    next_id: u64,
    pub grid: GridHelper,
    pub background: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            light: None,
            next_id: 1,
            grid: GridHelper::default(),
            background: Vec3::new(0xab as f32, 0xcd as f32, 0xef as f32) / 255.0,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a prototype and registers it for animation.
    pub fn attach(
        &mut self,
        prototype: Prototype,
        position: Vec3,
        angular_velocity: Vec3,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        debug!(
            "attached {} {} at ({:.2}, {:.2}, {:.2})",
            prototype.geometry.kind_name(),
            id,
            position.x,
            position.y,
            position.z
        );
        self.objects.push(SceneObject {
            id,
            geometry: prototype.geometry,
            mesh: prototype.mesh,
            material: prototype.material,
            transform: Transform {
                position,
                rotation: Vec3::ZERO,
                scale: prototype.scale,
            },
            angular_velocity,
        });
        id
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Adds every object's angular velocity to its rotation.
    pub fn advance_rotations(&mut self) -> usize {
        for object in &mut self.objects {
            object.transform.rotation += object.angular_velocity;
        }
        self.objects.len()
    }

    pub fn light(&self) -> Option<&AttachedLight> {
        self.light.as_ref()
    }

    pub(crate) fn light_mut(&mut self) -> Option<&mut AttachedLight> {
        self.light.as_mut()
    }

    /// Swaps the attached light (and its helper) in one step, returning the
    /// pair that was detached. This is the only way to attach a light.
    pub(crate) fn replace_light(&mut self, next: Option<AttachedLight>) -> Option<AttachedLight> {
        std::mem::replace(&mut self.light, next)
    }

    pub fn light_kind(&self) -> LightKind {
        self.light
            .as_ref()
            .map_or(LightKind::None, |attached| attached.light.kind())
    }

    pub fn light_count(&self) -> usize {
        usize::from(self.light.is_some())
    }

    pub fn helper_count(&self) -> usize {
        usize::from(
            self.light
                .as_ref()
                .is_some_and(|attached| attached.helper.is_some()),
        )
    }
}
