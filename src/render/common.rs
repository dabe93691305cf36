use glam::{Mat4, Vec3};

use crate::light::{LightKind, LightSource};
use crate::scene::Scene;

/// Camera parameters consumed by a renderer's uniform buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraParams {
    pub view_proj: Mat4,
    pub position: Vec3,
}

/// Lighting state consumed by a renderer's uniform buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct LightParams {
    pub kind: LightKind,
    pub position: Vec3,
    /// Direction the light points in; zero for ambient and point lights.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl LightParams {
    /// Flattens the scene's active light. An unlit scene yields a black
    /// light of kind [`LightKind::None`].
    pub fn from_scene(scene: &Scene) -> Self {
        let Some(attached) = scene.light() else {
            return Self {
                kind: LightKind::None,
                position: Vec3::ZERO,
                direction: Vec3::ZERO,
                color: Vec3::ZERO,
                intensity: 0.0,
            };
        };
        let light = &attached.light;
        let direction = match light.source {
            LightSource::Ambient | LightSource::Point { .. } => Vec3::ZERO,
            LightSource::Directional { target } | LightSource::Spot { target, .. } => {
                (target - light.position).normalize_or_zero()
            }
        };
        Self {
            kind: light.kind(),
            position: light.position,
            direction,
            color: light.color,
            intensity: light.intensity,
        }
    }
}
