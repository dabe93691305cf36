use std::ops::Range;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::input::KeyBindings;

/// Tunables for a sandbox session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Inclusive range the per-session object count is drawn from.
    pub min_objects: usize,
    pub max_objects: usize,
    /// Half extent of the spawn region on the x and z axes.
    pub horizontal_extent: f32,
    /// Half extent of the spawn region on the y axis.
    pub vertical_extent: f32,
    /// Chance that a slot requests an external model instead of a primitive.
    pub model_probability: f64,
    pub primitive_size: Range<f32>,
    /// Per-axis bound of the rotation increment applied every tick.
    pub max_angular_velocity: f32,
    /// Camera speed in units per second.
    pub movement_speed: f32,
    pub key_bindings: KeyBindings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub asset_root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            min_objects: 5,
            max_objects: 30,
            horizontal_extent: 10.0,
            vertical_extent: 1.0,
            model_probability: 0.3,
            primitive_size: 0.1..0.5,
            max_angular_velocity: 0.05,
            movement_speed: 5.0,
            key_bindings: KeyBindings::default(),
            seed: None,
            asset_root: PathBuf::from("."),
            catalog: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_session_constants() {
        let config = SandboxConfig::default();
        assert_eq!((config.min_objects, config.max_objects), (5, 30));
        assert_eq!(config.movement_speed, 5.0);
        assert_eq!(config.primitive_size, 0.1..0.5);
        assert!((config.model_probability - 0.3).abs() < f64::EPSILON);
    }
}
