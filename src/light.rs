//! Single active light driven by UI events.
//!
//! The scene holds at most one [`AttachedLight`]. Selecting a new light type
//! swaps the whole light/helper pair in one step through
//! [`Scene::replace_light`], so a stale light or helper can never survive a
//! transition.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use log::{info, warn};
use thiserror::Error;

use crate::scene::Scene;

pub const BASE_INTENSITY: f32 = 1.0;

/// Light type as selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightKind {
    #[default]
    None,
    Ambient,
    Point,
    Directional,
    Spot,
}

impl LightKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LightKind::None => "none",
            LightKind::Ambient => "ambient",
            LightKind::Point => "point",
            LightKind::Directional => "directional",
            LightKind::Spot => "spot",
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightKind {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(LightKind::None),
            "ambient" => Ok(LightKind::Ambient),
            "point" => Ok(LightKind::Point),
            "directional" => Ok(LightKind::Directional),
            "spot" => Ok(LightKind::Spot),
            _ => Err(InputError::UnknownLightKind(value.to_string())),
        }
    }
}

/// Rejected UI input. The previous light state is kept.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} input {value:?} is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} input {value:?} is not finite")]
    NotFinite { field: &'static str, value: String },
    #[error("unknown light type {0:?}")]
    UnknownLightKind(String),
}

/// Kind-specific light parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    Ambient,
    Point { distance: f32, decay: f32 },
    Directional { target: Vec3 },
    Spot {
        target: Vec3,
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
}

impl LightSource {
    fn for_kind(kind: LightKind) -> Option<Self> {
        match kind {
            LightKind::None => None,
            LightKind::Ambient => Some(LightSource::Ambient),
            LightKind::Point => Some(LightSource::Point {
                distance: 0.0,
                decay: 2.0,
            }),
            LightKind::Directional => Some(LightSource::Directional { target: Vec3::ZERO }),
            LightKind::Spot => Some(LightSource::Spot {
                target: Vec3::ZERO,
                angle: PI / 3.0,
                penumbra: 0.0,
                decay: 2.0,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub source: LightSource,
    pub position: Vec3,
    /// Linear RGB in [0, 1].
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn kind(&self) -> LightKind {
        match self.source {
            LightSource::Ambient => LightKind::Ambient,
            LightSource::Point { .. } => LightKind::Point,
            LightSource::Directional { .. } => LightKind::Directional,
            LightSource::Spot { .. } => LightKind::Spot,
        }
    }
}

/// Debug visual drawn alongside non-ambient lights. It carries no position
/// of its own and follows the light it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightHelper {
    Point { sphere_size: f32 },
    Directional { plane_size: f32 },
    Spot,
}

impl LightHelper {
    fn for_source(source: &LightSource) -> Option<Self> {
        match source {
            LightSource::Ambient => None,
            LightSource::Point { .. } => Some(LightHelper::Point { sphere_size: 1.0 }),
            LightSource::Directional { .. } => {
                Some(LightHelper::Directional { plane_size: 1.0 })
            }
            LightSource::Spot { .. } => Some(LightHelper::Spot),
        }
    }
}

/// A light together with its matching helper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachedLight {
    pub light: Light,
    pub helper: Option<LightHelper>,
}

impl AttachedLight {
    fn new(light: Light) -> Self {
        Self {
            helper: LightHelper::for_source(&light.source),
            light,
        }
    }

    /// Where the helper is drawn this frame.
    pub fn helper_anchor(&self) -> Option<Vec3> {
        self.helper.map(|_| self.light.position)
    }
}

/// Light state machine. Holds the last values typed into the UI so a newly
/// selected light starts at the current position input.
#[derive(Debug, Clone)]
pub struct LightController {
    position_input: Vec3,
}

impl Default for LightController {
    fn default() -> Self {
        Self::new(Vec3::new(8.0, 8.0, 8.0))
    }
}

impl LightController {
    pub fn new(position_input: Vec3) -> Self {
        Self { position_input }
    }

    pub fn position_input(&self) -> Vec3 {
        self.position_input
    }

    pub fn select_type(&mut self, scene: &mut Scene, kind: LightKind) {
        let next = LightSource::for_kind(kind).map(|source| {
            AttachedLight::new(Light {
                source,
                position: self.position_input,
                color: Vec3::ONE,
                intensity: BASE_INTENSITY,
            })
        });
        let previous = scene.replace_light(next);
        info!(
            "light changed from {} to {kind}",
            previous.map_or(LightKind::None, |attached| attached.light.kind())
        );
    }

    /// Records the position input and moves the attached light, if any.
    /// Non-finite coordinates are rejected.
    pub fn update_position(&mut self, scene: &mut Scene, position: Vec3) -> Result<(), InputError> {
        if !position.is_finite() {
            return Err(InputError::NotFinite {
                field: "position",
                value: format!("{position}"),
            });
        }
        self.position_input = position;
        if let Some(attached) = scene.light_mut() {
            attached.light.position = position;
        }
        Ok(())
    }

    /// Replaces the attached light's color. No-op without a light.
    pub fn update_color(&mut self, scene: &mut Scene, r: u8, g: u8, b: u8) {
        if let Some(attached) = scene.light_mut() {
            attached.light.color = normalize_color(r, g, b);
        }
    }

    /// Applies raw text from the three position fields. Either all three
    /// parse as finite numbers or nothing changes.
    pub fn apply_position_input(
        &mut self,
        scene: &mut Scene,
        x: &str,
        y: &str,
        z: &str,
    ) -> Result<(), InputError> {
        let position = Vec3::new(
            parse_number("position x", x)?,
            parse_number("position y", y)?,
            parse_number("position z", z)?,
        );
        self.update_position(scene, position)
    }

    /// Applies raw text from the three color fields. Values are clamped to
    /// [0, 255] and rounded before normalization.
    pub fn apply_color_input(
        &mut self,
        scene: &mut Scene,
        r: &str,
        g: &str,
        b: &str,
    ) -> Result<(), InputError> {
        let r = parse_channel("red", r)?;
        let g = parse_channel("green", g)?;
        let b = parse_channel("blue", b)?;
        self.update_color(scene, r, g, b);
        Ok(())
    }
}

pub fn normalize_color(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

fn parse_number(field: &'static str, text: &str) -> Result<f32, InputError> {
    let value = text.trim().parse::<f32>().map_err(|_| InputError::NotANumber {
        field,
        value: text.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field,
            value: text.to_string(),
        });
    }
    Ok(value)
}

fn parse_channel(field: &'static str, text: &str) -> Result<u8, InputError> {
    let value = parse_number(field, text)?;
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

/// Logs a rejected UI update; the caller keeps its previous state.
pub(crate) fn report_rejected(result: Result<(), InputError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("ignoring light input: {err}");
            false
        }
    }
}
