//! Renderer seam. Rasterization lives outside the crate; implementations
//! receive the scene and camera once per tick.

mod common;

pub use common::{CameraParams, LightParams};

use anyhow::Result;
use glam::Vec3;

use crate::camera::CameraController;
use crate::light::LightKind;
use crate::scene::Scene;

pub trait Renderer {
    fn render(&mut self, scene: &Scene, camera: &dyn CameraController) -> Result<()>;
}

/// What a headless frame looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub frame: u64,
    pub objects: usize,
    pub light: LightParams,
    pub camera: CameraParams,
}

/// Renderer that records per-frame statistics instead of drawing.
#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    aspect: f32,
    frames: u64,
    last: Option<FrameSummary>,
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        Self::new(800.0 / 600.0)
    }
}

impl SummaryRenderer {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            frames: 0,
            last: None,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameSummary> {
        self.last.as_ref()
    }

    pub fn last_light_kind(&self) -> LightKind {
        self.last
            .as_ref()
            .map_or(LightKind::None, |summary| summary.light.kind)
    }

    pub fn last_camera_position(&self) -> Option<Vec3> {
        self.last.as_ref().map(|summary| summary.camera.position)
    }
}

impl Renderer for SummaryRenderer {
    fn render(&mut self, scene: &Scene, camera: &dyn CameraController) -> Result<()> {
        self.frames += 1;
        self.last = Some(FrameSummary {
            frame: self.frames,
            objects: scene.len(),
            light: LightParams::from_scene(scene),
            camera: camera.params(self.aspect),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FirstPersonCamera;
    use crate::light::LightController;

    #[test]
    fn summary_renderer_records_light_and_camera() {
        let mut scene = Scene::new();
        let mut lights = LightController::new(Vec3::new(0.0, 4.0, 0.0));
        lights.select_type(&mut scene, LightKind::Directional);
        let camera = FirstPersonCamera::new(Vec3::new(1.0, 2.0, 3.0));
        let mut renderer = SummaryRenderer::default();

        renderer.render(&scene, &camera).unwrap();

        let summary = renderer.last_frame().unwrap();
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.objects, 0);
        assert_eq!(summary.light.kind, LightKind::Directional);
        assert_eq!(summary.light.direction, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(renderer.last_camera_position(), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn unlit_scene_reports_no_light() {
        let scene = Scene::new();
        let params = LightParams::from_scene(&scene);
        assert_eq!(params.kind, LightKind::None);
        assert_eq!(params.intensity, 0.0);
    }
}
