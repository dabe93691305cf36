use log::warn;

use crate::camera::CameraController;
use crate::input::{Direction, InputState, KeyBindings};
use crate::render::Renderer;
use crate::scene::Scene;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub frame: u64,
    /// Distance applied per motion primitive: forward, right, up.
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    pub animated: usize,
    pub rendered: bool,
}

/// Per-frame driver: camera movement, then object animation, then render.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    speed: f32,
    bindings: KeyBindings,
    frame: u64,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(5.0, KeyBindings::default())
    }
}

impl AnimationScheduler {
    pub fn new(speed: f32, bindings: KeyBindings) -> Self {
        Self {
            speed,
            bindings,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tick(
        &mut self,
        elapsed_seconds: f32,
        input: &InputState,
        camera: &mut dyn CameraController,
        scene: &mut Scene,
        renderer: &mut dyn Renderer,
    ) -> TickReport {
        self.frame += 1;
        let mut report = TickReport {
            frame: self.frame,
            ..TickReport::default()
        };

        let step = self.speed * elapsed_seconds;
        for direction in Direction::ALL {
            if !input.is_down(self.bindings.key_for(direction)) {
                continue;
            }
            // each held key applies its own full step; diagonals are not normalized
            match direction {
                Direction::Forward => {
                    camera.move_forward(step);
                    report.forward += step;
                }
                Direction::Backward => {
                    camera.move_forward(-step);
                    report.forward -= step;
                }
                Direction::StrafeRight => {
                    camera.move_right(step);
                    report.right += step;
                }
                Direction::StrafeLeft => {
                    camera.move_right(-step);
                    report.right -= step;
                }
                Direction::Ascend => {
                    camera.move_up(step);
                    report.up += step;
                }
                Direction::Descend => {
                    camera.move_up(-step);
                    report.up -= step;
                }
            }
        }

        report.animated = scene.advance_rotations();

        match renderer.render(scene, camera) {
            Ok(()) => report.rendered = true,
            Err(err) => warn!("frame {} failed to render: {err:?}", self.frame),
        }
        report
    }
}
