use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::{AssetFactory, AssetLoader, ModelCatalog};
use crate::camera::CameraController;
use crate::config::SandboxConfig;
use crate::input::{InputState, KeyCode};
use crate::light::{report_rejected, LightController, LightKind};
use crate::population::{PopulationReport, PopulationSettings, ResolvedLoads, ScenePopulator};
use crate::render::Renderer;
use crate::scene::Scene;
use crate::scheduler::{AnimationScheduler, TickReport};

/// Everything a running session owns. UI events, resolved loads and frame
/// ticks all enter through `&mut self`, so they are serialized by the
/// borrow checker rather than by locks.
pub struct Sandbox<C, R> {
    rng: StdRng,
    input: InputState,
    camera: C,
    renderer: R,
    scene: Scene,
    lights: LightController,
    populator: ScenePopulator,
    scheduler: AnimationScheduler,
}

impl<C: CameraController, R: Renderer> Sandbox<C, R> {
    pub fn new(
        config: &SandboxConfig,
        loader: Arc<dyn AssetLoader>,
        camera: C,
        renderer: R,
    ) -> Result<Self> {
        let catalog = match &config.catalog {
            Some(path) => ModelCatalog::load(path)
                .with_context(|| format!("failed to load model catalog {}", path.display()))?,
            None => ModelCatalog::default(),
        };
        let factory =
            AssetFactory::new(loader, catalog).with_size_range(config.primitive_size.clone());
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            input: InputState::new(),
            camera,
            renderer,
            scene: Scene::new(),
            lights: LightController::default(),
            populator: ScenePopulator::new(PopulationSettings::from(config), factory),
            scheduler: AnimationScheduler::new(
                config.movement_speed,
                config.key_bindings.clone(),
            ),
        })
    }

    /// Draws the session's object count and populates the scene with it.
    pub fn populate(&mut self) -> PopulationReport {
        let count = self.populator.draw_count(&mut self.rng);
        self.populate_with(count)
    }

    pub fn populate_with(&mut self, count: usize) -> PopulationReport {
        self.populator
            .populate(&mut self.rng, &mut self.scene, count)
    }

    /// One display frame: attach models that resolved since the last frame,
    /// then run the tick.
    pub fn frame(&mut self, elapsed_seconds: f32) -> TickReport {
        self.populator
            .apply_resolved_loads(&mut self.rng, &mut self.scene);
        self.scheduler.tick(
            elapsed_seconds,
            &self.input,
            &mut self.camera,
            &mut self.scene,
            &mut self.renderer,
        )
    }

    pub fn wait_for_pending_loads(&mut self) -> ResolvedLoads {
        self.populator
            .wait_for_pending_loads(&mut self.rng, &mut self.scene)
    }

    pub fn pending_loads(&self) -> usize {
        self.populator.pending()
    }

    pub fn on_key_down(&mut self, key: KeyCode) {
        self.input.on_key_change(key, true);
    }

    pub fn on_key_up(&mut self, key: KeyCode) {
        self.input.on_key_change(key, false);
    }

    pub fn on_light_type_change(&mut self, kind: LightKind) {
        self.lights.select_type(&mut self.scene, kind);
    }

    /// Raw text from the light position fields. Returns whether it was applied.
    pub fn on_light_position_input(&mut self, x: &str, y: &str, z: &str) -> bool {
        report_rejected(
            self.lights
                .apply_position_input(&mut self.scene, x, y, z),
        )
    }

    /// Raw text from the light color fields. Returns whether it was applied.
    pub fn on_light_color_input(&mut self, r: &str, g: &str, b: &str) -> bool {
        report_rejected(self.lights.apply_color_input(&mut self.scene, r, g, b))
    }

    /// Engages pointer lock on the camera.
    pub fn start(&mut self) {
        self.camera.lock();
        info!("camera locked");
    }

    pub fn stop(&mut self) {
        self.camera.unlock();
        info!("camera unlocked");
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frame()
    }

    /// Writes every object and the active light.
    pub fn write_final_state(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Final object states:")?;
        for object in self.scene.objects() {
            let p = object.transform.position;
            let r = object.transform.rotation;
            writeln!(
                out,
                " - {} {} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2})",
                object.id,
                object.geometry.kind_name(),
                p.x,
                p.y,
                p.z,
                r.x,
                r.y,
                r.z
            )?;
        }
        match self.scene.light() {
            Some(attached) => {
                let light = &attached.light;
                writeln!(
                    out,
                    "Light: {} pos=({:.2}, {:.2}, {:.2}) color=({:.2}, {:.2}, {:.2})",
                    light.kind(),
                    light.position.x,
                    light.position.y,
                    light.position.z,
                    light.color.x,
                    light.color.y,
                    light.color.z
                )
            }
            None => writeln!(out, "Light: none"),
        }
    }
}

pub fn print_final_state<C: CameraController, R: Renderer>(sandbox: &Sandbox<C, R>) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = sandbox.write_final_state(&mut out) {
        log::error!("failed to write final state: {err}");
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::assets::factory::tests::{MemoryLoader, TRIANGLE_OBJ};
    use crate::camera::FirstPersonCamera;
    use crate::render::SummaryRenderer;

    fn sandbox(loader: MemoryLoader, model_probability: f64) -> Sandbox<FirstPersonCamera, SummaryRenderer> {
        let config = SandboxConfig {
            seed: Some(42),
            model_probability,
            ..SandboxConfig::default()
        };
        Sandbox::new(
            &config,
            Arc::new(loader),
            FirstPersonCamera::new(Vec3::ZERO),
            SummaryRenderer::default(),
        )
        .unwrap()
    }

    #[test]
    fn resolved_models_join_between_frames() {
        let loader = MemoryLoader::default()
            .with_model("modelos/bird.obj", TRIANGLE_OBJ)
            .with_model("modelos/tiger.obj", TRIANGLE_OBJ);
        let mut sandbox = sandbox(loader, 1.0);
        let report = sandbox.populate_with(4);
        assert_eq!(report.deferred, 4);
        assert!(sandbox.scene().is_empty());

        // a frame only sees models that resolved before it started
        let before = sandbox.scene().len();
        let tick = sandbox.frame(0.016);
        assert_eq!(tick.animated, sandbox.scene().len());
        assert!(before <= sandbox.scene().len());

        sandbox.wait_for_pending_loads();
        assert_eq!(sandbox.scene().len(), 4);
        assert_eq!(sandbox.pending_loads(), 0);
        let tick = sandbox.frame(0.016);
        assert_eq!(tick.animated, 4);
        assert_eq!(sandbox.renderer().last_frame().unwrap().objects, 4);
    }

    #[test]
    fn ui_hooks_drive_light_and_camera() {
        let mut sandbox = sandbox(MemoryLoader::default(), 0.0);
        sandbox.start();
        assert!(sandbox.camera().is_locked());

        assert!(sandbox.on_light_position_input("1", "2", "3"));
        sandbox.on_light_type_change(LightKind::Spot);
        assert!(sandbox.on_light_color_input("255", "0", "0"));
        assert!(!sandbox.on_light_color_input("red", "0", "0"));
        assert!(!sandbox.on_light_position_input("1", "", "3"));

        let light = sandbox.scene().light().unwrap().light;
        assert_eq!(light.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(light.color, Vec3::new(1.0, 0.0, 0.0));

        sandbox.on_key_down(KeyCode::from_name("w"));
        sandbox.frame(0.1);
        sandbox.on_key_up(KeyCode::from_name("w"));
        sandbox.frame(0.1);
        assert!((sandbox.camera().position - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);
        assert_eq!(sandbox.renderer().last_light_kind(), LightKind::Spot);

        sandbox.stop();
        assert!(!sandbox.camera().is_locked());
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let mut a = sandbox(MemoryLoader::default(), 0.0);
        let mut b = sandbox(MemoryLoader::default(), 0.0);
        a.populate();
        b.populate();
        let positions = |s: &Sandbox<FirstPersonCamera, SummaryRenderer>| {
            s.scene()
                .objects()
                .iter()
                .map(|o| o.transform.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&a), positions(&b));
        assert!((5..=30).contains(&a.scene().len()));
    }

    #[test]
    fn final_state_lists_objects_and_light() {
        let mut sandbox = sandbox(MemoryLoader::default(), 0.0);
        sandbox.populate_with(2);
        sandbox.on_light_type_change(LightKind::Ambient);
        let mut out = Vec::new();
        sandbox.write_final_state(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Final object states:"));
        assert!(text.contains(" - #1 "));
        assert!(text.contains(" - #2 "));
        assert!(text.contains("Light: ambient pos=(8.00, 8.00, 8.00)"));
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let config = SandboxConfig {
            catalog: Some("/nonexistent/catalog.xml".into()),
            ..SandboxConfig::default()
        };
        let result = Sandbox::new(
            &config,
            Arc::new(MemoryLoader::default()),
            FirstPersonCamera::default(),
            SummaryRenderer::default(),
        );
        assert!(result.is_err());
    }
}
