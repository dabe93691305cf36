//! Procedural scene population.
//!
//! Primitives are attached as soon as they are built. Model requests are
//! parked in [`PendingLoads`] and attached by [`ScenePopulator::apply_resolved_loads`],
//! which the frame driver calls between ticks.

use glam::Vec3;
use log::{error, info};
use rand::Rng;

use crate::assets::{AssetFactory, PendingLoads};
use crate::config::SandboxConfig;
use crate::scene::{ObjectId, PrimitiveKind, Scene};

/// Spawn region and randomization bounds used while populating.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSettings {
    pub count_range: (usize, usize),
    pub horizontal_extent: f32,
    pub vertical_extent: f32,
    pub model_probability: f64,
    pub max_angular_velocity: f32,
}

impl Default for PopulationSettings {
    fn default() -> Self {
        Self::from(&SandboxConfig::default())
    }
}

impl From<&SandboxConfig> for PopulationSettings {
    fn from(config: &SandboxConfig) -> Self {
        Self {
            count_range: (config.min_objects, config.max_objects.max(config.min_objects)),
            horizontal_extent: config.horizontal_extent,
            vertical_extent: config.vertical_extent,
            model_probability: config.model_probability.clamp(0.0, 1.0),
            max_angular_velocity: config.max_angular_velocity,
        }
    }
}

/// Outcome of a [`ScenePopulator::populate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulationReport {
    pub requested: usize,
    pub attached: usize,
    pub deferred: usize,
}

/// Outcome of draining resolved model loads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedLoads {
    pub attached: Vec<ObjectId>,
    pub failed: usize,
}

pub struct ScenePopulator {
    settings: PopulationSettings,
    factory: AssetFactory,
    loads: PendingLoads,
}

impl ScenePopulator {
    pub fn new(settings: PopulationSettings, factory: AssetFactory) -> Self {
        Self {
            settings,
            factory,
            loads: PendingLoads::new(),
        }
    }

    pub fn settings(&self) -> &PopulationSettings {
        &self.settings
    }

    pub fn pending(&self) -> usize {
        self.loads.in_flight()
    }

    /// Draws the per-session object count.
    pub fn draw_count<R: Rng>(&self, rng: &mut R) -> usize {
        let (min, max) = self.settings.count_range;
        rng.gen_range(min..=max)
    }

    /// Fills `count` slots. A slot either attaches a primitive right away or
    /// issues a model request that attaches later, if it resolves at all.
    pub fn populate<R: Rng>(&mut self, rng: &mut R, scene: &mut Scene, count: usize) -> PopulationReport {
        let mut report = PopulationReport {
            requested: count,
            ..PopulationReport::default()
        };
        for _ in 0..count {
            let position = self.draw_position(rng);
            if rng.gen_bool(self.settings.model_probability) {
                self.factory
                    .request_external_model(rng, position, &mut self.loads);
                report.deferred += 1;
            } else {
                let kind = if rng.gen_bool(0.5) {
                    PrimitiveKind::Cube
                } else {
                    PrimitiveKind::Pyramid
                };
                let prototype = self.factory.create_primitive(rng, kind);
                let velocity = self.draw_angular_velocity(rng);
                scene.attach(prototype, position, velocity);
                report.attached += 1;
            }
        }
        info!(
            "populated {} slots: {} attached, {} model(s) pending",
            report.requested, report.attached, report.deferred
        );
        report
    }

    /// Attaches every model that finished loading since the last call.
    /// Failed loads are logged and dropped; their slot stays empty.
    pub fn apply_resolved_loads<R: Rng>(&mut self, rng: &mut R, scene: &mut Scene) -> ResolvedLoads {
        let ready = self.loads.drain_ready();
        let mut resolved = ResolvedLoads::default();
        for completion in ready {
            self.apply_one(rng, scene, completion, &mut resolved);
        }
        resolved
    }

    /// Blocks until every in-flight model request has resolved, attaching
    /// the successful ones.
    pub fn wait_for_pending_loads<R: Rng>(&mut self, rng: &mut R, scene: &mut Scene) -> ResolvedLoads {
        let mut resolved = ResolvedLoads::default();
        while let Some(completion) = self.loads.wait_next() {
            self.apply_one(rng, scene, completion, &mut resolved);
        }
        resolved
    }

    fn apply_one<R: Rng>(
        &self,
        rng: &mut R,
        scene: &mut Scene,
        completion: crate::assets::LoadCompletion,
        resolved: &mut ResolvedLoads,
    ) {
        match completion.result {
            Ok(prototype) => {
                let velocity = self.draw_angular_velocity(rng);
                let id = scene.attach(prototype, completion.request.target_position, velocity);
                info!("model {} attached as {id}", completion.request.model_id);
                resolved.attached.push(id);
            }
            Err(err) => {
                error!("{err}");
                resolved.failed += 1;
            }
        }
    }

    fn draw_position<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let h = self.settings.horizontal_extent;
        let v = self.settings.vertical_extent;
        Vec3::new(
            rng.gen_range(-h..=h),
            rng.gen_range(-v..=v),
            rng.gen_range(-h..=h),
        )
    }

    fn draw_angular_velocity<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let bound = self.settings.max_angular_velocity;
        Vec3::new(
            rng.gen_range(-bound..=bound),
            rng.gen_range(-bound..=bound),
            rng.gen_range(-bound..=bound),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::assets::factory::tests::{MemoryLoader, TRIANGLE_OBJ};
    use crate::assets::ModelCatalog;

    fn populator(loader: MemoryLoader, model_probability: f64) -> ScenePopulator {
        let settings = PopulationSettings {
            model_probability,
            ..PopulationSettings::default()
        };
        ScenePopulator::new(
            settings,
            AssetFactory::new(Arc::new(loader), ModelCatalog::default()),
        )
    }

    fn working_loader() -> MemoryLoader {
        MemoryLoader::default()
            .with_model("modelos/bird.obj", TRIANGLE_OBJ)
            .with_model("modelos/tiger.obj", TRIANGLE_OBJ)
    }

    #[test]
    fn count_is_drawn_from_session_range() {
        let populator = populator(MemoryLoader::default(), 0.3);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            let count = populator.draw_count(&mut rng);
            assert!((5..=30).contains(&count));
        }
    }

    #[test]
    fn primitives_attach_immediately_within_bounds() {
        let mut populator = populator(MemoryLoader::default(), 0.0);
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = Scene::new();
        let report = populator.populate(&mut rng, &mut scene, 40);
        assert_eq!(report.attached, 40);
        assert_eq!(report.deferred, 0);
        assert_eq!(scene.len(), 40);
        for object in scene.objects() {
            let p = object.transform.position;
            assert!(p.x.abs() <= 10.0 && p.z.abs() <= 10.0 && p.y.abs() <= 1.0);
            assert!(object.angular_velocity.abs().max_element() <= 0.05);
            assert!(!object.geometry.is_external());
        }
    }

    #[test]
    fn models_attach_only_after_resolution() {
        let mut populator = populator(working_loader(), 1.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut scene = Scene::new();
        let report = populator.populate(&mut rng, &mut scene, 6);
        assert_eq!(report.deferred, 6);
        assert!(scene.is_empty());

        let mut resolved = populator.apply_resolved_loads(&mut rng, &mut scene);
        let rest = populator.wait_for_pending_loads(&mut rng, &mut scene);
        resolved.attached.extend(rest.attached);
        resolved.failed += rest.failed;

        assert_eq!(resolved.attached.len(), 6);
        assert_eq!(resolved.failed, 0);
        assert_eq!(scene.len(), 6);
        assert_eq!(populator.pending(), 0);
        for object in scene.objects() {
            assert!(object.geometry.is_external());
            assert!(object.transform.scale < 1.0);
        }
    }

    #[test]
    fn failed_loads_leave_no_trace() {
        let mut populator = populator(MemoryLoader::default(), 1.0);
        let mut rng = StdRng::seed_from_u64(10);
        let mut scene = Scene::new();
        populator.populate(&mut rng, &mut scene, 5);
        let resolved = populator.wait_for_pending_loads(&mut rng, &mut scene);
        assert_eq!(resolved.failed, 5);
        assert!(resolved.attached.is_empty());
        assert!(scene.is_empty());
    }

    #[test]
    fn attached_total_never_exceeds_requested_count() {
        let loader = MemoryLoader::default().with_model("modelos/bird.obj", TRIANGLE_OBJ);
        let mut populator = populator(loader, 0.5);
        let mut rng = StdRng::seed_from_u64(21);
        let mut scene = Scene::new();
        let count = populator.draw_count(&mut rng);
        let report = populator.populate(&mut rng, &mut scene, count);
        assert_eq!(scene.len(), report.attached);
        let resolved = populator.wait_for_pending_loads(&mut rng, &mut scene);
        assert_eq!(resolved.attached.len() + resolved.failed, report.deferred);
        assert!(scene.len() <= count);
    }
}
