//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `JourneyHeadlessPlugin` for testing the journey
//! without a rendering or windowing backend.

use bevy::prelude::*;

use crate::bevy::plugin::JourneyHeadlessPlugin;
use crate::bevy::{
    CommandQueue, Hotspot, HotspotProxy, HotspotTint, JourneyCamera, JourneyCommand, JourneyRes,
    JourneySummary, StateStores,
};
use crate::config::JourneyConfig;
use crate::journey::{JourneyMachine, JourneyState};
use crate::picker::CameraView;

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
    camera: Option<Entity>,
}

impl TestApp {
    /// Create a new test app with default seed.
    pub fn new() -> Self {
        Self::with_seed(12345)
    }

    /// Create a new test app with a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        app.add_plugins(JourneyHeadlessPlugin {
            seed,
            command_queue: None,
            state_stores: None,
        });
        // Pause virtual time so that only explicit steps advance the
        // journey.
        app.world_mut().resource_mut::<Time<Virtual>>().pause();
        // Run one update to initialize all resources
        app.update();
        Self { app, camera: None }
    }

    /// Advance the journey by exactly `n` fixed frames.
    ///
    /// Feeds one timestep into the fixed accumulator per update, so
    /// `FixedUpdate` runs exactly once per call.
    pub fn step(&mut self, n: usize) {
        for _ in 0..n {
            let world = self.app.world_mut();
            let dt = world.resource::<Time<Fixed>>().timestep();
            world.resource_mut::<Time<Fixed>>().accumulate_overstep(dt);
            self.app.update();
        }
    }

    /// Step until the journey reaches `state`, failing after `limit` frames.
    pub fn step_until(&mut self, state: JourneyState, limit: usize) {
        for _ in 0..limit {
            self.step(1);
            if self.journey().state() == state {
                return;
            }
        }
        panic!(
            "journey never reached {state:?}, stuck in {:?}",
            self.journey().state()
        );
    }

    /// Push a command to the command queue.
    pub fn push(&mut self, cmd: JourneyCommand) -> bool {
        self.app.world().resource::<CommandQueue>().push(cmd)
    }

    /// Spawn the journey camera at `position` facing `look_at`.
    pub fn spawn_camera(&mut self, position: Vec3, look_at: Vec3) -> Entity {
        let transform = Transform::from_translation(position).looking_at(look_at, Vec3::Y);
        let entity = self
            .world_mut()
            .spawn((JourneyCamera::default(), transform))
            .id();
        self.camera = Some(entity);
        entity
    }

    /// Spawn the journey camera with a host projection.
    pub fn spawn_camera_with_projection(
        &mut self,
        position: Vec3,
        look_at: Vec3,
        projection: Projection,
    ) -> Entity {
        let entity = self.spawn_camera(position, look_at);
        self.world_mut().entity_mut(entity).insert(projection);
        entity
    }

    /// Spawn a tinted hotspot.
    pub fn spawn_hotspot(&mut self, id: &str, position: Vec3) -> Entity {
        self.world_mut()
            .spawn((
                Hotspot::new(id),
                HotspotTint::default(),
                Transform::from_translation(position),
                GlobalTransform::from_translation(position),
            ))
            .id()
    }

    /// Spawn a proxy marker for `parent_id`.
    pub fn spawn_proxy(&mut self, parent_id: &str, position: Vec3) -> Entity {
        self.world_mut()
            .spawn((
                HotspotProxy::new(parent_id),
                Transform::from_translation(position),
                GlobalTransform::from_translation(position),
            ))
            .id()
    }

    /// Signal scene-ready and run the frame that loads it.
    pub fn load_scene(&mut self, config: JourneyConfig) {
        self.push(JourneyCommand::SceneReady { config });
        self.step(1);
    }

    /// Normalized device coordinates of `world` as seen by the camera.
    pub fn ndc_of(&self, world: Vec3) -> Vec2 {
        let view = self.view();
        let local = view.rotation.inverse() * (world - view.position);
        let half_height = (view.fov_y * 0.5).tan();
        let depth = -local.z;
        Vec2::new(
            local.x / (depth * half_height * view.aspect),
            local.y / (depth * half_height),
        )
    }

    /// The view pick rays are built from.
    pub fn view(&self) -> CameraView {
        let entity = self.camera.expect("spawn_camera first");
        let (transform, camera) = self.camera();
        camera.view(&transform, self.app.world().get::<Projection>(entity))
    }

    /// Click on the screen position of `world`.
    pub fn click_at(&mut self, world: Vec3) {
        let ndc = self.ndc_of(world);
        self.push(JourneyCommand::PointerClick { x: ndc.x, y: ndc.y });
    }

    pub fn camera(&self) -> (Transform, JourneyCamera) {
        let entity = self.camera.expect("spawn_camera first");
        let world = self.app.world();
        (
            *world.get::<Transform>(entity).unwrap(),
            world.get::<JourneyCamera>(entity).unwrap().clone(),
        )
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera().0.translation
    }

    pub fn journey(&self) -> &JourneyMachine {
        &self.app.world().resource::<JourneyRes>().machine
    }

    pub fn stores(&self) -> StateStores {
        self.app.world().resource::<StateStores>().clone()
    }

    pub fn summary(&self) -> JourneySummary {
        self.stores().diagnostics.get_summary()
    }

    pub fn tint(&self, entity: Entity) -> HotspotTint {
        self.app.world().get::<HotspotTint>(entity).unwrap().clone()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
