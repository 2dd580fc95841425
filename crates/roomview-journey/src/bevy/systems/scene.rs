//! Scene lifecycle systems.
//!
//! A scene becomes interactive on [`LoadSceneEvent`] and inert again on
//! [`TeardownEvent`]. In between, the hotspot registry follows the
//! `Hotspot` / `HotspotProxy` entities.

use bevy::prelude::*;

use super::picking::TintSurface;
use crate::bevy::{
    ActiveInput, CommandQueue, FramePose, Hotspot, HotspotProxy, HotspotRegistryRes, HotspotTint,
    JourneyCamera, JourneyRes, LoadSceneEvent, PickerRes, PointerState, ScrollInput, TeardownEvent,
};
use crate::pose::CameraPose;

/// System to cancel the journey before the scene is destroyed.
///
/// Flights are cancelled without completing and the host input
/// subscription is released.
pub fn handle_teardown(
    mut events: MessageReader<TeardownEvent>,
    mut journey: ResMut<JourneyRes>,
    mut registry: ResMut<HotspotRegistryRes>,
    mut picker: ResMut<PickerRes>,
    mut pointer: ResMut<PointerState>,
    mut frame_pose: ResMut<FramePose>,
    mut active_input: ResMut<ActiveInput>,
    mut tints: Query<&mut HotspotTint>,
) {
    if events.read().count() == 0 {
        return;
    }

    let cancelled = journey.machine.teardown();
    journey.scene_loaded = false;
    registry.0.clear();
    picker.0.clear().apply(&mut TintSurface(&mut tints));
    *pointer = PointerState::default();
    frame_pose.0 = None;
    active_input.0 = None;

    tracing::info!("[scene] torn down (cancelled flight: {cancelled})");
}

/// System to start the journey of a newly ready scene.
///
/// Seeds the path with the current camera transform.
pub fn handle_load_scene(
    mut events: MessageReader<LoadSceneEvent>,
    command_queue: Res<CommandQueue>,
    scroll: Res<ScrollInput>,
    mut journey: ResMut<JourneyRes>,
    mut registry: ResMut<HotspotRegistryRes>,
    mut picker: ResMut<PickerRes>,
    mut active_input: ResMut<ActiveInput>,
    mut cameras: Query<(&Transform, &mut JourneyCamera)>,
    mut tints: Query<&mut HotspotTint>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    let Ok((transform, mut camera)) = cameras.single_mut() else {
        tracing::warn!("[scene] no JourneyCamera, scene load ignored");
        return;
    };

    let mut config = event.config.clone();
    if let Err(err) = config.validate() {
        tracing::warn!("[scene] invalid journey config, journey disabled: {err}");
        config.waypoints.clear();
    }

    // Only used when the host camera has no perspective projection.
    camera.fov_y = config.settings.fov_y_degrees.to_radians();
    let start = CameraPose::new(
        transform.translation,
        transform.translation + transform.forward().as_vec3(),
    );
    let path = config.build_path(start.position);

    let journey = &mut *journey;
    journey.machine.configure(config.settings.clone());
    journey
        .machine
        .set_focal_overrides(config.focal_distances.clone());
    journey.machine.load_path(path, start);
    journey.machine.set_scroll(scroll.offset, scroll.max_offset);
    journey.config = config;
    journey.scene_loaded = true;

    registry.0.clear();
    // The hotspot lit before the reload may no longer be under the pointer.
    picker.0.clear().apply(&mut TintSurface(&mut tints));

    if active_input.0.is_none() {
        active_input.0 = Some(command_queue.subscribe());
    }

    tracing::info!(
        "[scene] journey ready from {:?} (path: {})",
        start.position,
        journey.machine.has_path()
    );
}

/// System to keep the hotspot registry in step with the scene.
///
/// Registration is idempotent, so hotspots spawned after scene-ready are
/// picked up and moved hotspots keep their highlight color.
pub fn refresh_hotspot_registry(
    journey: Res<JourneyRes>,
    mut registry: ResMut<HotspotRegistryRes>,
    mut picker: ResMut<PickerRes>,
    hotspots: Query<(Entity, &Hotspot, &GlobalTransform)>,
    proxies: Query<(Entity, &HotspotProxy, &GlobalTransform)>,
    mut removed_hotspots: RemovedComponents<Hotspot>,
    mut removed_proxies: RemovedComponents<HotspotProxy>,
) {
    for entity in removed_hotspots.read().chain(removed_proxies.read()) {
        if registry.0.remove(entity) {
            tracing::debug!("[scene] hotspot entity {entity:?} removed");
        }
        picker.0.forget(entity);
    }

    if !journey.scene_loaded {
        return;
    }

    let default_radius = journey.config.settings.pick_radius;
    for (entity, hotspot, transform) in &hotspots {
        registry.0.register(
            hotspot.id.clone(),
            entity,
            transform.translation(),
            hotspot.pick_radius.unwrap_or(default_radius),
        );
    }
    for (entity, proxy, transform) in &proxies {
        registry.0.register_proxy(
            entity,
            proxy.parent_id.clone(),
            transform.translation(),
            proxy.pick_radius.unwrap_or(default_radius),
        );
    }
}
