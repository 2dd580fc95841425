//! Command processing system.
//!
//! Processes commands from the host page.

use bevy::prelude::*;

use crate::bevy::{
    CommandQueue, JourneyCamera, JourneyCommand, JourneyRes, LoadSceneEvent, PointerState,
    ScrollInput, StateStores, TeardownEvent,
};

/// System to process commands from the external command queue.
///
/// Handles commands until a Yield is encountered.
/// Commands after Yield are processed in the next frame.
#[allow(clippy::too_many_arguments)]
pub fn process_commands(
    command_queue: Res<CommandQueue>,
    state_stores: Res<StateStores>,
    mut journey: ResMut<JourneyRes>,
    mut scroll: ResMut<ScrollInput>,
    mut pointer: ResMut<PointerState>,
    mut cameras: Query<&mut JourneyCamera>,
    mut load_scene_events: MessageWriter<LoadSceneEvent>,
    mut teardown_events: MessageWriter<TeardownEvent>,
) {
    for command in command_queue.drain_until_yield() {
        match command {
            JourneyCommand::Scroll { offset, max_offset } => {
                scroll.offset = offset;
                scroll.max_offset = max_offset;
                journey.machine.set_scroll(offset, max_offset);
            }
            JourneyCommand::JumpTo { offset, max_offset } => {
                tracing::debug!("[command] JumpTo: {offset} / {max_offset}");
                scroll.offset = offset;
                scroll.max_offset = max_offset;
                let machine = &mut journey.machine;
                machine.set_scroll(offset, max_offset);
                let t = machine.mapper().target();
                machine.jump_to(t);
            }
            JourneyCommand::Resize { aspect, max_offset } => {
                tracing::debug!("[command] Resize: aspect {aspect:.3}, max offset {max_offset}");
                if aspect.is_finite() && aspect > 0.0 {
                    for mut camera in &mut cameras {
                        camera.aspect = aspect;
                    }
                }
                scroll.max_offset = max_offset;
                journey.machine.set_scroll(scroll.offset, max_offset);
            }
            JourneyCommand::PointerMove { x, y } => {
                pointer.ndc = Some(Vec2::new(x, y));
            }
            JourneyCommand::PointerLeave => {
                pointer.ndc = None;
                pointer.pending_click = None;
            }
            JourneyCommand::PointerClick { x, y } => {
                let ndc = Vec2::new(x, y);
                pointer.ndc = Some(ndc);
                pointer.pending_click = Some(ndc);
            }
            JourneyCommand::Resume => {
                tracing::info!("[command] Resume");
                state_stores.gallery.request_resume();
            }
            JourneyCommand::SetInputBlocked { blocked } => {
                tracing::info!("[command] SetInputBlocked: {blocked}");
                state_stores.gallery.set_input_blocked(blocked);
            }
            JourneyCommand::SceneReady { config } => {
                tracing::info!(
                    "[command] SceneReady with {} waypoints",
                    config.waypoints.len()
                );
                load_scene_events.write(LoadSceneEvent { config });
            }
            JourneyCommand::Teardown => {
                tracing::info!("[command] Teardown");
                teardown_events.write(TeardownEvent);
            }
            // Yield is consumed by drain_until_yield(), should not reach here
            JourneyCommand::Yield => {}
        }
    }
}
