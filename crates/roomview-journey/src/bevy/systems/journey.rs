//! Journey frame systems.

use bevy::prelude::*;

use crate::bevy::{
    BranchReadyEvent, FramePose, InputGate, JourneyCamera, JourneyRes, ReturnedToMainEvent,
    StateStores,
};
use crate::journey::JourneyEvent;

/// System to pick up the gallery overlay's input flag and resume request.
pub fn poll_gallery_gate(
    state_stores: Res<StateStores>,
    mut gate: ResMut<InputGate>,
    mut journey: ResMut<JourneyRes>,
) {
    gate.blocked = state_stores.gallery.is_input_blocked();
    if state_stores.gallery.take_resume_request() {
        journey.machine.request_resume();
    }
}

/// System to advance the journey by one fixed step.
pub fn advance_journey(
    time: Res<Time>,
    state_stores: Res<StateStores>,
    mut journey: ResMut<JourneyRes>,
    mut frame_pose: ResMut<FramePose>,
    mut branch_ready_events: MessageWriter<BranchReadyEvent>,
    mut returned_events: MessageWriter<ReturnedToMainEvent>,
) {
    let output = journey.machine.frame(time.delta_secs());
    frame_pose.0 = output.pose;

    for event in output.events {
        match event {
            JourneyEvent::BranchReady { hotspot_id } => {
                state_stores.gallery.notify_branch_ready(hotspot_id.clone());
                branch_ready_events.write(BranchReadyEvent { hotspot_id });
            }
            JourneyEvent::ReturnedToMain { t } => {
                state_stores.gallery.notify_returned();
                returned_events.write(ReturnedToMainEvent { t });
            }
            JourneyEvent::BranchStarted { .. } | JourneyEvent::ReturnStarted => {}
        }
    }
}

/// System to write this frame's pose to the journey camera.
///
/// The only writer of the camera transform.
pub fn apply_camera_pose(
    mut frame_pose: ResMut<FramePose>,
    mut cameras: Query<&mut Transform, With<JourneyCamera>>,
) {
    let Some(pose) = frame_pose.0.take() else {
        return;
    };
    for mut transform in &mut cameras {
        pose.apply_to(&mut transform);
    }
}
