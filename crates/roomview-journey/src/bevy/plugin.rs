//! Bevy plugin for the journey viewer.
//!
//! `JourneyHeadlessPlugin` holds all journey logic without rendering or
//! window dependencies. The host adds rendering and copies
//! [`HotspotTint`](crate::bevy::HotspotTint) into its materials.

use bevy::prelude::*;

use crate::FRAME_DT;
use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::state_store::StateStores;
use crate::bevy::systems;

/// Headless plugin containing the journey frame loop.
///
/// Use this plugin in tests with `MinimalPlugins` + `TransformPlugin` to run
/// the journey without a windowing or rendering backend.
pub struct JourneyHeadlessPlugin {
    /// Seed for highlight colors beyond the fixed palette.
    pub seed: u64,
    pub command_queue: Option<CommandQueue>,
    pub state_stores: Option<StateStores>,
}

impl Default for JourneyHeadlessPlugin {
    fn default() -> Self {
        Self {
            seed: 12345,
            command_queue: None,
            state_stores: None,
        }
    }
}

impl Plugin for JourneyHeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_seconds(f64::from(FRAME_DT)));

        // ====================================================================
        // Resources
        // ====================================================================

        // The viewer accepts host input from the moment it is mounted.
        let command_queue = self.command_queue.clone().unwrap_or_default();
        let subscription = command_queue.subscribe();

        app.insert_resource(JourneyRes::default())
            .insert_resource(HotspotRegistryRes::new(self.seed))
            .insert_resource(PickerRes::default())
            .insert_resource(PointerState::default())
            .insert_resource(ScrollInput::default())
            .insert_resource(InputGate::default())
            .insert_resource(FramePose::default())
            .insert_resource(ActiveInput(Some(subscription)))
            .insert_resource(command_queue)
            .insert_resource(self.state_stores.clone().unwrap_or_default());

        // ====================================================================
        // Messages
        // ====================================================================

        app.add_message::<LoadSceneEvent>()
            .add_message::<TeardownEvent>()
            .add_message::<HotspotSelectedEvent>()
            .add_message::<BranchReadyEvent>()
            .add_message::<ReturnedToMainEvent>();

        // ====================================================================
        // Frame loop (FixedUpdate): input, then transform, then sync
        // ====================================================================

        app.add_systems(
            FixedUpdate,
            (
                systems::process_commands,
                systems::poll_gallery_gate,
                systems::handle_teardown,
                systems::handle_load_scene,
                systems::refresh_hotspot_registry,
                systems::update_hover,
                systems::handle_click,
                systems::advance_journey,
                systems::apply_camera_pose,
                systems::sync_diagnostics_to_stores,
            )
                .chain(),
        );
    }
}
