//! State synchronization systems.
//!
//! Syncs journey state to the shared stores for host UI access.

use bevy::prelude::*;

use crate::bevy::{HotspotRegistryRes, JourneyRes, JourneySummary, PickerRes, StateStores};

/// System to sync the journey diagnostics to the state stores.
pub fn sync_diagnostics_to_stores(
    journey: Res<JourneyRes>,
    picker: Res<PickerRes>,
    registry: Res<HotspotRegistryRes>,
    state_stores: Res<StateStores>,
) {
    let summary = JourneySummary {
        cursor: picker.0.cursor(),
        hovered: picker
            .0
            .hovered()
            .and_then(|handle| registry.0.by_handle(handle))
            .map(|record| record.id.clone()),
        has_path: journey.machine.has_path(),
        ..JourneySummary::from_diagnostics(journey.machine.diagnostics())
    };
    state_stores.diagnostics.update(summary);
}
