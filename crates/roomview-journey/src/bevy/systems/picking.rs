//! Hover highlight and click selection systems.

use bevy::prelude::*;

use crate::bevy::{
    HotspotRegistryRes, HotspotSelectedEvent, HotspotTint, InputGate, JourneyCamera, JourneyRes,
    PickerRes, PointerState,
};
use crate::highlight::HighlightColor;
use crate::picker::{HighlightSurface, PickRay};

/// Writes hover highlights into [`HotspotTint`] components.
pub(crate) struct TintSurface<'q, 'w, 's, 't>(pub &'q mut Query<'w, 's, &'t mut HotspotTint>);

impl HighlightSurface<Entity> for TintSurface<'_, '_, '_, '_> {
    fn restore_base(&mut self, handle: Entity) {
        if let Ok(mut tint) = self.0.get_mut(handle) {
            tint.current = tint.base;
        }
    }

    fn apply_highlight(&mut self, handle: Entity, color: HighlightColor) {
        if let Ok(mut tint) = self.0.get_mut(handle) {
            tint.current = color.into();
        }
    }
}

fn pointer_ray(
    cameras: &Query<(&Transform, &JourneyCamera, Option<&Projection>)>,
    ndc: Vec2,
) -> Option<PickRay> {
    let (transform, camera, projection) = cameras.single().ok()?;
    Some(PickRay::from_ndc(&camera.view(transform, projection), ndc))
}

/// System to update hover highlights from the pointer position.
pub fn update_hover(
    pointer: Res<PointerState>,
    gate: Res<InputGate>,
    registry: Res<HotspotRegistryRes>,
    mut picker: ResMut<PickerRes>,
    cameras: Query<(&Transform, &JourneyCamera, Option<&Projection>)>,
    mut tints: Query<&mut HotspotTint>,
) {
    let ray = pointer.ndc.and_then(|ndc| pointer_ray(&cameras, ndc));
    let change = picker.0.hover(&registry.0, ray.as_ref(), gate.blocked);
    if !change.is_empty() {
        change.apply(&mut TintSurface(&mut tints));
    }
}

/// System to resolve a pending click into a hotspot selection.
pub fn handle_click(
    mut pointer: ResMut<PointerState>,
    gate: Res<InputGate>,
    registry: Res<HotspotRegistryRes>,
    picker: Res<PickerRes>,
    cameras: Query<(&Transform, &JourneyCamera, Option<&Projection>)>,
    mut journey: ResMut<JourneyRes>,
    mut selected_events: MessageWriter<HotspotSelectedEvent>,
) {
    let Some(ndc) = pointer.pending_click.take() else {
        return;
    };
    let Some(ray) = pointer_ray(&cameras, ndc) else {
        return;
    };
    let Some(selection) = picker.0.click(&registry.0, &ray, gate.blocked) else {
        return;
    };

    let event = HotspotSelectedEvent {
        hotspot_id: selection.hotspot_id.clone(),
        position: selection.position,
    };
    if journey.machine.select(selection) {
        selected_events.write(event);
    }
}
