//! ECS Events (Messages) for the journey viewer.
//!
//! Note: In Bevy 0.18+, buffered events use Message trait instead of Event.

use bevy::prelude::*;

use crate::config::JourneyConfig;
use crate::picker::HotspotId;

/// Message to load the journey of a newly ready scene.
#[derive(Message, Debug, Clone)]
pub struct LoadSceneEvent {
    pub config: JourneyConfig,
}

/// Message to tear the journey down before the scene is destroyed.
#[derive(Message, Debug, Clone, Default)]
pub struct TeardownEvent;

/// Message fired when a hotspot click was accepted by the journey.
#[derive(Message, Debug, Clone)]
pub struct HotspotSelectedEvent {
    pub hotspot_id: HotspotId,
    pub position: Vec3,
}

/// Message fired when the camera arrived at a hotspot.
#[derive(Message, Debug, Clone)]
pub struct BranchReadyEvent {
    pub hotspot_id: HotspotId,
}

/// Message fired when the camera is back on the main path.
#[derive(Message, Debug, Clone)]
pub struct ReturnedToMainEvent {
    /// Path parameter the return landed on.
    pub t: f64,
}
