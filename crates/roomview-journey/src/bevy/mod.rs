//! Bevy integration for the journey viewer.
//!
//! Resources own the engine-agnostic journey objects, systems drive them
//! from a fixed-timestep frame loop, and components tag the camera and the
//! hotspot entities of the scene.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod state_store;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::JourneyHeadlessPlugin;
pub use resources::*;
pub use state_store::{DiagnosticsStore, GalleryStore, JourneySummary, StateStores};
