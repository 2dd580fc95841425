//! Systems for the journey viewer.
//!
//! Organized by functionality:
//! - command: Command queue processing from the host page
//! - scene: Scene load/teardown and hotspot registry upkeep
//! - picking: Hover highlights and click selection
//! - journey: Gallery gate polling, the journey frame and the camera write
//! - state_sync: Sync journey state to shared stores for the host UI

pub mod command;
pub mod journey;
pub mod picking;
pub mod scene;
pub mod state_sync;

pub use command::*;
pub use journey::*;
pub use picking::*;
pub use scene::*;
pub use state_sync::*;
