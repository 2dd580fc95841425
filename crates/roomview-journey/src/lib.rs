//! Roomview Journey
//!
//! Scroll-driven camera journey for the 3D room walkthrough viewer.
//!
//! The camera follows an authored path as the page scrolls, can branch off
//! to inspect a clicked hotspot, and returns to the exact point it left.
//!
//! The core is engine-agnostic:
//! - `path`: centripetal Catmull-Rom position and look-at paths
//! - `scroll`: scroll offset to smoothed path parameter
//! - `picker`: hotspot registry, ray picking and hover highlights
//! - `branch` / `animation`: single-flight curved camera tweens
//! - `journey`: the state machine owning camera writes
//!
//! The `bevy` module wires it into a fixed-timestep ECS frame loop.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod branch;
pub mod config;
pub mod highlight;
pub mod journey;
pub mod path;
pub mod picker;
pub mod pose;
pub mod scroll;

// Bevy integration
pub mod bevy;

pub use animation::{Animator, Easing, FrameAnimator, Tween, TweenFrame};
pub use branch::{BranchAnimator, BranchCurve, BranchStep, LookTrack};
pub use config::{ConfigError, JourneyConfig, JourneySettings};
pub use highlight::{HighlightColor, HighlightPalette};
pub use journey::{
    BranchTarget, CameraSnapshot, FrameOutput, JourneyDiagnostics, JourneyEvent, JourneyMachine,
    JourneyState,
};
pub use path::{ControlPath, JourneyPath};
pub use picker::{
    CameraView, CursorAffordance, HighlightSurface, HotspotId, HotspotPicker, HotspotRecord,
    HotspotRegistry, HotspotSelection, HoverChange, PickHit, PickRay, ProxyRecord,
};
pub use pose::CameraPose;
pub use scroll::ScrollProgressMapper;

/// Fixed timestep of the journey frame loop (60 Hz).
pub const FRAME_DT: f32 = 1.0 / 60.0;
