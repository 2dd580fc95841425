//! ECS Resources for the journey viewer.
//!
//! These resources own the engine-agnostic journey objects and hold the
//! host input waiting for the next frame.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::config::JourneyConfig;
use crate::journey::JourneyMachine;
use crate::picker::{HotspotPicker, HotspotRegistry};
use crate::pose::CameraPose;

/// The journey state machine and the configuration it was loaded with.
#[derive(Resource, Debug, Default)]
pub struct JourneyRes {
    pub machine: JourneyMachine,
    pub config: JourneyConfig,
    /// Set between scene-ready and teardown.
    pub scene_loaded: bool,
}

/// Pickable hotspots of the current scene, keyed by entity.
#[derive(Resource, Debug, Clone)]
pub struct HotspotRegistryRes(pub HotspotRegistry<Entity>);

impl HotspotRegistryRes {
    pub fn new(seed: u64) -> Self {
        Self(HotspotRegistry::new(seed))
    }
}

impl Default for HotspotRegistryRes {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Hover state over the hotspot registry.
#[derive(Resource, Debug, Clone, Default)]
pub struct PickerRes(pub HotspotPicker<Entity>);

/// Last pointer position reported by the host.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointerState {
    /// Pointer in normalized device coordinates, `None` outside the viewer.
    pub ndc: Option<Vec2>,
    /// Click waiting to be resolved on the next frame.
    pub pending_click: Option<Vec2>,
}

/// Last scroll position reported by the host.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScrollInput {
    pub offset: f64,
    pub max_offset: f64,
}

/// Mirror of the gallery overlay's input-blocking flag for this frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputGate {
    pub blocked: bool,
}

/// Pose produced by the journey this frame, written to the camera next.
#[derive(Resource, Debug, Clone, Default)]
pub struct FramePose(pub Option<CameraPose>);

/// Host input subscription held while a scene is active.
#[derive(Resource, Debug, Default)]
pub struct ActiveInput(pub Option<InputSubscription>);

/// Commands sent by the hosting page.
#[derive(Debug, Clone)]
pub enum JourneyCommand {
    /// Page scroll position.
    Scroll { offset: f64, max_offset: f64 },
    /// Restored scroll position; moves the journey there without easing.
    JumpTo { offset: f64, max_offset: f64 },
    /// Viewport resize; changes the aspect ratio and the scrollable range.
    Resize { aspect: f32, max_offset: f64 },
    /// Pointer moved, in normalized device coordinates.
    PointerMove { x: f32, y: f32 },
    /// Pointer left the viewer.
    PointerLeave,
    /// Pointer clicked, in normalized device coordinates.
    PointerClick { x: f32, y: f32 },
    /// Leave the branch view (same as the gallery's resume request).
    Resume,
    /// Block or unblock picking (same as the gallery's overlay flag).
    SetInputBlocked { blocked: bool },
    /// The scene finished loading; start its journey.
    SceneReady { config: JourneyConfig },
    /// The scene is about to be destroyed.
    Teardown,
    /// Frame boundary marker - commands after this are processed in the next frame.
    Yield,
}

impl JourneyCommand {
    /// Returns true for scroll and pointer input.
    pub fn is_host_input(&self) -> bool {
        matches!(
            self,
            Self::Scroll { .. }
                | Self::JumpTo { .. }
                | Self::Resize { .. }
                | Self::PointerMove { .. }
                | Self::PointerLeave
                | Self::PointerClick { .. }
        )
    }
}

#[derive(Debug, Default)]
struct QueueInner {
    commands: VecDeque<JourneyCommand>,
    listeners: usize,
}

/// Thread-safe command queue for host interop.
///
/// Host input is only accepted while an [`InputSubscription`] is alive;
/// dropping the last subscription discards host input still queued.
/// Lifecycle commands are always accepted.
#[derive(Resource, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<QueueInner>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a command to be processed. Returns false when host input was
    /// rejected for lack of a subscription.
    pub fn push(&self, command: JourneyCommand) -> bool {
        let mut guard = self.inner.lock();
        if command.is_host_input() && guard.listeners == 0 {
            tracing::debug!("[command] no input subscription, dropping {command:?}");
            return false;
        }
        guard.commands.push_back(command);
        true
    }

    /// Starts accepting host input until the returned guard is dropped.
    pub fn subscribe(&self) -> InputSubscription {
        self.inner.lock().listeners += 1;
        InputSubscription {
            queue: Arc::downgrade(&self.inner),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.inner.lock().listeners > 0
    }

    /// Drain all pending commands.
    pub fn drain(&self) -> Vec<JourneyCommand> {
        self.inner.lock().commands.drain(..).collect()
    }

    /// Drain commands until Yield or empty.
    ///
    /// Yield itself is consumed but not returned.
    pub fn drain_until_yield(&self) -> Vec<JourneyCommand> {
        let mut guard = self.inner.lock();
        let mut commands = Vec::new();
        while let Some(cmd) = guard.commands.pop_front() {
            if matches!(cmd, JourneyCommand::Yield) {
                tracing::debug!("[command] Yield - deferring remaining commands to next frame");
                break;
            }
            commands.push(cmd);
        }
        commands
    }

    pub fn len(&self) -> usize {
        self.inner.lock().commands.len()
    }

    /// Check if there are pending commands.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().commands.is_empty()
    }

    /// Clear all pending commands.
    pub fn clear(&self) {
        self.inner.lock().commands.clear();
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("CommandQueue")
            .field("pending", &guard.commands.len())
            .field("listeners", &guard.listeners)
            .finish()
    }
}

/// Scoped permission for the host to feed input into a [`CommandQueue`].
#[derive(Debug)]
pub struct InputSubscription {
    queue: Weak<Mutex<QueueInner>>,
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        let Some(inner) = self.queue.upgrade() else {
            return;
        };
        let mut guard = inner.lock();
        guard.listeners = guard.listeners.saturating_sub(1);
        if guard.listeners == 0 {
            let before = guard.commands.len();
            guard.commands.retain(|cmd| !cmd.is_host_input());
            let dropped = before - guard.commands.len();
            if dropped > 0 {
                tracing::debug!("[command] unsubscribed, discarded {dropped} pending inputs");
            }
        }
    }
}
