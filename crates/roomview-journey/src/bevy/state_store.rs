//! Shared state stores between the journey and the hosting page.
//!
//! The gallery overlay talks to the journey only through [`GalleryStore`];
//! diagnostic panels poll [`DiagnosticsStore`].

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::Resource;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::journey::{JourneyDiagnostics, JourneyState};
use crate::picker::{CursorAffordance, HotspotId};

// ============================================================================
// Data Types
// ============================================================================

/// Journey state summary for diagnostic panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JourneySummary {
    pub state: JourneyState,
    pub camera_position: [f32; 3],
    pub current_t: f64,
    pub cursor: CursorAffordance,
    pub hovered: Option<HotspotId>,
    pub branch_target: Option<HotspotId>,
    pub has_path: bool,
}

impl JourneySummary {
    pub fn from_diagnostics(diagnostics: JourneyDiagnostics) -> Self {
        Self {
            state: diagnostics.state,
            camera_position: diagnostics.camera_position.to_array(),
            current_t: diagnostics.current_t,
            branch_target: diagnostics.branch_target,
            ..Self::default()
        }
    }
}

// ============================================================================
// Individual Stores
// ============================================================================

/// Store shared with the gallery overlay.
#[derive(Debug, Default)]
pub struct GalleryStore {
    input_blocked: RwLock<bool>,
    resume_requested: RwLock<bool>,
    ready: RwLock<VecDeque<HotspotId>>,
    current: RwLock<Option<HotspotId>>,
    version: RwLock<u64>,
}

impl GalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_input_blocked(&self) -> bool {
        *self.input_blocked.read()
    }

    /// Set while the overlay is visible.
    pub fn set_input_blocked(&self, blocked: bool) {
        *self.input_blocked.write() = blocked;
        *self.version.write() += 1;
    }

    /// Asks the journey to leave the branch view.
    pub fn request_resume(&self) {
        *self.resume_requested.write() = true;
    }

    /// Consumes a pending resume request.
    pub fn take_resume_request(&self) -> bool {
        std::mem::take(&mut *self.resume_requested.write())
    }

    /// Records that the camera arrived at `hotspot_id`.
    pub fn notify_branch_ready(&self, hotspot_id: HotspotId) {
        *self.current.write() = Some(hotspot_id.clone());
        self.ready.write().push_back(hotspot_id);
        *self.version.write() += 1;
    }

    /// Clears the current branch once the camera is back on the path.
    pub fn notify_returned(&self) {
        *self.current.write() = None;
        *self.version.write() += 1;
    }

    /// Hotspot whose branch view is showing, if any.
    pub fn current_branch(&self) -> Option<HotspotId> {
        self.current.read().clone()
    }

    /// Drains arrival notifications in order.
    pub fn drain_branch_ready(&self) -> Vec<HotspotId> {
        self.ready.write().drain(..).collect()
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }
}

/// Store for the diagnostic summary.
#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    summary: RwLock<JourneySummary>,
    version: RwLock<u64>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self) -> JourneySummary {
        self.summary.read().clone()
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }

    /// Replaces the summary, bumping the version only on change.
    pub fn update(&self, summary: JourneySummary) {
        let mut current = self.summary.write();
        if *current != summary {
            *current = summary;
            *self.version.write() += 1;
        }
    }
}

// ============================================================================
// Combined State Stores
// ============================================================================

/// All state stores combined for easy sharing.
#[derive(Debug, Clone, Resource)]
pub struct StateStores {
    pub gallery: Arc<GalleryStore>,
    pub diagnostics: Arc<DiagnosticsStore>,
}

impl StateStores {
    pub fn new() -> Self {
        Self {
            gallery: Arc::new(GalleryStore::new()),
            diagnostics: Arc::new(DiagnosticsStore::new()),
        }
    }
}

impl Default for StateStores {
    fn default() -> Self {
        Self::new()
    }
}
