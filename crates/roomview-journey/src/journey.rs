//! The camera journey state machine.
//!
//! [`JourneyMachine`] decides, once per frame, who writes the camera:
//!
//! - `Main`: the path, sampled at the smoothed scroll parameter.
//! - `EnteringBranch` / `Returning`: the branch animator and nothing else.
//! - `AtBranch`: the held branch pose, re-asserted every frame.
//!
//! Selections and resume requests are queued and consumed at the start of
//! the next [`JourneyMachine::frame`], so input never moves the camera
//! outside the frame loop.

use std::collections::HashMap;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{Animator, FrameAnimator};
use crate::branch::{BranchAnimator, LookTrack};
use crate::config::JourneySettings;
use crate::path::JourneyPath;
use crate::picker::{HotspotId, HotspotSelection};
use crate::pose::CameraPose;
use crate::scroll::ScrollProgressMapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyState {
    #[default]
    Main,
    EnteringBranch,
    AtBranch,
    Returning,
}

impl JourneyState {
    pub fn is_main(self) -> bool {
        self == Self::Main
    }

    /// True while the branch animator owns the camera.
    pub fn is_transition(self) -> bool {
        matches!(self, Self::EnteringBranch | Self::Returning)
    }
}

/// Camera state on the main path at the moment of leaving it.
///
/// Captured once per excursion and only read afterwards; the return flight
/// lands on it exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    t: f64,
    position: Vec3,
    look_at: Vec3,
}

impl CameraSnapshot {
    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.look_at)
    }
}

/// Where the camera parks to inspect a hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchTarget {
    pub hotspot_id: HotspotId,
    pub world_position: Vec3,
    pub focal_distance: f32,
    /// Camera position relative to the hotspot.
    pub facing_offset: Vec3,
}

impl BranchTarget {
    /// Places the camera `focal_distance` back from the hotspot along the
    /// camera→hotspot direction, at least `min_height` above it.
    pub fn compute(
        hotspot_id: impl Into<HotspotId>,
        world_position: Vec3,
        camera_position: Vec3,
        focal_distance: f32,
        min_height: f32,
    ) -> Self {
        let direction = (world_position - camera_position).normalize_or(Vec3::NEG_Z);
        let mut facing_offset = -direction * focal_distance;
        facing_offset.y = facing_offset.y.max(min_height);

        Self {
            hotspot_id: hotspot_id.into(),
            world_position,
            focal_distance,
            facing_offset,
        }
    }

    pub fn camera_position(&self) -> Vec3 {
        self.world_position + self.facing_offset
    }
}

/// Notifications produced by a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum JourneyEvent {
    /// A flight toward a hotspot started. `retargeted` is set when it
    /// replaced a flight or branch view already in progress.
    BranchStarted {
        hotspot_id: HotspotId,
        retargeted: bool,
    },
    /// The camera arrived at a hotspot.
    BranchReady { hotspot_id: HotspotId },
    ReturnStarted,
    /// Back on the main path at parameter `t`.
    ReturnedToMain { t: f64 },
}

/// Read-only state for diagnostic panels.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyDiagnostics {
    pub state: JourneyState,
    pub camera_position: Vec3,
    pub current_t: f64,
    pub branch_target: Option<HotspotId>,
}

/// Result of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// The pose to write to the camera, if any.
    pub pose: Option<CameraPose>,
    pub events: Vec<JourneyEvent>,
}

#[derive(Debug)]
pub struct JourneyMachine<A = FrameAnimator> {
    state: JourneyState,
    settings: JourneySettings,
    path: Option<JourneyPath>,
    mapper: ScrollProgressMapper,
    branch: BranchAnimator<A>,
    snapshot: Option<CameraSnapshot>,
    target: Option<BranchTarget>,
    /// Last pose written (or the scene's initial camera).
    pose: CameraPose,
    focal_overrides: HashMap<HotspotId, f32>,
    pending_select: Option<HotspotSelection>,
    pending_resume: bool,
}

impl Default for JourneyMachine<FrameAnimator> {
    fn default() -> Self {
        Self::new(JourneySettings::default())
    }
}

impl JourneyMachine<FrameAnimator> {
    pub fn new(settings: JourneySettings) -> Self {
        Self::with_animator(FrameAnimator::new(), settings)
    }
}

impl<A: Animator> JourneyMachine<A> {
    pub fn with_animator(animator: A, settings: JourneySettings) -> Self {
        let mapper = ScrollProgressMapper::new(settings.scroll_smoothing_rate, settings.scroll_epsilon);
        let branch = BranchAnimator::new(
            animator,
            settings.easing,
            settings.arc_lateral_ratio,
            settings.arc_lift_ratio,
        );
        Self {
            state: JourneyState::Main,
            settings,
            path: None,
            mapper,
            branch,
            snapshot: None,
            target: None,
            pose: CameraPose::default(),
            focal_overrides: HashMap::new(),
            pending_select: None,
            pending_resume: false,
        }
    }

    /// Applies new tuning. Flights already in progress keep their shape.
    pub fn configure(&mut self, settings: JourneySettings) {
        self.mapper
            .set_tuning(settings.scroll_smoothing_rate, settings.scroll_epsilon);
        self.branch.set_shape(
            settings.easing,
            settings.arc_lateral_ratio,
            settings.arc_lift_ratio,
        );
        self.settings = settings;
    }

    /// Installs the path of a newly loaded scene.
    ///
    /// Anything left over from the previous scene is dropped without
    /// completing. `camera` is the scene's initial camera, which the path
    /// was seeded with.
    pub fn load_path(&mut self, path: Option<JourneyPath>, camera: CameraPose) {
        self.reset();
        self.pose = camera;
        self.mapper.restart_from(0.0);
        self.path = path;
        tracing::info!(
            "[journey] scene loaded (path: {})",
            if self.path.is_some() { "yes" } else { "none" }
        );
    }

    pub fn set_focal_overrides(&mut self, overrides: HashMap<HotspotId, f32>) {
        self.focal_overrides = overrides;
    }

    pub fn focal_distance(&self, hotspot_id: &str) -> f32 {
        self.focal_overrides
            .get(hotspot_id)
            .copied()
            .unwrap_or(self.settings.default_focal_distance)
    }

    /// Records the host scroll position for the next frame.
    pub fn set_scroll(&mut self, offset: f64, max_offset: f64) {
        if self.path.is_none() {
            tracing::debug!("[journey] scroll ignored, no path");
            return;
        }
        self.mapper.set_scroll(offset, max_offset);
    }

    /// Moves the main journey to `t` without easing (scroll restoration).
    pub fn jump_to(&mut self, t: f64) {
        if self.path.is_some() && self.state.is_main() {
            self.mapper.jump_to(t);
        }
    }

    /// Queues a hotspot selection for the next frame.
    ///
    /// Returns false when the selection was dropped because no path is
    /// loaded.
    pub fn select(&mut self, selection: HotspotSelection) -> bool {
        if self.path.is_none() {
            tracing::debug!(
                "[journey] selection of {} ignored, no path",
                selection.hotspot_id
            );
            return false;
        }
        self.pending_select = Some(selection);
        true
    }

    /// Queues a return to the main path for the next frame.
    pub fn request_resume(&mut self) {
        self.pending_resume = true;
    }

    /// Advances one frame and returns the pose to write.
    pub fn frame(&mut self, dt: f32) -> FrameOutput {
        let mut events = Vec::new();

        if let Some(selection) = self.pending_select.take() {
            self.begin_branch(selection, &mut events);
        }
        if std::mem::take(&mut self.pending_resume) {
            self.begin_return(&mut events);
        }

        let pose = match self.state {
            JourneyState::Main => self
                .path
                .as_ref()
                .map(|path| path.sample_pose(self.mapper.tick(dt))),
            JourneyState::EnteringBranch | JourneyState::Returning => {
                Some(self.step_transition(dt, &mut events))
            }
            JourneyState::AtBranch => Some(self.pose),
        };

        if let Some(pose) = pose {
            self.pose = pose;
        }
        FrameOutput { pose, events }
    }

    /// Cancels everything without completing it and forgets the path.
    ///
    /// Returns true when a flight was cancelled.
    pub fn teardown(&mut self) -> bool {
        let cancelled = self.reset();
        self.path = None;
        if cancelled {
            tracing::info!("[journey] teardown cancelled a flight in progress");
        }
        cancelled
    }

    pub fn state(&self) -> JourneyState {
        self.state
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn snapshot(&self) -> Option<&CameraSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn branch_target(&self) -> Option<&BranchTarget> {
        self.target.as_ref()
    }

    pub fn path(&self) -> Option<&JourneyPath> {
        self.path.as_ref()
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn mapper(&self) -> &ScrollProgressMapper {
        &self.mapper
    }

    pub fn settings(&self) -> &JourneySettings {
        &self.settings
    }

    pub fn animator(&self) -> &A {
        self.branch.animator()
    }

    pub fn diagnostics(&self) -> JourneyDiagnostics {
        JourneyDiagnostics {
            state: self.state,
            camera_position: self.pose.position,
            current_t: self.mapper.current(),
            branch_target: self.target.as_ref().map(|t| t.hotspot_id.clone()),
        }
    }

    fn begin_branch(&mut self, selection: HotspotSelection, events: &mut Vec<JourneyEvent>) {
        let same_target = self
            .target
            .as_ref()
            .is_some_and(|t| t.hotspot_id == selection.hotspot_id);
        if same_target && matches!(self.state, JourneyState::EnteringBranch | JourneyState::AtBranch)
        {
            tracing::debug!(
                "[journey] {} already selected, ignoring",
                selection.hotspot_id
            );
            return;
        }

        if self.snapshot.is_none() {
            let snapshot = CameraSnapshot {
                t: self.mapper.current(),
                position: self.pose.position,
                look_at: self.pose.look_at,
            };
            tracing::info!(
                "[journey] leaving main path at t={:.4} ({:?})",
                snapshot.t,
                snapshot.position
            );
            self.snapshot = Some(snapshot);
            self.mapper.suspend();
        }

        let target = BranchTarget::compute(
            selection.hotspot_id.clone(),
            selection.position,
            self.pose.position,
            self.focal_distance(&selection.hotspot_id),
            self.settings.min_height_above_target,
        );
        let retargeted = self.branch.animate(
            self.pose.position,
            target.camera_position(),
            LookTrack::fixed(target.world_position),
            self.settings.branch_duration,
        ) || !self.state.is_main();

        tracing::info!(
            "[journey] {:?} -> EnteringBranch: {} (retargeted: {retargeted})",
            self.state,
            target.hotspot_id
        );
        events.push(JourneyEvent::BranchStarted {
            hotspot_id: target.hotspot_id.clone(),
            retargeted,
        });
        self.target = Some(target);
        self.state = JourneyState::EnteringBranch;
    }

    fn begin_return(&mut self, events: &mut Vec<JourneyEvent>) {
        if self.state != JourneyState::AtBranch {
            tracing::debug!("[journey] resume ignored in {:?}", self.state);
            return;
        }
        let Some(snapshot) = self.snapshot else {
            tracing::error!("[journey] at branch without a snapshot, staying put");
            return;
        };

        self.branch.animate(
            self.pose.position,
            snapshot.position,
            LookTrack::blend(self.pose.look_at, snapshot.look_at),
            self.settings.return_duration,
        );
        tracing::info!("[journey] AtBranch -> Returning (t={:.4})", snapshot.t);
        events.push(JourneyEvent::ReturnStarted);
        self.state = JourneyState::Returning;
    }

    fn step_transition(&mut self, dt: f32, events: &mut Vec<JourneyEvent>) -> CameraPose {
        let Some(step) = self.branch.step(dt) else {
            tracing::error!("[journey] {:?} without an active flight", self.state);
            return self.pose;
        };
        if !step.completed {
            return step.pose;
        }

        match self.state {
            JourneyState::EnteringBranch => {
                let hotspot_id = self
                    .target
                    .as_ref()
                    .map(|t| t.hotspot_id.clone())
                    .unwrap_or_default();
                tracing::info!("[journey] EnteringBranch -> AtBranch: {hotspot_id}");
                events.push(JourneyEvent::BranchReady { hotspot_id });
                self.state = JourneyState::AtBranch;
            }
            JourneyState::Returning => {
                let t = self.snapshot.take().map_or(0.0, |s| s.t);
                self.target = None;
                // Path sampling picks up from here toward the latest scroll target.
                self.mapper.restart_from(t);
                self.mapper.resume();
                tracing::info!(
                    "[journey] Returning -> Main (t={t:.4}, scroll target {:.4})",
                    self.mapper.target()
                );
                events.push(JourneyEvent::ReturnedToMain { t });
                self.state = JourneyState::Main;
            }
            JourneyState::Main | JourneyState::AtBranch => {}
        }
        step.pose
    }

    fn reset(&mut self) -> bool {
        let cancelled = self.branch.cancel();
        self.state = JourneyState::Main;
        self.snapshot = None;
        self.target = None;
        self.pending_select = None;
        self.pending_resume = false;
        self.mapper.resume();
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn scenario_machine() -> JourneyMachine {
        let path = JourneyPath::build(
            Vec3::ZERO,
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 5.0, 10.0),
            ],
            &[],
        );
        let mut machine = JourneyMachine::default();
        machine.load_path(path, CameraPose::new(Vec3::ZERO, Vec3::NEG_Z));
        machine
    }

    fn hotspot(id: &str, position: Vec3) -> HotspotSelection {
        HotspotSelection {
            hotspot_id: id.to_string(),
            position,
        }
    }

    fn run(machine: &mut JourneyMachine, frames: usize) -> Vec<JourneyEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(machine.frame(DT).events);
        }
        events
    }

    fn run_until(machine: &mut JourneyMachine, state: JourneyState) -> Vec<JourneyEvent> {
        let mut events = Vec::new();
        for _ in 0..1_000 {
            events.extend(machine.frame(DT).events);
            if machine.state() == state {
                return events;
            }
        }
        panic!("never reached {state:?}, stuck in {:?}", machine.state());
    }

    fn settle_at(machine: &mut JourneyMachine, t: f64) {
        machine.set_scroll(t, 1.0);
        run(machine, 600);
        assert!((machine.mapper().current() - t).abs() < 1e-9);
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_main_writes_path_sample() {
        let mut machine = scenario_machine();
        machine.set_scroll(0.3, 1.0);
        for _ in 0..120 {
            let pose = machine.frame(DT).pose.unwrap();
            let path = machine.path().unwrap();
            let t = machine.mapper().current();
            assert_eq!(pose, path.sample_pose(t));
        }
    }

    #[test]
    fn test_jump_to_skips_easing() {
        let mut machine = scenario_machine();
        machine.jump_to(0.7);
        let pose = machine.frame(DT).pose.unwrap();
        assert_eq!(pose, machine.path().unwrap().sample_pose(0.7));
    }

    #[test]
    fn test_no_path_is_inert() {
        let mut machine = JourneyMachine::default();
        machine.load_path(None, CameraPose::default());
        machine.set_scroll(0.5, 1.0);
        assert!(!machine.select(hotspot("sofa", Vec3::ONE)));

        let output = machine.frame(DT);
        assert!(output.pose.is_none());
        assert!(output.events.is_empty());
        assert_eq!(machine.state(), JourneyState::Main);
        assert_eq!(machine.mapper().target(), 0.0);
    }

    #[test]
    fn test_select_is_applied_on_next_frame() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        assert_eq!(machine.state(), JourneyState::Main);
        assert!(machine.snapshot().is_none());

        let output = machine.frame(DT);
        assert_eq!(machine.state(), JourneyState::EnteringBranch);
        assert_eq!(
            output.events,
            vec![JourneyEvent::BranchStarted {
                hotspot_id: "sofa".into(),
                retargeted: false
            }]
        );
        assert!((machine.snapshot().unwrap().t() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_branch_ready_fires_once_and_holds_pose() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));

        let events = run_until(&mut machine, JourneyState::AtBranch);
        let ready = events
            .iter()
            .filter(|e| matches!(e, JourneyEvent::BranchReady { .. }))
            .count();
        assert_eq!(ready, 1);

        let target = machine.branch_target().unwrap().clone();
        let held = machine.pose();
        assert_eq!(held.position, target.camera_position());
        assert_eq!(held.look_at, target.world_position);

        machine.set_scroll(0.9, 1.0);
        for _ in 0..60 {
            assert_eq!(machine.frame(DT).pose, Some(held));
        }
        assert!(run(&mut machine, 60).is_empty());
    }

    #[test]
    fn test_exact_return_without_scroll() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        let departure = machine.pose();

        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run_until(&mut machine, JourneyState::AtBranch);
        machine.request_resume();
        let events = run_until(&mut machine, JourneyState::Main);

        assert!(events.contains(&JourneyEvent::ReturnStarted));
        assert!(close(machine.pose().position, departure.position));
        assert!(close(machine.pose().look_at, departure.look_at));
        assert!(machine.snapshot().is_none());

        // Next main frame continues from the same place.
        let next = machine.frame(DT).pose.unwrap();
        assert!(close(next.position, departure.position));
    }

    #[test]
    fn test_resume_from_new_scroll() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);

        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run_until(&mut machine, JourneyState::AtBranch);

        machine.set_scroll(0.8, 1.0);
        run(&mut machine, 30);
        assert!((machine.mapper().current() - 0.5).abs() < 1e-9);

        machine.request_resume();
        run_until(&mut machine, JourneyState::Main);
        run(&mut machine, 600);

        let path = machine.path().unwrap();
        let expected = path.sample(0.8);
        assert!(
            close(machine.pose().position, expected),
            "{:?} != {expected:?}",
            machine.pose().position
        );
        assert!(machine.pose().position.distance(path.sample(0.5)) > 1.0);
    }

    #[test]
    fn test_retarget_keeps_original_snapshot() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        let departure = machine.pose();

        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run(&mut machine, 20);
        let snapshot = *machine.snapshot().unwrap();

        machine.select(hotspot("lamp", Vec3::new(12.0, 2.0, 4.0)));
        let output = machine.frame(DT);
        assert_eq!(
            output.events,
            vec![JourneyEvent::BranchStarted {
                hotspot_id: "lamp".into(),
                retargeted: true
            }]
        );
        assert_eq!(machine.animator().cancelled(), 1);
        assert_eq!(*machine.snapshot().unwrap(), snapshot);

        run_until(&mut machine, JourneyState::AtBranch);
        assert_eq!(machine.branch_target().unwrap().hotspot_id, "lamp");

        // A second visit from the branch view still returns to the path.
        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run_until(&mut machine, JourneyState::AtBranch);
        assert_eq!(*machine.snapshot().unwrap(), snapshot);

        machine.request_resume();
        run_until(&mut machine, JourneyState::Main);
        assert!(close(machine.pose().position, departure.position));
    }

    #[test]
    fn test_select_during_return_keeps_snapshot() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        let departure = machine.pose();

        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run_until(&mut machine, JourneyState::AtBranch);
        let snapshot = *machine.snapshot().unwrap();

        machine.request_resume();
        run(&mut machine, 20);
        assert_eq!(machine.state(), JourneyState::Returning);

        machine.select(hotspot("lamp", Vec3::new(12.0, 2.0, 4.0)));
        let output = machine.frame(DT);
        assert_eq!(
            output.events,
            vec![JourneyEvent::BranchStarted {
                hotspot_id: "lamp".into(),
                retargeted: true
            }]
        );
        assert_eq!(machine.state(), JourneyState::EnteringBranch);
        assert_eq!(machine.animator().cancelled(), 1);
        assert_eq!(*machine.snapshot().unwrap(), snapshot);
        assert!(machine.mapper().is_suspended());

        run_until(&mut machine, JourneyState::AtBranch);
        assert_eq!(machine.branch_target().unwrap().hotspot_id, "lamp");

        machine.request_resume();
        run_until(&mut machine, JourneyState::Main);
        assert!(close(machine.pose().position, departure.position));
        assert!(!machine.mapper().is_suspended());
        assert!((machine.mapper().current() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_resume_outside_branch_is_ignored() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.2);
        machine.request_resume();
        assert!(machine.frame(DT).events.is_empty());
        assert_eq!(machine.state(), JourneyState::Main);

        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        machine.frame(DT);
        machine.request_resume();
        machine.frame(DT);
        assert_eq!(machine.state(), JourneyState::EnteringBranch);
    }

    #[test]
    fn test_reselecting_current_target_is_ignored() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run_until(&mut machine, JourneyState::AtBranch);

        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        assert!(machine.frame(DT).events.is_empty());
        assert_eq!(machine.state(), JourneyState::AtBranch);
        assert_eq!(machine.animator().started(), 1);
    }

    #[test]
    fn test_teardown_cancels_without_completing() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        run(&mut machine, 10);

        assert!(machine.teardown());
        assert_eq!(machine.state(), JourneyState::Main);
        assert!(machine.snapshot().is_none());
        assert!(!machine.has_path());

        let output = machine.frame(DT);
        assert!(output.pose.is_none());
        assert!(output.events.is_empty());
    }

    #[test]
    fn test_identical_inputs_identical_trajectories() {
        fn trajectory() -> Vec<CameraPose> {
            let mut machine = scenario_machine();
            let mut poses = Vec::new();
            for frame in 0..400 {
                match frame {
                    0 => machine.set_scroll(400.0, 1000.0),
                    90 => {
                        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
                    }
                    250 => machine.set_scroll(700.0, 1000.0),
                    260 => machine.request_resume(),
                    _ => {}
                }
                poses.extend(machine.frame(DT).pose);
            }
            poses
        }
        assert_eq!(trajectory(), trajectory());
    }

    #[test]
    fn test_branch_target_height_clamp() {
        // Approaching from below would otherwise park under the hotspot.
        let target = BranchTarget::compute(
            "rug",
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, -10.0, 0.0),
            3.0,
            0.5,
        );
        assert!(target.camera_position().y >= 0.5 - 1e-6);

        let level = BranchTarget::compute(
            "tv",
            Vec3::new(0.0, 1.0, -10.0),
            Vec3::new(0.0, 1.0, 0.0),
            2.0,
            0.25,
        );
        assert!(close(level.camera_position(), Vec3::new(0.0, 1.25, -8.0)));
    }

    #[test]
    fn test_diagnostics_reflect_state() {
        let mut machine = scenario_machine();
        settle_at(&mut machine, 0.5);
        machine.select(hotspot("sofa", Vec3::new(5.0, 1.0, 3.0)));
        machine.frame(DT);

        let diagnostics = machine.diagnostics();
        assert_eq!(diagnostics.state, JourneyState::EnteringBranch);
        assert_eq!(diagnostics.branch_target.as_deref(), Some("sofa"));
        assert!((diagnostics.current_t - 0.5).abs() < 1e-9);
        assert_eq!(diagnostics.camera_position, machine.pose().position);
    }
}
