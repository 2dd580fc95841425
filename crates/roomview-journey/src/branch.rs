//! Curved camera flights between the main path and a hotspot.

use bevy::math::Vec3;

use crate::animation::{Animator, Easing, FrameAnimator, Tween};
use crate::pose::CameraPose;

/// Cubic Bézier used for a single flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchCurve {
    pub control_points: [Vec3; 4],
}

impl BranchCurve {
    /// Builds a gentle arc from `from` to `to`.
    ///
    /// Both inner control points sit at a third and two thirds of the way,
    /// pushed sideways along the horizontal perpendicular of the travel
    /// direction by `lateral_ratio * distance` and raised by
    /// `lift_ratio * distance`.
    pub fn arc(from: Vec3, to: Vec3, lateral_ratio: f32, lift_ratio: f32) -> Self {
        let travel = to - from;
        let distance = travel.length();

        let mut side = travel.cross(Vec3::Y).normalize_or_zero();
        if side == Vec3::ZERO {
            // Vertical travel has no horizontal perpendicular.
            side = Vec3::X;
        }
        let bend = side * (distance * lateral_ratio) + Vec3::Y * (distance * lift_ratio);

        Self {
            control_points: [
                from,
                from + travel / 3.0 + bend,
                from + travel * (2.0 / 3.0) + bend,
                to,
            ],
        }
    }

    pub fn end(&self) -> Vec3 {
        self.control_points[3]
    }

    /// Evaluates the curve; `s` is clamped to `[0, 1]`.
    pub fn evaluate(&self, s: f32) -> Vec3 {
        if s <= 0.0 {
            return self.control_points[0];
        }
        if s >= 1.0 {
            return self.control_points[3];
        }

        let [p0, p1, p2, p3] = self.control_points;
        let u = 1.0 - s;
        p0 * (u * u * u) + p1 * (3.0 * u * u * s) + p2 * (3.0 * u * s * s) + p3 * (s * s * s)
    }
}

/// Where the camera looks during a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookTrack {
    pub from: Vec3,
    pub to: Vec3,
}

impl LookTrack {
    /// Keeps facing one point for the whole flight.
    pub fn fixed(target: Vec3) -> Self {
        Self {
            from: target,
            to: target,
        }
    }

    /// Moves the look target from `from` to `to` with the flight.
    pub fn blend(from: Vec3, to: Vec3) -> Self {
        Self { from, to }
    }

    pub fn at(&self, s: f32) -> Vec3 {
        if s >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, s.max(0.0))
        }
    }
}

/// One frame of a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchStep {
    pub pose: CameraPose,
    /// Set on the final frame only.
    pub completed: bool,
}

#[derive(Debug, Clone)]
struct Flight {
    curve: BranchCurve,
    look: LookTrack,
}

/// Flies the camera along a [`BranchCurve`].
///
/// Endpoints are copied when the flight starts, so a hotspot that disappears
/// mid-flight still lets the flight finish on its last known position.
#[derive(Debug, Clone)]
pub struct BranchAnimator<A = FrameAnimator> {
    animator: A,
    flight: Option<Flight>,
    easing: Easing,
    lateral_ratio: f32,
    lift_ratio: f32,
}

impl Default for BranchAnimator<FrameAnimator> {
    fn default() -> Self {
        Self::new(FrameAnimator::new(), Easing::default(), 0.15, 0.1)
    }
}

impl<A: Animator> BranchAnimator<A> {
    pub fn new(animator: A, easing: Easing, lateral_ratio: f32, lift_ratio: f32) -> Self {
        Self {
            animator,
            flight: None,
            easing,
            lateral_ratio,
            lift_ratio,
        }
    }

    pub fn set_shape(&mut self, easing: Easing, lateral_ratio: f32, lift_ratio: f32) {
        self.easing = easing;
        self.lateral_ratio = lateral_ratio;
        self.lift_ratio = lift_ratio;
    }

    /// Starts a flight, cancelling the one in flight if any.
    ///
    /// Returns true when a previous flight was cancelled.
    pub fn animate(&mut self, from: Vec3, to: Vec3, look: LookTrack, duration: f32) -> bool {
        let curve = BranchCurve::arc(from, to, self.lateral_ratio, self.lift_ratio);
        let cancelled = self.animator.start(Tween::new(duration, self.easing));
        self.flight = Some(Flight { curve, look });
        if cancelled {
            tracing::debug!("[branch] cancelled flight in progress");
        }
        cancelled
    }

    /// Advances the flight by one frame. Returns `None` when idle.
    pub fn step(&mut self, dt: f32) -> Option<BranchStep> {
        let frame = self.animator.step(dt)?;
        let Some(flight) = self.flight.as_ref() else {
            // Animator and flight are started and cleared together.
            tracing::error!("[branch] tween running without a flight");
            self.animator.cancel();
            return None;
        };

        let pose = if frame.finished {
            CameraPose::new(flight.curve.end(), flight.look.to)
        } else {
            CameraPose::new(
                flight.curve.evaluate(frame.progress),
                flight.look.at(frame.progress),
            )
        };

        if frame.finished {
            self.flight = None;
        }

        Some(BranchStep {
            pose,
            completed: frame.finished,
        })
    }

    /// Drops the flight without completing it.
    pub fn cancel(&mut self) -> bool {
        self.flight = None;
        self.animator.cancel()
    }

    pub fn is_active(&self) -> bool {
        self.animator.is_active()
    }

    /// The curve being flown, if any.
    pub fn curve(&self) -> Option<&BranchCurve> {
        self.flight.as_ref().map(|f| &f.curve)
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }
}
