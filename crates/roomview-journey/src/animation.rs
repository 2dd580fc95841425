//! Frame-driven tweening.
//!
//! The journey only ever needs one tween at a time, so [`Animator`]
//! implementations hold at most one and cancel it when a new one starts.

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized tween time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    #[default]
    EaseInOutCubic,
}

impl Easing {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = -2.0 * t + 2.0;
                    1.0 - f * f * f / 2.0
                }
            }
        }
    }
}

/// A fixed-duration interpolation from 0 to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(duration: f32, easing: Easing) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    fn advance(&mut self, dt: f32) -> TweenFrame {
        self.elapsed += dt.max(0.0);
        let raw = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let finished = raw >= 1.0;
        TweenFrame {
            progress: if finished { 1.0 } else { self.easing.apply(raw) },
            finished,
        }
    }
}

/// Result of advancing the active tween by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenFrame {
    /// Eased progress in `[0, 1]`.
    pub progress: f32,
    /// True exactly once, on the final frame.
    pub finished: bool,
}

/// Drives a single tween from the frame loop.
///
/// `step` plays the role of the per-frame update callback and its
/// `finished` flag the completion callback; both are reported to the caller
/// instead of being stored as closures, so a cancelled tween can never call
/// back into a torn-down scene.
pub trait Animator {
    /// Starts `tween`, cancelling any tween already in flight.
    ///
    /// Returns true when a previous tween was cancelled.
    fn start(&mut self, tween: Tween) -> bool;

    /// Advances the active tween. Returns `None` when idle.
    fn step(&mut self, dt: f32) -> Option<TweenFrame>;

    /// Drops the active tween without completing it.
    fn cancel(&mut self) -> bool;

    fn is_active(&self) -> bool;
}

/// Default [`Animator`] advanced by the journey frame loop.
#[derive(Debug, Default, Clone)]
pub struct FrameAnimator {
    active: Option<Tween>,
    started: u64,
    cancelled: u64,
}

impl FrameAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tweens started so far.
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Number of tweens cancelled before completing.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl Animator for FrameAnimator {
    fn start(&mut self, tween: Tween) -> bool {
        let replaced = self.cancel();
        self.active = Some(tween);
        self.started += 1;
        replaced
    }

    fn step(&mut self, dt: f32) -> Option<TweenFrame> {
        let tween = self.active.as_mut()?;
        let frame = tween.advance(dt);
        if frame.finished {
            self.active = None;
        }
        Some(frame)
    }

    fn cancel(&mut self) -> bool {
        if self.active.take().is_some() {
            self.cancelled += 1;
            true
        } else {
            false
        }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseInOutCubic,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_in_out_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = Easing::EaseInOutCubic.apply(i as f32 / 100.0);
            assert!(v >= prev);
            assert!((0.0..=1.0).contains(&v));
            prev = v;
        }
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut animator = FrameAnimator::new();
        animator.start(Tween::new(0.5, Easing::EaseInOut));

        let mut finished = 0;
        let mut frames = 0;
        while let Some(frame) = animator.step(0.125) {
            frames += 1;
            if frame.finished {
                finished += 1;
                assert_eq!(frame.progress, 1.0);
            }
        }
        assert_eq!(finished, 1);
        assert_eq!(frames, 4);
        assert!(animator.step(0.125).is_none());
    }

    #[test]
    fn test_start_cancels_previous() {
        let mut animator = FrameAnimator::new();
        assert!(!animator.start(Tween::new(1.0, Easing::Linear)));
        animator.step(0.25);
        assert!(animator.start(Tween::new(1.0, Easing::Linear)));
        assert_eq!(animator.cancelled(), 1);

        // The new tween starts from zero.
        let frame = animator.step(0.25).unwrap();
        assert!((frame.progress - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_cancel_does_not_complete() {
        let mut animator = FrameAnimator::new();
        animator.start(Tween::new(1.0, Easing::Linear));
        assert!(animator.cancel());
        assert!(!animator.is_active());
        assert!(animator.step(1.0).is_none());
        assert!(!animator.cancel());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_step() {
        let mut animator = FrameAnimator::new();
        animator.start(Tween::new(0.0, Easing::Linear));
        let frame = animator.step(0.0).unwrap();
        assert!(frame.finished);
    }
}
