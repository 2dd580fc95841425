//! Scroll offset to journey progress mapping.

/// Converts the host scroll offset into a smoothed path parameter.
///
/// The target follows the scroll position immediately; the current value
/// approaches it with a frame-rate independent exponential decay:
///
///   `current += (target - current) * (1 - exp(-rate * dt))`
///
/// While suspended, scroll input still moves the target but `tick` leaves
/// the current value untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollProgressMapper {
    target: f64,
    current: f64,
    /// Approach rate in 1/s (higher = snappier).
    rate: f64,
    /// Snap distance once the current value is close enough.
    epsilon: f64,
    suspended: bool,
}

impl Default for ScrollProgressMapper {
    fn default() -> Self {
        Self::new(6.0, 1e-6)
    }
}

impl ScrollProgressMapper {
    pub fn new(rate: f64, epsilon: f64) -> Self {
        Self {
            target: 0.0,
            current: 0.0,
            rate,
            epsilon,
            suspended: false,
        }
    }

    /// Updates the tuning without touching progress.
    pub fn set_tuning(&mut self, rate: f64, epsilon: f64) {
        self.rate = rate;
        self.epsilon = epsilon;
    }

    /// Records a new scroll position.
    ///
    /// A non-positive `max_offset` (content does not overflow) maps to 0.
    pub fn set_scroll(&mut self, offset: f64, max_offset: f64) {
        self.target = if max_offset > 0.0 && offset.is_finite() {
            (offset / max_offset).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Moves both target and current to `t` without easing.
    pub fn jump_to(&mut self, t: f64) {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        self.target = t;
        self.current = t;
    }

    /// Restarts easing from `t` while keeping the scroll target.
    pub fn restart_from(&mut self, t: f64) {
        self.current = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    }

    /// Advances one frame and returns the current parameter.
    pub fn tick(&mut self, dt: f32) -> f64 {
        if self.suspended {
            return self.current;
        }

        let delta = self.target - self.current;
        if delta.abs() <= self.epsilon {
            self.current = self.target;
        } else {
            let blend = 1.0 - (-self.rate * f64::from(dt.max(0.0))).exp();
            self.current += delta * blend;
        }
        self.current
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_target_from_offset() {
        let mut mapper = ScrollProgressMapper::default();
        mapper.set_scroll(250.0, 1000.0);
        assert!((mapper.target() - 0.25).abs() < 1e-12);
        mapper.set_scroll(5000.0, 1000.0);
        assert_eq!(mapper.target(), 1.0);
    }

    #[test]
    fn test_no_overflow_maps_to_zero() {
        let mut mapper = ScrollProgressMapper::default();
        mapper.set_scroll(120.0, 0.0);
        assert_eq!(mapper.target(), 0.0);
    }

    #[test]
    fn test_eases_instead_of_snapping() {
        let mut mapper = ScrollProgressMapper::default();
        mapper.set_scroll(1.0, 1.0);
        let first = mapper.tick(DT);
        assert!(first > 0.0 && first < 0.5, "first tick jumped to {first}");

        let mut prev = first;
        for _ in 0..600 {
            let t = mapper.tick(DT);
            assert!(t >= prev);
            prev = t;
        }
        assert_eq!(prev, 1.0);
    }

    #[test]
    fn test_suspended_holds_current() {
        let mut mapper = ScrollProgressMapper::default();
        mapper.jump_to(0.5);
        mapper.suspend();
        mapper.set_scroll(0.8, 1.0);
        for _ in 0..30 {
            assert_eq!(mapper.tick(DT), 0.5);
        }
        assert!((mapper.target() - 0.8).abs() < 1e-12);

        mapper.resume();
        assert!(mapper.tick(DT) > 0.5);
    }

    #[test]
    fn test_frame_rate_independent() {
        let mut fast = ScrollProgressMapper::default();
        let mut slow = ScrollProgressMapper::default();
        fast.set_scroll(1.0, 1.0);
        slow.set_scroll(1.0, 1.0);
        for _ in 0..4 {
            fast.tick(DT / 2.0);
        }
        slow.tick(DT);
        slow.tick(DT);
        assert!((fast.current() - slow.current()).abs() < 1e-9);
    }
}
