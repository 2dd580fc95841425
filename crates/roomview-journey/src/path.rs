//! Camera paths for the main journey.
//!
//! A [`ControlPath`] is a centripetal Catmull-Rom spline through an ordered
//! list of control points. The global parameter `t` is mapped linearly onto
//! the centripetal knot parameter, which keeps the curve C¹ in `t` across
//! interior control points. All evaluation is done in double precision.

use bevy::math::{DVec3, Vec3};

use crate::pose::CameraPose;

/// Centripetal parameterization exponent.
const ALPHA: f64 = 0.5;
/// Consecutive control points closer than this are collapsed.
const COINCIDENT_EPSILON: f64 = 1e-9;
/// How far ahead (in `t`) the fallback look target is sampled.
const LOOK_AHEAD: f64 = 0.01;

/// An open spline through a non-empty list of control points.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPath {
    points: Vec<DVec3>,
    /// Cumulative centripetal knots, `knots[0] == 0.0`, strictly increasing.
    knots: Vec<f64>,
}

impl ControlPath {
    /// Builds a path from control points.
    ///
    /// Returns `None` when no finite point remains.
    pub fn new(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut deduped: Vec<DVec3> = Vec::new();
        for point in points {
            let point = point.as_dvec3();
            if !point.is_finite() {
                tracing::warn!("[path] skipping non-finite control point {point:?}");
                continue;
            }
            if deduped
                .last()
                .is_some_and(|last| last.distance(point) <= COINCIDENT_EPSILON)
            {
                continue;
            }
            deduped.push(point);
        }

        if deduped.is_empty() {
            return None;
        }

        let mut knots = Vec::with_capacity(deduped.len());
        let mut acc = 0.0;
        knots.push(acc);
        for pair in deduped.windows(2) {
            acc += pair[0].distance(pair[1]).powf(ALPHA);
            knots.push(acc);
        }

        Some(Self {
            points: deduped,
            knots,
        })
    }

    /// Number of distinct control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples the path at `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Vec3 {
        self.sample_precise(t).as_vec3()
    }

    /// Samples the path at `t` without narrowing to `f32`.
    pub fn sample_precise(&self, t: f64) -> DVec3 {
        let n = self.points.len();
        if n == 1 {
            return self.points[0];
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return self.points[0];
        }
        if t >= 1.0 {
            return self.points[n - 1];
        }

        let u = t * self.knots[n - 1];
        // Segment `seg` spans knots[seg]..knots[seg + 1].
        let seg = self
            .knots
            .partition_point(|k| *k <= u)
            .saturating_sub(1)
            .min(n - 2);

        let p1 = self.points[seg];
        let p2 = self.points[seg + 1];
        let t1 = self.knots[seg];
        let t2 = self.knots[seg + 1];

        // Phantom end points are reflections, so their knot interval equals
        // the neighbouring one.
        let (p0, t0) = if seg == 0 {
            (2.0 * p1 - p2, t1 - (t2 - t1))
        } else {
            (self.points[seg - 1], self.knots[seg - 1])
        };
        let (p3, t3) = if seg + 2 < n {
            (self.points[seg + 2], self.knots[seg + 2])
        } else {
            (2.0 * p2 - p1, t2 + (t2 - t1))
        };

        barry_goldman([p0, p1, p2, p3], [t0, t1, t2, t3], u)
    }
}

/// Evaluates one centripetal Catmull-Rom segment between `p[1]` and `p[2]`.
fn barry_goldman(p: [DVec3; 4], k: [f64; 4], u: f64) -> DVec3 {
    let lerp = |a: DVec3, b: DVec3, ka: f64, kb: f64| {
        a * ((kb - u) / (kb - ka)) + b * ((u - ka) / (kb - ka))
    };

    let a1 = lerp(p[0], p[1], k[0], k[1]);
    let a2 = lerp(p[1], p[2], k[1], k[2]);
    let a3 = lerp(p[2], p[3], k[2], k[3]);
    let b1 = lerp(a1, a2, k[0], k[2]);
    let b2 = lerp(a2, a3, k[1], k[3]);
    lerp(b1, b2, k[1], k[2])
}

/// The position path and its parallel look-at path.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyPath {
    position: ControlPath,
    look_at: Option<ControlPath>,
}

impl JourneyPath {
    /// Builds the main journey path.
    ///
    /// `seed` is the camera position when the journey begins and becomes the
    /// first control point. Returns `None` when no waypoints are authored,
    /// which leaves the journey inert.
    pub fn build(seed: Vec3, waypoints: &[Vec3], look_targets: &[Vec3]) -> Option<Self> {
        if waypoints.is_empty() {
            tracing::warn!("[path] no waypoints configured, journey disabled");
            return None;
        }

        let position = ControlPath::new(std::iter::once(seed).chain(waypoints.iter().copied()))?;
        let look_at = ControlPath::new(look_targets.iter().copied());

        tracing::info!(
            "[path] built journey path: {} control points, {} look targets",
            position.len(),
            look_at.as_ref().map_or(0, ControlPath::len)
        );

        Some(Self { position, look_at })
    }

    pub fn position_path(&self) -> &ControlPath {
        &self.position
    }

    pub fn look_at_path(&self) -> Option<&ControlPath> {
        self.look_at.as_ref()
    }

    pub fn sample(&self, t: f64) -> Vec3 {
        self.position.sample(t)
    }

    /// Looks along the authored look-at path, or slightly ahead on the
    /// position path when none was authored.
    pub fn sample_look_at(&self, t: f64) -> Vec3 {
        if let Some(look_at) = &self.look_at {
            return look_at.sample(t);
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let here = self.position.sample_precise(t);
        let ahead = if t + LOOK_AHEAD <= 1.0 {
            self.position.sample_precise(t + LOOK_AHEAD)
        } else {
            // Past the end: extrapolate along the final tangent.
            here + (here - self.position.sample_precise(t - LOOK_AHEAD))
        };

        if ahead.distance(here) <= COINCIDENT_EPSILON {
            (here + DVec3::NEG_Z).as_vec3()
        } else {
            ahead.as_vec3()
        }
    }

    pub fn sample_pose(&self, t: f64) -> CameraPose {
        CameraPose::new(self.sample(t), self.sample_look_at(t))
    }
}
