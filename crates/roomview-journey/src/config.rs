//! Authored journey configuration.

use std::collections::HashMap;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::Easing;
use crate::path::JourneyPath;

/// Errors raised while loading a journey configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse journey config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field}[{index}] is not a finite point")]
    NonFinitePoint { field: &'static str, index: usize },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("focal distance for hotspot {id} must be positive, got {value}")]
    InvalidFocalDistance { id: String, value: f32 },
}

/// Tuning knobs for the journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneySettings {
    /// Scroll smoothing approach rate in 1/s.
    pub scroll_smoothing_rate: f64,
    pub scroll_epsilon: f64,
    /// Seconds to fly from the path to a hotspot.
    pub branch_duration: f32,
    /// Seconds to fly back to the departure point.
    pub return_duration: f32,
    pub easing: Easing,
    /// Sideways bend of branch arcs relative to travel distance.
    pub arc_lateral_ratio: f32,
    /// Upward bend of branch arcs relative to travel distance.
    pub arc_lift_ratio: f32,
    /// Camera distance from a hotspot without an override.
    pub default_focal_distance: f32,
    pub min_height_above_target: f32,
    /// Pick sphere radius for hotspots that don't set their own.
    pub pick_radius: f32,
    pub fov_y_degrees: f32,
}

impl Default for JourneySettings {
    fn default() -> Self {
        Self {
            scroll_smoothing_rate: 6.0,
            scroll_epsilon: 1e-6,
            branch_duration: 1.6,
            return_duration: 1.6,
            easing: Easing::EaseInOutCubic,
            arc_lateral_ratio: 0.15,
            arc_lift_ratio: 0.1,
            default_focal_distance: 2.5,
            min_height_above_target: 0.5,
            pick_radius: 0.35,
            fov_y_degrees: 50.0,
        }
    }
}

impl JourneySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scroll_smoothing_rate", self.scroll_smoothing_rate),
            ("scroll_epsilon", self.scroll_epsilon),
            ("branch_duration", f64::from(self.branch_duration)),
            ("return_duration", f64::from(self.return_duration)),
            ("default_focal_distance", f64::from(self.default_focal_distance)),
            ("pick_radius", f64::from(self.pick_radius)),
            ("fov_y_degrees", f64::from(self.fov_y_degrees)),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let finite = [
            ("arc_lateral_ratio", self.arc_lateral_ratio),
            ("arc_lift_ratio", self.arc_lift_ratio),
            ("min_height_above_target", self.min_height_above_target),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

/// Waypoints, look targets and per-hotspot overrides of one scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    pub waypoints: Vec<[f32; 3]>,
    /// Parallel to `waypoints`; may be empty.
    pub look_targets: Vec<[f32; 3]>,
    /// Camera distance per hotspot id.
    pub focal_distances: HashMap<String, f32>,
    pub settings: JourneySettings,
}

impl JourneyConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, points) in [
            ("waypoints", &self.waypoints),
            ("look_targets", &self.look_targets),
        ] {
            if let Some(index) = points
                .iter()
                .position(|p| !p.iter().all(|c| c.is_finite()))
            {
                return Err(ConfigError::NonFinitePoint { field, index });
            }
        }

        for (id, &value) in &self.focal_distances {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidFocalDistance {
                    id: id.clone(),
                    value,
                });
            }
        }

        self.settings.validate()
    }

    pub fn waypoints(&self) -> Vec<Vec3> {
        self.waypoints.iter().copied().map(Vec3::from_array).collect()
    }

    pub fn look_targets(&self) -> Vec<Vec3> {
        self.look_targets
            .iter()
            .copied()
            .map(Vec3::from_array)
            .collect()
    }

    /// Builds the journey path seeded with the camera's starting position.
    pub fn build_path(&self, seed: Vec3) -> Option<JourneyPath> {
        JourneyPath::build(seed, &self.waypoints(), &self.look_targets())
    }

    /// Focal distance for a hotspot, falling back to the default.
    pub fn focal_distance(&self, hotspot_id: &str) -> f32 {
        self.focal_distances
            .get(hotspot_id)
            .copied()
            .unwrap_or(self.settings.default_focal_distance)
    }
}
