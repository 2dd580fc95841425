//! ECS Components for the journey viewer.

use bevy::prelude::*;

use crate::highlight::HighlightColor;
use crate::picker::{CameraView, HotspotId};

/// The camera driven by the journey.
///
/// Pick rays follow the camera's perspective [`Projection`] when it has one.
/// `fov_y` and `aspect` apply to cameras without one (headless hosts).
#[derive(Component, Debug, Clone)]
pub struct JourneyCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
}

impl JourneyCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
        }
    }

    pub fn view(&self, transform: &Transform, projection: Option<&Projection>) -> CameraView {
        let (fov_y, aspect) = match projection {
            Some(Projection::Perspective(perspective)) => {
                (perspective.fov, perspective.aspect_ratio)
            }
            _ => (self.fov_y, self.aspect),
        };
        CameraView {
            position: transform.translation,
            rotation: transform.rotation,
            fov_y,
            aspect,
        }
    }
}

impl Default for JourneyCamera {
    fn default() -> Self {
        Self::new(50.0, 16.0 / 9.0)
    }
}

/// A clickable point of interest.
#[derive(Component, Debug, Clone)]
pub struct Hotspot {
    pub id: HotspotId,
    /// Pick sphere radius; the configured default when unset.
    pub pick_radius: Option<f32>,
}

impl Hotspot {
    pub fn new(id: impl Into<HotspotId>) -> Self {
        Self {
            id: id.into(),
            pick_radius: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.pick_radius = Some(radius);
        self
    }
}

/// Auxiliary marker that picks as its parent hotspot.
#[derive(Component, Debug, Clone)]
pub struct HotspotProxy {
    pub parent_id: HotspotId,
    pub pick_radius: Option<f32>,
}

impl HotspotProxy {
    pub fn new(parent_id: impl Into<HotspotId>) -> Self {
        Self {
            parent_id: parent_id.into(),
            pick_radius: None,
        }
    }
}

/// Material tint of a hotspot. The renderer copies `current` to the
/// material; hover writes only this component.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct HotspotTint {
    pub base: Color,
    pub current: Color,
}

impl HotspotTint {
    pub fn new(base: Color) -> Self {
        Self {
            base,
            current: base,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.current != self.base
    }
}

impl Default for HotspotTint {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

impl From<HighlightColor> for Color {
    fn from(color: HighlightColor) -> Self {
        Color::srgba_u8(color.r, color.g, color.b, color.a)
    }
}
