//! Camera pose shared by the path, the branch animator and the journey.

use bevy::math::{Quat, Vec3};
use bevy::transform::components::Transform;

/// A camera position together with the point it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Orientation facing `look_at` with +Y up.
    ///
    /// When the look target coincides with the position the camera keeps
    /// facing -Z.
    pub fn rotation(&self) -> Quat {
        Transform::from_translation(self.position)
            .looking_at(self.look_at, Vec3::Y)
            .rotation
    }

    /// Writes this pose into an existing transform, keeping its scale.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.translation = self.position;
        transform.rotation = self.rotation();
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}
