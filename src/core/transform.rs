//! World-space transform

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of an actor's visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a unit quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Canonical forward axis in local space
    pub const FORWARD: Vec3 = Vec3::Z;

    /// Create a new transform at the origin
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Forward direction (+Z rotated into world space)
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Self::FORWARD
    }

    /// Whether the transform is usable as a spawn pose: finite position and
    /// a unit-length rotation.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.rotation.is_normalized()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}
