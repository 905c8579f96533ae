//! Physics capability injected into actors
//!
//! The kinematic controller never touches rapier directly. It talks to a
//! [`PhysicsBackend`], which the game provides (normally
//! [`PhysicsWorld`](super::PhysicsWorld)) and which unit tests replace with a
//! scripted fake.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

impl RigidBodyHandle {
    /// Build a handle from its raw index and generation
    #[must_use]
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self(rapier3d::dynamics::RigidBodyHandle::from_raw_parts(
            index, generation,
        ))
    }
}

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

impl ColliderHandle {
    /// Build a handle from its raw index and generation
    #[must_use]
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self(rapier3d::geometry::ColliderHandle::from_raw_parts(
            index, generation,
        ))
    }
}

/// Capsule collider attached to every actor body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Length of the cylindrical section (twice the half height)
    pub height: f32,
    pub radius: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl CapsuleConfig {
    /// Half length of the cylindrical section
    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Distance from the capsule center to its lowest point
    #[must_use]
    pub fn center_to_bottom(&self) -> f32 {
        self.half_height() + self.radius
    }
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            height: 1.0,
            radius: 0.4,
            friction: 1.5,
            restitution: 0.0,
        }
    }
}

/// Kinematic sweep tuning, applied once when an actor is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Steepest slope the actor can walk up, in degrees
    pub max_slope_climb_angle: f32,
    /// Slopes steeper than this make the actor slide, in degrees
    pub min_slope_slide_angle: f32,
    /// Obstacles lower than this are stepped over (None disables autostep)
    pub autostep_max_height: Option<f32>,
    /// Free space needed on top of a step
    pub autostep_min_width: f32,
    /// Maximum distance the actor is pulled down onto ground (None disables)
    pub snap_to_ground: Option<f32>,
    /// Gap kept between the collider and obstacles
    pub offset: f32,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            max_slope_climb_angle: 45.0,
            min_slope_slide_angle: 30.0,
            autostep_max_height: Some(0.5),
            autostep_min_width: 0.2,
            snap_to_ground: Some(0.5),
            offset: 0.01,
        }
    }
}

/// Corrected movement returned by a kinematic sweep
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepResult {
    /// Displacement the actor may actually apply
    pub translation: Vec3,
    /// Whether the actor ended the sweep standing on something
    pub grounded: bool,
}

/// Operations the kinematic controller needs from a physics world.
///
/// Positions are body (collider center) positions in world space.
pub trait PhysicsBackend {
    /// Create a kinematic, position-driven body
    fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle;

    /// Attach a capsule collider to `body`
    fn create_capsule_collider(
        &mut self,
        body: RigidBodyHandle,
        capsule: &CapsuleConfig,
    ) -> ColliderHandle;

    /// Store the sweep settings used for every later `sweep_move` of `collider`
    fn configure_sweep(&mut self, collider: ColliderHandle, settings: &SweepSettings);

    /// Resolve `desired` against world geometry for a collider at `position`
    fn sweep_move(
        &mut self,
        collider: ColliderHandle,
        position: Vec3,
        desired: Vec3,
        dt: f32,
    ) -> SweepResult;

    /// Sensor colliders overlapping `collider` when placed at `position`
    fn query_sensor_overlaps(&self, collider: ColliderHandle, position: Vec3)
    -> Vec<ColliderHandle>;

    /// Pose the body will reach on the next world step
    fn set_kinematic_pose(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat);

    /// Move the body immediately, without sweeping
    fn teleport(&mut self, body: RigidBodyHandle, position: Vec3, rotation: Quat);
}
