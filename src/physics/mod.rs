//! Physics module
//!
//! Kinematic actor movement on top of rapier3d, behind the
//! [`PhysicsBackend`] capability.

mod backend;
mod controller;
#[cfg(test)]
pub(crate) mod testing;
mod world;

pub use backend::{
    CapsuleConfig, ColliderHandle, PhysicsBackend, RigidBodyHandle, SweepResult, SweepSettings,
};
pub use controller::{KinematicController, MovementConfig};
pub use world::{PhysicsWorld, RaycastHit};
