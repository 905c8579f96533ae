//! Character movement, animation and NPC behavior for 3D actors
//!
//! This crate provides:
//! - A generic finite state machine engine
//! - Animation track blending driven by humanoid and aquatic state sets
//! - Kinematic character movement on rapier3d
//! - Rule-based chase and attack behavior for NPCs
//! - An actor type composing all of the above with a fixed tick order

pub mod actor;
pub mod ai;
pub mod animation;
pub mod core;
pub mod fsm;
pub mod input;
pub mod physics;

// Re-exports for convenience
pub use glam;
pub use rapier3d;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::actor::{Actor, ActorDescriptor, ActorError, InputDriver, TickContext};
    pub use crate::ai::{NpcBehavior, NpcConfig, Target};
    pub use crate::animation::{ActorKind, AnimationClip, AnimationName, AnimationStateSet};
    pub use crate::core::{ActorEvent, ActorId, EventQueue, SimClock, SimulationConfig, Transform};
    pub use crate::input::{InputContract, KeyboardInput};
    pub use crate::physics::{ColliderHandle, PhysicsBackend, PhysicsWorld, RigidBodyHandle};
    pub use glam::{Quat, Vec3};
    pub use winit::keyboard::KeyCode;
}
