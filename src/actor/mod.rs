//! Actors
//!
//! Composition of animation, kinematic movement and optional NPC behavior
//! behind one update call.

mod controller;
mod descriptor;

pub use controller::{Actor, TickContext};
pub use descriptor::{ActorDescriptor, ActorError, InputDriver};
