//! Core types shared by every subsystem
//!
//! Transforms, the simulation clock, the actor event queue and the
//! configuration loader.

mod config;
mod events;
mod time;
mod transform;

pub use config::{ConfigError, SimulationConfig};
pub use events::{ActorEvent, ActorId, EventQueue};
pub use time::SimClock;
pub use transform::Transform;
