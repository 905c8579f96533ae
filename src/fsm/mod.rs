//! Generic finite state machine
//!
//! Used by the animation state sets; independent of any particular state
//! vocabulary.

mod machine;

pub use machine::{State, StateMachine, Transition};
