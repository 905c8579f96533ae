//! Input module
//!
//! Provides the per-tick input contract and a keyboard adapter that fills it.

mod contract;
mod keyboard;

pub use contract::InputContract;
pub use keyboard::{Intent, KeyBindings, KeyboardInput};
