//! NPC decision making
//!
//! Rule-based chase and attack behavior that produces the same input
//! contract a human player does.

mod npc;

pub use npc::{NpcBehavior, NpcConfig, Target};
