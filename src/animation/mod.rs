//! Animation system
//!
//! Track table with crossfade blending and the humanoid and aquatic state
//! vocabularies that drive it.

mod animator;
mod aquatic;
mod clip;
mod state_set;
mod states;
mod track;

pub use animator::{AnimationConfig, AnimationError, Animator};
pub use aquatic::AQUATIC_ANIMATIONS;
pub use clip::{AnimationClip, AnimationName, UnknownAnimationName};
pub use state_set::{ActorKind, AnimationStateSet};
pub use states::{HUMANOID_ANIMATIONS, OneShotState};
pub use track::{AnimationTrack, LoopMode, PlaybackState};
