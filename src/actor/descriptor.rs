//! What an actor is made of, and what can go wrong building one

use serde::{Deserialize, Serialize};

use crate::ai::NpcConfig;
use crate::animation::{ActorKind, AnimationClip, AnimationError, AnimationName};
use crate::core::{ActorId, Transform};

/// Errors returned by [`Actor::spawn`](super::Actor::spawn)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActorError {
    /// The clip set lacks a name the actor's vocabulary needs
    #[error("missing clip for required animation {0}")]
    MissingAnimation(AnimationName),
    /// A clip name is outside the closed animation set
    #[error("clip `{0}` is not a known animation name")]
    UnknownAnimation(String),
    /// A clip cannot be played
    #[error("clip {name} has invalid duration {duration}")]
    InvalidClip { name: AnimationName, duration: f32 },
    /// Physics attachment was requested with a non-finite or skewed transform
    #[error("spawn transform is not finalized: {0:?}")]
    TransformNotFinalized(Transform),
    /// A state outside this actor's vocabulary was requested
    #[error("{kind:?} actors have no {state} state")]
    UnsupportedState { kind: ActorKind, state: AnimationName },
    /// Death is terminal; the game layer removes or respawns the actor
    #[error("{actor} is dead and cannot enter {requested}")]
    Dead {
        actor: ActorId,
        requested: AnimationName,
    },
}

impl From<AnimationError> for ActorError {
    fn from(err: AnimationError) -> Self {
        match err {
            AnimationError::MissingAnimation(name) => Self::MissingAnimation(name),
            AnimationError::UnknownAnimation(name) => Self::UnknownAnimation(name),
            AnimationError::InvalidDuration { name, duration } => {
                Self::InvalidClip { name, duration }
            }
        }
    }
}

/// Where an actor's input contract comes from each tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum InputDriver {
    /// Set from outside with `Actor::set_input` (keyboard, scripts)
    #[default]
    Manual,
    /// Synthesized by the chase/attack behavior
    Npc(NpcConfig),
}

/// Everything needed to spawn an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDescriptor {
    pub kind: ActorKind,
    /// Spawn pose of the body (collider center)
    pub transform: Transform,
    pub clips: Vec<AnimationClip>,
    #[serde(default)]
    pub driver: InputDriver,
}

impl ActorDescriptor {
    #[must_use]
    pub fn humanoid(transform: Transform, clips: Vec<AnimationClip>) -> Self {
        Self {
            kind: ActorKind::Humanoid,
            transform,
            clips,
            driver: InputDriver::Manual,
        }
    }

    #[must_use]
    pub fn aquatic(transform: Transform, clips: Vec<AnimationClip>) -> Self {
        Self {
            kind: ActorKind::Aquatic,
            transform,
            clips,
            driver: InputDriver::Manual,
        }
    }

    /// Drive this actor with the NPC behavior
    #[must_use]
    pub fn with_npc(mut self, config: NpcConfig) -> Self {
        self.driver = InputDriver::Npc(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_errors_map_one_to_one() {
        assert_eq!(
            ActorError::from(AnimationError::MissingAnimation(AnimationName::Run)),
            ActorError::MissingAnimation(AnimationName::Run)
        );
        assert_eq!(
            ActorError::from(AnimationError::UnknownAnimation("Dance".into())),
            ActorError::UnknownAnimation("Dance".into())
        );
    }

    #[test]
    fn test_descriptor_from_ron() {
        let text = r#"(
            kind: Aquatic,
            transform: (position: (1.0, -4.0, 2.0), rotation: (0.0, 0.0, 0.0, 1.0), scale: (1.0, 1.0, 1.0)),
            clips: [(name: "Swim", duration: 2.0), (name: "Swim_Fast", duration: 1.0), (name: "Bite", duration: 0.8)],
            driver: Npc((detection_range: 40.0, attack_range: 6.0, attack_cooldown: 3.0)),
        )"#;
        let descriptor: ActorDescriptor = ron::from_str(text).unwrap();

        assert_eq!(descriptor.kind, ActorKind::Aquatic);
        assert_eq!(descriptor.clips.len(), 3);
        let InputDriver::Npc(npc) = descriptor.driver else {
            panic!("expected an NPC driver");
        };
        assert_eq!(npc.attack_range, 6.0);
        assert_eq!(npc.rotation_deadzone, 0.6);
    }
}
