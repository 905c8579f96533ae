//! Animation state set
//!
//! Binds one state vocabulary to the generic state machine and the track
//! table of one actor.

use serde::{Deserialize, Serialize};

use crate::fsm::StateMachine;
use crate::input::InputContract;

use super::animator::{AnimationConfig, AnimationError, Animator};
use super::aquatic::{AQUATIC_ANIMATIONS, register_aquatic};
use super::clip::{AnimationClip, AnimationName};
use super::states::{HUMANOID_ANIMATIONS, register_humanoid};
use super::track::AnimationTrack;

/// Which state vocabulary an actor animates with; fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActorKind {
    /// Walks, runs, jumps and fights on land
    #[default]
    Humanoid,
    /// Swims and bites
    Aquatic,
}

impl ActorKind {
    /// Clip names this kind cannot be built without
    #[must_use]
    pub fn required_animations(self) -> &'static [AnimationName] {
        match self {
            Self::Humanoid => &HUMANOID_ANIMATIONS,
            Self::Aquatic => &AQUATIC_ANIMATIONS,
        }
    }

    /// State entered at creation and after most one-shots
    #[must_use]
    pub const fn rest_state(self) -> AnimationName {
        match self {
            Self::Humanoid => AnimationName::Idle,
            Self::Aquatic => AnimationName::Swim,
        }
    }

    fn register_states(self, machine: &mut StateMachine<AnimationName, Animator>) {
        match self {
            Self::Humanoid => register_humanoid(machine),
            Self::Aquatic => register_aquatic(machine),
        }
    }
}

/// State machine + track table for one actor
#[derive(Debug)]
pub struct AnimationStateSet {
    kind: ActorKind,
    machine: StateMachine<AnimationName, Animator>,
    animator: Animator,
}

impl AnimationStateSet {
    /// Build the track table for `kind` and enter its rest state.
    pub fn new(
        kind: ActorKind,
        clips: &[AnimationClip],
        config: AnimationConfig,
    ) -> Result<Self, AnimationError> {
        let mut animator = Animator::from_clips(clips, kind.required_animations(), config)?;

        let mut machine = StateMachine::new();
        kind.register_states(&mut machine);
        machine.set_state(kind.rest_state(), &mut animator);

        Ok(Self {
            kind,
            machine,
            animator,
        })
    }

    /// Advance tracks, then let the active state react to `input`.
    ///
    /// One-shot completion is detected here, after the tracks moved, so a
    /// successor takes over in the same tick its predecessor finished.
    pub fn update(&mut self, dt: f32, input: &InputContract) {
        self.animator.update(dt);
        self.machine.update(dt, input, &mut self.animator);
    }

    /// Request a state change from outside (hit reactions, death, emotes).
    ///
    /// Returns `false` when `name` is already active.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not part of this actor's vocabulary.
    pub fn set_state(&mut self, name: AnimationName) -> bool {
        self.machine.set_state(name, &mut self.animator)
    }

    /// Whether `name` belongs to this actor's vocabulary
    #[must_use]
    pub fn supports(&self, name: AnimationName) -> bool {
        self.machine.is_registered(name)
    }

    /// Active state
    #[must_use]
    pub fn current(&self) -> AnimationName {
        self.machine
            .current_state_name()
            .unwrap_or(self.kind.rest_state())
    }

    /// Vocabulary this set was built with
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Whether a crossfade is still blending
    #[must_use]
    pub fn is_crossfading(&self) -> bool {
        self.animator.is_crossfading()
    }

    /// Track for an animation
    #[must_use]
    pub fn track(&self, name: AnimationName) -> Option<&AnimationTrack> {
        self.animator.track(name)
    }

    /// Underlying track table
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

// ============================================================================
// Tests
// ============================================================================
