//! Animation names and clips
//!
//! The set of animation names is closed: every clip handed to an actor must
//! carry one of the canonical names below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every animation an actor can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationName {
    Idle,
    Walk,
    Run,
    Jump,
    JumpIdle,
    JumpLand,
    Death,
    HitReact,
    Attack,
    Punch,
    Duck,
    Wave,
    Yes,
    No,
    Swim,
    SwimFast,
    Bite,
}

impl AnimationName {
    /// All names, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Idle,
        Self::Walk,
        Self::Run,
        Self::Jump,
        Self::JumpIdle,
        Self::JumpLand,
        Self::Death,
        Self::HitReact,
        Self::Attack,
        Self::Punch,
        Self::Duck,
        Self::Wave,
        Self::Yes,
        Self::No,
        Self::Swim,
        Self::SwimFast,
        Self::Bite,
    ];

    /// Clip name as authored in the asset files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::JumpIdle => "Jump_Idle",
            Self::JumpLand => "Jump_Land",
            Self::Death => "Death",
            Self::HitReact => "HitReact",
            Self::Attack => "Attack",
            Self::Punch => "Punch",
            Self::Duck => "Duck",
            Self::Wave => "Wave",
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Swim => "Swim",
            Self::SwimFast => "Swim_Fast",
            Self::Bite => "Bite",
        }
    }

    /// Locomotion family used to carry stride phase across transitions.
    ///
    /// Walk/Run and Swim/SwimFast share a family; everything else has none.
    #[must_use]
    pub const fn locomotion_family(self) -> Option<u8> {
        match self {
            Self::Walk | Self::Run => Some(0),
            Self::Swim | Self::SwimFast => Some(1),
            _ => None,
        }
    }

    /// Whether `self` and `other` are distinct members of one locomotion family.
    #[must_use]
    pub fn shares_family_with(self, other: Self) -> bool {
        match (self.locomotion_family(), other.locomotion_family()) {
            (Some(a), Some(b)) => a == b && self != other,
            _ => false,
        }
    }

    /// States during which the actor does not act on movement input.
    #[must_use]
    pub const fn suppresses_movement(self) -> bool {
        matches!(self, Self::Death | Self::HitReact)
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a clip name is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown animation name `{0}`")]
pub struct UnknownAnimationName(pub String);

impl FromStr for AnimationName {
    type Err = UnknownAnimationName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownAnimationName(s.to_string()))
    }
}

/// A loaded animation clip as delivered by the asset layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Clip name (must parse as an [`AnimationName`])
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
}

impl AnimationClip {
    /// Create a clip description
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}
