//! Track table and crossfade blending
//!
//! The animator owns one [`AnimationTrack`] per clip an actor was built with
//! and implements the two ways a state starts its track: looping with a
//! crossfade (optionally carrying stride phase across a locomotion family)
//! and once-only with a clamp on the final frame.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::clip::{AnimationClip, AnimationName};
use super::track::{AnimationTrack, LoopMode, PlaybackState};

/// Errors raised while building a track table from loaded clips
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    /// A clip carries a name outside the closed animation set
    #[error("clip `{0}` is not a known animation name")]
    UnknownAnimation(String),
    /// The chosen state set needs a clip that was not provided
    #[error("missing clip for required animation {0}")]
    MissingAnimation(AnimationName),
    /// Clip duration is zero, negative or not finite
    #[error("clip {name} has invalid duration {duration}")]
    InvalidDuration { name: AnimationName, duration: f32 },
}

/// Blend tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Crossfade duration between states, in seconds
    pub crossfade_duration: f32,
    /// Playback speed of attack-style one-shots
    pub attack_playback_speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            crossfade_duration: 0.5,
            attack_playback_speed: 1.5,
        }
    }
}

/// Track table plus blending operations for one actor
#[derive(Debug, Clone)]
pub struct Animator {
    tracks: FxHashMap<AnimationName, AnimationTrack>,
    config: AnimationConfig,
}

impl Animator {
    /// Build the track table from loaded clips.
    ///
    /// Every name in `required` must be covered by a clip.
    pub fn from_clips(
        clips: &[AnimationClip],
        required: &[AnimationName],
        config: AnimationConfig,
    ) -> Result<Self, AnimationError> {
        let mut tracks = FxHashMap::default();

        for clip in clips {
            let name: AnimationName = clip
                .name
                .parse()
                .map_err(|_| AnimationError::UnknownAnimation(clip.name.clone()))?;

            if !clip.duration.is_finite() || clip.duration <= 0.0 {
                return Err(AnimationError::InvalidDuration {
                    name,
                    duration: clip.duration,
                });
            }

            if tracks
                .insert(name, AnimationTrack::new(name, clip.duration))
                .is_some()
            {
                log::warn!("duplicate clip {name}, keeping the last one");
            }
        }

        if let Some(missing) = required.iter().find(|name| !tracks.contains_key(*name)) {
            return Err(AnimationError::MissingAnimation(*missing));
        }

        Ok(Self { tracks, config })
    }

    /// Blend tunables this animator was built with
    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Track for an animation, if a clip was provided
    #[must_use]
    pub fn track(&self, name: AnimationName) -> Option<&AnimationTrack> {
        self.tracks.get(&name)
    }

    /// Start a looping track, crossfading from `previous`.
    ///
    /// Within a locomotion family the new track's time is seeded from the
    /// previous track's time scaled by the ratio of clip durations.
    pub fn play_looping(&mut self, name: AnimationName, previous: Option<AnimationName>) {
        let seeded_time = previous
            .filter(|prev| name.shares_family_with(*prev))
            .and_then(|prev| self.tracks.get(&prev))
            .zip(self.tracks.get(&name))
            .map(|(prev, next)| prev.time() * (next.duration() / prev.duration()));

        self.start(name, previous, LoopMode::Repeat, 1.0, seeded_time);
    }

    /// Start a once-only track at `speed`, crossfading from `previous`.
    pub fn play_once(&mut self, name: AnimationName, previous: Option<AnimationName>, speed: f32) {
        self.start(name, previous, LoopMode::Once, speed, None);
    }

    fn start(
        &mut self,
        name: AnimationName,
        previous: Option<AnimationName>,
        loop_mode: LoopMode,
        speed: f32,
        seeded_time: Option<f32>,
    ) {
        let fade = self.config.crossfade_duration;

        // Only the outgoing and incoming tracks take part in the new blend
        for (other, track) in &mut self.tracks {
            if *other != name && Some(*other) != previous && track.state() != PlaybackState::Stopped
            {
                track.stop();
            }
        }

        let mut blending_from = false;
        if let Some(outgoing) = previous
            .filter(|prev| *prev != name)
            .and_then(|prev| self.tracks.get_mut(&prev))
            && outgoing.state() != PlaybackState::Stopped
        {
            outgoing.fade_to(0.0, fade);
            blending_from = true;
        }

        let Some(track) = self.tracks.get_mut(&name) else {
            log::warn!("no track for {name}, nothing to play");
            return;
        };

        track.reset();
        track.set_loop_mode(loop_mode);
        track.set_speed(speed);
        if let Some(time) = seeded_time {
            track.set_time(time);
        }
        track.play();

        if blending_from {
            track.fade_to(1.0, fade);
        } else {
            track.set_weight(1.0);
        }
    }

    /// Advance every active track (call once per tick)
    pub fn update(&mut self, delta_time: f32) {
        for track in self.tracks.values_mut() {
            track.update(delta_time);
        }
    }

    /// Whether any weight fade is still in flight
    #[must_use]
    pub fn is_crossfading(&self) -> bool {
        self.tracks.values().any(AnimationTrack::is_fading)
    }

    /// Tracks currently contributing to the pose, with their weights
    pub fn weights(&self) -> impl Iterator<Item = (AnimationName, f32)> + '_ {
        self.tracks
            .values()
            .filter(|track| track.weight() > 0.0)
            .map(|track| (track.name(), track.weight()))
    }
}
