//! Animation track playback
//!
//! One track per animation name: play time, speed, loop mode and blend
//! weight, plus an optional in-flight weight fade.

use super::clip::AnimationName;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Time advances each update
    Playing,
    /// A once-only track reached its last frame and is held there
    Finished,
    /// Not contributing to the pose
    #[default]
    Stopped,
}

/// What happens when play time reaches the clip duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Wrap back to the start
    #[default]
    Repeat,
    /// Play once and clamp on the last frame
    Once,
}

/// Linear weight ramp
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Fade {
    fn weight(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playable instance of one clip
#[derive(Debug, Clone)]
pub struct AnimationTrack {
    name: AnimationName,
    /// Clip duration in seconds
    duration: f32,
    /// Current playback time in seconds
    time: f32,
    /// Playback speed multiplier
    speed: f32,
    loop_mode: LoopMode,
    state: PlaybackState,
    /// Blend weight (0.0 to 1.0)
    weight: f32,
    fade: Option<Fade>,
}

impl AnimationTrack {
    /// Create a stopped track for a clip of the given duration
    #[must_use]
    pub fn new(name: AnimationName, duration: f32) -> Self {
        Self {
            name,
            duration,
            time: 0.0,
            speed: 1.0,
            loop_mode: LoopMode::Repeat,
            state: PlaybackState::Stopped,
            weight: 0.0,
            fade: None,
        }
    }

    /// Rewind to the start at normal speed
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.speed = 1.0;
        if self.state == PlaybackState::Finished {
            self.state = PlaybackState::Playing;
        }
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Stop playback, drop the weight and rewind
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
        self.weight = 0.0;
        self.fade = None;
    }

    /// Seek to a specific time, clamped to the clip
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.duration);
    }

    /// Set playback speed multiplier
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Set loop behavior
    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    /// Set blend weight immediately, cancelling any fade
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
        self.fade = None;
    }

    /// Ramp the weight from its current value to `target` over `duration`.
    ///
    /// A non-positive duration applies the target immediately.
    pub fn fade_to(&mut self, target: f32, duration: f32) {
        let target = target.clamp(0.0, 1.0);
        if duration <= 0.0 {
            self.set_weight(target);
            if target == 0.0 {
                self.stop();
            }
            return;
        }
        self.fade = Some(Fade {
            from: self.weight,
            to: target,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advance play time and weight fade (call each tick)
    pub fn update(&mut self, delta_time: f32) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        if self.state == PlaybackState::Playing {
            self.advance_time(delta_time);
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += delta_time;
            if fade.is_done() {
                let target = fade.to;
                self.fade = None;
                self.weight = target;
                if target == 0.0 {
                    self.stop();
                }
            } else {
                self.weight = fade.weight();
            }
        }
    }

    fn advance_time(&mut self, delta_time: f32) {
        if self.duration <= 0.0 {
            self.time = 0.0;
            if self.loop_mode == LoopMode::Once {
                self.state = PlaybackState::Finished;
            }
            return;
        }

        self.time += delta_time * self.speed;

        if self.time >= self.duration {
            match self.loop_mode {
                LoopMode::Repeat => self.time %= self.duration,
                LoopMode::Once => {
                    self.time = self.duration;
                    self.state = PlaybackState::Finished;
                }
            }
        }
    }

    /// Animation this track plays
    #[must_use]
    pub const fn name(&self) -> AnimationName {
        self.name
    }

    /// Clip duration in seconds
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Current playback time in seconds
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Playback speed multiplier
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Loop behavior
    #[must_use]
    pub const fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Playback state
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current blend weight
    #[must_use]
    pub const fn weight(&self) -> f32 {
        self.weight
    }

    /// Check if currently advancing
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a weight fade is in flight
    #[must_use]
    pub const fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Target weight of the in-flight fade, or the current weight
    #[must_use]
    pub fn target_weight(&self) -> f32 {
        self.fade.map_or(self.weight, |fade| fade.to)
    }

    /// Normalized playback time (0.0 to 1.0).
    ///
    /// Zero-length clips report 1.0 once finished so completion polling
    /// still fires.
    #[must_use]
    pub fn normalized_time(&self) -> f32 {
        if self.duration > 0.0 {
            self.time / self.duration
        } else if self.state == PlaybackState::Finished {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_playback_wraps() {
        let mut track = AnimationTrack::new(AnimationName::Walk, 1.0);
        track.play();

        track.update(0.5);
        assert!((track.time() - 0.5).abs() < 1e-5);

        track.update(0.8);
        assert!((track.time() - 0.3).abs() < 1e-5);
        assert!(track.is_playing());
    }

    #[test]
    fn test_once_clamps_on_last_frame() {
        let mut track = AnimationTrack::new(AnimationName::Attack, 1.0);
        track.set_loop_mode(LoopMode::Once);
        track.play();

        track.update(0.6);
        track.update(0.6);

        assert_eq!(track.state(), PlaybackState::Finished);
        assert_eq!(track.time(), 1.0);
        assert_eq!(track.normalized_time(), 1.0);

        // Held on the last frame
        track.update(0.6);
        assert_eq!(track.time(), 1.0);
    }

    #[test]
    fn test_speed_multiplier() {
        let mut track = AnimationTrack::new(AnimationName::Attack, 3.0);
        track.set_speed(1.5);
        track.play();
        track.update(1.0);
        assert!((track.time() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_fade_in_and_out() {
        let mut track = AnimationTrack::new(AnimationName::Idle, 2.0);
        track.play();
        track.fade_to(1.0, 0.5);

        track.update(0.25);
        assert!((track.weight() - 0.5).abs() < 1e-5);
        assert!(track.is_fading());

        track.update(0.25);
        assert!((track.weight() - 1.0).abs() < 1e-5);
        assert!(!track.is_fading());

        track.fade_to(0.0, 0.5);
        track.update(0.5);
        assert_eq!(track.state(), PlaybackState::Stopped);
        assert_eq!(track.weight(), 0.0);
    }

    #[test]
    fn test_stopped_track_does_not_advance() {
        let mut track = AnimationTrack::new(AnimationName::Run, 1.0);
        track.update(0.5);
        assert_eq!(track.time(), 0.0);
    }

    #[test]
    fn test_set_time_clamps() {
        let mut track = AnimationTrack::new(AnimationName::Run, 0.8);
        track.set_time(2.0);
        assert_eq!(track.time(), 0.8);
        track.set_time(-1.0);
        assert_eq!(track.time(), 0.0);
    }
}
