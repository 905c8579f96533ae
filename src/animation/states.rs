//! Humanoid animation states
//!
//! Looping locomotion states react to the input contract every tick; the
//! once-only states poll their track and hand over to a fixed successor when
//! it reaches its last frame.

use crate::fsm::{State, StateMachine, Transition};
use crate::input::InputContract;

use super::animator::Animator;
use super::clip::AnimationName;

/// Names every humanoid actor must have clips for.
pub const HUMANOID_ANIMATIONS: [AnimationName; 14] = [
    AnimationName::Idle,
    AnimationName::Walk,
    AnimationName::Run,
    AnimationName::Jump,
    AnimationName::JumpIdle,
    AnimationName::JumpLand,
    AnimationName::Death,
    AnimationName::HitReact,
    AnimationName::Attack,
    AnimationName::Punch,
    AnimationName::Duck,
    AnimationName::Wave,
    AnimationName::Yes,
    AnimationName::No,
];

/// Register the humanoid vocabulary on a machine.
pub fn register_humanoid(machine: &mut StateMachine<AnimationName, Animator>) {
    use AnimationName::*;

    machine.register(Idle, || Box::new(IdleState));
    machine.register(Walk, || Box::new(WalkState));
    machine.register(Run, || Box::new(RunState));

    machine.register(Attack, || Box::new(OneShotState::attack(Attack, Idle)));
    machine.register(Punch, || Box::new(OneShotState::new(Punch, Some(Idle))));
    machine.register(HitReact, || Box::new(OneShotState::new(HitReact, Some(Idle))));
    machine.register(Death, || Box::new(OneShotState::new(Death, None)));

    machine.register(Jump, || Box::new(OneShotState::new(Jump, Some(JumpIdle))));
    machine.register(JumpIdle, || Box::new(OneShotState::new(JumpIdle, Some(JumpLand))));
    machine.register(JumpLand, || Box::new(OneShotState::new(JumpLand, Some(Idle))));

    for emote in [Duck, Wave, Yes, No] {
        machine.register(emote, move || Box::new(OneShotState::new(emote, Some(Idle))));
    }
}

// ============================================================================
// One-shot
// ============================================================================

/// Plays its track once, clamps, then moves to `successor`.
///
/// With no successor the state is terminal: it stays on its last frame.
#[derive(Debug)]
pub struct OneShotState {
    name: AnimationName,
    successor: Option<AnimationName>,
    /// Plays at the configured attack speed instead of 1.0
    attack_style: bool,
    completed: bool,
}

impl OneShotState {
    /// One-shot at normal speed
    #[must_use]
    pub fn new(name: AnimationName, successor: Option<AnimationName>) -> Self {
        Self {
            name,
            successor,
            attack_style: false,
            completed: false,
        }
    }

    /// One-shot at the configured attack playback speed
    #[must_use]
    pub fn attack(name: AnimationName, successor: AnimationName) -> Self {
        Self {
            attack_style: true,
            ..Self::new(name, Some(successor))
        }
    }
}

impl State<AnimationName, Animator> for OneShotState {
    fn name(&self) -> AnimationName {
        self.name
    }

    fn enter(&mut self, previous: Option<AnimationName>, ctx: &mut Animator) {
        let speed = if self.attack_style {
            ctx.config().attack_playback_speed
        } else {
            1.0
        };
        ctx.play_once(self.name, previous, speed);
    }

    fn update(
        &mut self,
        _dt: f32,
        _input: &InputContract,
        ctx: &mut Animator,
    ) -> Transition<AnimationName> {
        if self.completed {
            return Transition::None;
        }

        let finished = ctx
            .track(self.name)
            .is_some_and(|track| track.normalized_time() >= 1.0);
        if !finished {
            return Transition::None;
        }

        self.completed = true;
        match self.successor {
            Some(next) => Transition::To(next),
            None => {
                log::debug!("{} finished, holding last frame", self.name);
                Transition::None
            }
        }
    }
}

// ============================================================================
// Locomotion
// ============================================================================

#[derive(Debug)]
pub struct IdleState;

impl State<AnimationName, Animator> for IdleState {
    fn name(&self) -> AnimationName {
        AnimationName::Idle
    }

    fn enter(&mut self, previous: Option<AnimationName>, ctx: &mut Animator) {
        ctx.play_looping(AnimationName::Idle, previous);
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &InputContract,
        _ctx: &mut Animator,
    ) -> Transition<AnimationName> {
        if input.attack {
            Transition::To(AnimationName::Attack)
        } else if input.jump {
            Transition::To(AnimationName::Jump)
        } else if input.is_directional() {
            Transition::To(AnimationName::Walk)
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
pub struct WalkState;

impl State<AnimationName, Animator> for WalkState {
    fn name(&self) -> AnimationName {
        AnimationName::Walk
    }

    fn enter(&mut self, previous: Option<AnimationName>, ctx: &mut Animator) {
        ctx.play_looping(AnimationName::Walk, previous);
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &InputContract,
        _ctx: &mut Animator,
    ) -> Transition<AnimationName> {
        if input.attack {
            Transition::To(AnimationName::Attack)
        } else if !input.is_directional() {
            Transition::To(AnimationName::Idle)
        } else if input.run {
            Transition::To(AnimationName::Run)
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
pub struct RunState;

impl State<AnimationName, Animator> for RunState {
    fn name(&self) -> AnimationName {
        AnimationName::Run
    }

    fn enter(&mut self, previous: Option<AnimationName>, ctx: &mut Animator) {
        ctx.play_looping(AnimationName::Run, previous);
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &InputContract,
        _ctx: &mut Animator,
    ) -> Transition<AnimationName> {
        if input.attack {
            Transition::To(AnimationName::Attack)
        } else if !input.is_directional() {
            Transition::To(AnimationName::Idle)
        } else if !input.run {
            Transition::To(AnimationName::Walk)
        } else {
            Transition::None
        }
    }
}
