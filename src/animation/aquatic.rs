//! Aquatic animation states
//!
//! Same engine, separate vocabulary: Swim stands in for Idle and Walk,
//! SwimFast for Run and Bite for Attack.

use crate::fsm::{State, StateMachine, Transition};
use crate::input::InputContract;

use super::animator::Animator;
use super::clip::AnimationName;
use super::states::OneShotState;

/// Names every aquatic actor must have clips for.
pub const AQUATIC_ANIMATIONS: [AnimationName; 3] = [
    AnimationName::Swim,
    AnimationName::SwimFast,
    AnimationName::Bite,
];

/// Register the aquatic vocabulary on a machine.
pub fn register_aquatic(machine: &mut StateMachine<AnimationName, Animator>) {
    machine.register(AnimationName::Swim, || Box::new(SwimState));
    machine.register(AnimationName::SwimFast, || Box::new(SwimFastState));
    machine.register(AnimationName::Bite, || {
        Box::new(OneShotState::attack(AnimationName::Bite, AnimationName::Swim))
    });
}

#[derive(Debug)]
pub struct SwimState;

impl State<AnimationName, Animator> for SwimState {
    fn name(&self) -> AnimationName {
        AnimationName::Swim
    }

    fn enter(&mut self, previous: Option<AnimationName>, ctx: &mut Animator) {
        ctx.play_looping(AnimationName::Swim, previous);
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &InputContract,
        _ctx: &mut Animator,
    ) -> Transition<AnimationName> {
        if input.attack {
            Transition::To(AnimationName::Bite)
        } else if input.is_directional() && input.run {
            Transition::To(AnimationName::SwimFast)
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
pub struct SwimFastState;

impl State<AnimationName, Animator> for SwimFastState {
    fn name(&self) -> AnimationName {
        AnimationName::SwimFast
    }

    fn enter(&mut self, previous: Option<AnimationName>, ctx: &mut Animator) {
        ctx.play_looping(AnimationName::SwimFast, previous);
    }

    fn update(
        &mut self,
        _dt: f32,
        input: &InputContract,
        _ctx: &mut Animator,
    ) -> Transition<AnimationName> {
        if input.attack {
            Transition::To(AnimationName::Bite)
        } else if !input.is_directional() || !input.run {
            Transition::To(AnimationName::Swim)
        } else {
            Transition::None
        }
    }
}
