//! Actor composition root
//!
//! An actor owns one animation state set, one kinematic controller and an
//! optional NPC behavior, and runs them in a fixed order every tick:
//! behavior → animation → physics → transform sync.

use glam::{Quat, Vec3};

use crate::ai::{NpcBehavior, Target};
use crate::animation::{ActorKind, AnimationName, AnimationStateSet};
use crate::core::{ActorEvent, ActorId, EventQueue, SimulationConfig, Transform};
use crate::input::InputContract;
use crate::physics::{ColliderHandle, KinematicController, PhysicsBackend, RigidBodyHandle};

use super::descriptor::{ActorDescriptor, ActorError, InputDriver};

/// Per-tick context shared by every actor update
#[derive(Debug)]
pub struct TickContext<'a> {
    /// Simulation time at this tick
    pub now: f32,
    /// Actor NPCs hunt this tick, if any
    pub target: Option<Target>,
    pub events: &'a mut EventQueue,
}

#[derive(Debug)]
enum Driver {
    Manual,
    Npc(NpcBehavior),
}

/// A humanoid or aquatic actor in the world
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    driver: Driver,
    animation: AnimationStateSet,
    movement: KinematicController,
    input: InputContract,
    transform: Transform,
    /// State last announced with `AnimationChanged`
    reported_state: AnimationName,
}

impl Actor {
    /// Build an actor and attach it to the physics world.
    ///
    /// # Errors
    ///
    /// Fails when the spawn transform is not finalized or the clip set does
    /// not cover the actor's animation vocabulary. Nothing is attached to
    /// `backend` on failure.
    pub fn spawn(
        id: ActorId,
        descriptor: &ActorDescriptor,
        backend: &mut dyn PhysicsBackend,
        config: &SimulationConfig,
    ) -> Result<Self, ActorError> {
        if !descriptor.transform.is_finalized() {
            return Err(ActorError::TransformNotFinalized(descriptor.transform));
        }

        let animation = AnimationStateSet::new(
            descriptor.kind,
            &descriptor.clips,
            config.animation.clone(),
        )?;

        let movement = KinematicController::attach(
            backend,
            &descriptor.transform,
            &config.capsule,
            &config.sweep,
            config.movement.clone(),
        )
        .with_swimming(descriptor.kind == ActorKind::Aquatic);

        let driver = match &descriptor.driver {
            InputDriver::Manual => Driver::Manual,
            InputDriver::Npc(npc) => {
                Driver::Npc(NpcBehavior::new(npc.clone(), descriptor.transform.position))
            }
        };

        let reported_state = animation.current();
        log::info!(
            "spawned {id} ({:?}, {}) at {} in {reported_state}",
            descriptor.kind,
            if matches!(driver, Driver::Npc(_)) { "npc" } else { "manual" },
            descriptor.transform.position
        );

        Ok(Self {
            id,
            driver,
            animation,
            transform: movement.visual_transform(),
            movement,
            input: InputContract::NEUTRAL,
            reported_state,
        })
    }

    /// Advance one tick.
    pub fn update(&mut self, dt: f32, backend: &mut dyn PhysicsBackend, ctx: &mut TickContext<'_>) {
        if let Driver::Npc(behavior) = &mut self.driver {
            self.input = behavior.decide(
                ctx.now,
                self.id,
                self.movement.position(),
                self.movement.forward(),
                ctx.target.as_ref(),
                ctx.events,
            );
        }

        self.animation.update(dt, &self.input);
        let state = self.animation.current();
        if state != self.reported_state {
            ctx.events.push(ActorEvent::AnimationChanged {
                actor: self.id,
                from: self.reported_state,
                to: state,
            });
            self.reported_state = state;
        }

        // Stunned and dead actors only fall
        let movement_input = if state.suppresses_movement() {
            InputContract::NEUTRAL
        } else {
            self.input
        };
        self.movement
            .update(dt, &movement_input, backend, self.id, ctx.events);

        self.transform = self.movement.visual_transform();
    }

    /// Replace the input contract used from the next update on.
    ///
    /// NPC-driven actors overwrite it with their own decision each tick.
    pub fn set_input(&mut self, input: InputContract) {
        self.input = input;
    }

    /// Force an animation state (hit reactions, death, emotes).
    ///
    /// Returns `Ok(false)` when the state is already active. The change is
    /// announced as `AnimationChanged` on the next update.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::UnsupportedState`] when `state` is not part of
    /// this actor's vocabulary, and [`ActorError::Dead`] when the actor is in
    /// Death and `state` is anything else.
    pub fn set_animation_state(&mut self, state: AnimationName) -> Result<bool, ActorError> {
        if !self.animation.supports(state) {
            return Err(ActorError::UnsupportedState {
                kind: self.animation.kind(),
                state,
            });
        }
        if self.is_dead() && state != AnimationName::Death {
            return Err(ActorError::Dead {
                actor: self.id,
                requested: state,
            });
        }
        Ok(self.animation.set_state(state))
    }

    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ActorKind {
        self.animation.kind()
    }

    /// Body position (collider center)
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.movement.position()
    }

    #[must_use]
    pub const fn orientation(&self) -> Quat {
        self.movement.orientation()
    }

    /// Visual transform written at the end of the last update
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    #[must_use]
    pub const fn collider_handle(&self) -> ColliderHandle {
        self.movement.collider_handle()
    }

    #[must_use]
    pub const fn body_handle(&self) -> RigidBodyHandle {
        self.movement.body_handle()
    }

    /// Active animation state
    #[must_use]
    pub fn animation_state(&self) -> AnimationName {
        self.animation.current()
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.animation.current() == AnimationName::Death
    }

    #[must_use]
    pub const fn animation(&self) -> &AnimationStateSet {
        &self.animation
    }

    /// Contract the last update ran with
    #[must_use]
    pub const fn input(&self) -> &InputContract {
        &self.input
    }

    #[must_use]
    pub const fn movement(&self) -> &KinematicController {
        &self.movement
    }

    /// Behavior of an NPC-driven actor
    #[must_use]
    pub fn npc_behavior(&self) -> Option<&NpcBehavior> {
        match &self.driver {
            Driver::Npc(behavior) => Some(behavior),
            Driver::Manual => None,
        }
    }

    /// This actor as an NPC target
    #[must_use]
    pub fn as_target(&self) -> Target {
        Target {
            id: self.id,
            position: self.position(),
        }
    }
}
