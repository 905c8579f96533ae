//! Kinematic movement controller
//!
//! Turns an input contract into a desired displacement, lets the backend's
//! kinematic sweep correct it against the world, and keeps the body, the
//! visual transform and out-of-bounds recovery in step.
//!
//! The controller never steps the world; it queues the next kinematic pose
//! and the world owner steps once per tick.

use glam::{Quat, Vec3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{ActorEvent, ActorId, EventQueue, Transform};
use crate::input::InputContract;

use super::backend::{CapsuleConfig, ColliderHandle, PhysicsBackend, RigidBodyHandle, SweepSettings};

/// Movement tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed (units/sec)
    pub move_speed: f32,
    /// Speed while `run` is held (units/sec)
    pub run_speed: f32,
    /// Turn rate (radians/sec)
    pub rotation_speed: f32,
    /// Vertical fall rate added every tick (units/sec, negative is down)
    pub gravity: f32,
    /// Vertical offset from the body position to the visual mesh origin
    pub visual_offset: f32,
    /// Bodies below this height are out of bounds
    pub fall_threshold: f32,
    /// Extra height added to the spawn position on respawn
    pub respawn_bias: f32,
    /// Swimmer bobbing amplitude at the out-of-bounds height
    pub bob_amplitude: f32,
    /// Swimmer bobbing frequency (radians/sec)
    pub bob_frequency: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            run_speed: 10.0,
            rotation_speed: 3.0,
            gravity: -9.81,
            visual_offset: -CapsuleConfig::default().center_to_bottom(),
            fall_threshold: -5.0,
            respawn_bias: 1.0,
            bob_amplitude: 0.1,
            bob_frequency: 2.0,
        }
    }
}

/// Per-actor kinematic controller
#[derive(Debug)]
pub struct KinematicController {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    config: MovementConfig,
    /// Swimmers bob at the out-of-bounds height instead of respawning
    can_swim: bool,
    /// Horizontal unit facing direction
    forward: Vec3,
    rotation: Quat,
    /// Body (collider center) position
    position: Vec3,
    spawn: Vec3,
    scale: Vec3,
    elapsed: f32,
    last_displacement: Vec3,
    grounded: bool,
    /// Sensors overlapped at the end of the previous tick
    touching: FxHashSet<ColliderHandle>,
}

impl KinematicController {
    /// Create the body, capsule collider and sweep settings for an actor
    /// spawning at `spawn`.
    pub fn attach(
        backend: &mut dyn PhysicsBackend,
        spawn: &Transform,
        capsule: &CapsuleConfig,
        sweep: &SweepSettings,
        config: MovementConfig,
    ) -> Self {
        let forward = horizontal_forward(spawn.rotation);
        let rotation = facing_rotation(forward);

        let body = backend.create_kinematic_body(spawn.position, rotation);
        let collider = backend.create_capsule_collider(body, capsule);
        backend.configure_sweep(collider, sweep);

        Self {
            body,
            collider,
            config,
            can_swim: false,
            forward,
            rotation,
            position: spawn.position,
            spawn: spawn.position,
            scale: spawn.scale,
            elapsed: 0.0,
            last_displacement: Vec3::ZERO,
            grounded: false,
            touching: FxHashSet::default(),
        }
    }

    /// Enable swimmer out-of-bounds handling
    #[must_use]
    pub fn with_swimming(mut self, can_swim: bool) -> Self {
        self.can_swim = can_swim;
        self
    }

    /// Advance one tick.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputContract,
        backend: &mut dyn PhysicsBackend,
        actor: ActorId,
        events: &mut EventQueue,
    ) {
        self.elapsed += dt;

        self.turn(dt, input);
        let desired = self.desired_displacement(dt, input);

        let sweep = backend.sweep_move(self.collider, self.position, desired, dt);
        self.position += sweep.translation;
        self.last_displacement = sweep.translation;
        self.grounded = sweep.grounded;

        if self.position.y < self.config.fall_threshold {
            if self.can_swim {
                self.position.y = self.config.fall_threshold
                    + self.config.bob_amplitude * (self.elapsed * self.config.bob_frequency).sin();
            } else {
                self.respawn(backend, actor, events);
            }
        }

        backend.set_kinematic_pose(self.body, self.position, self.rotation);
        self.detect_sensors(backend, actor, events);
    }

    fn turn(&mut self, dt: f32, input: &InputContract) {
        let mut angle = 0.0;
        if input.left {
            angle += self.config.rotation_speed * dt;
        }
        if input.right {
            angle -= self.config.rotation_speed * dt;
        }
        if angle != 0.0 {
            self.forward = (Quat::from_rotation_y(angle) * self.forward).normalize();
            self.rotation = facing_rotation(self.forward);
        }
    }

    fn desired_displacement(&self, dt: f32, input: &InputContract) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if input.forward {
            direction += self.forward;
        }
        if input.backward {
            direction -= self.forward;
        }

        let speed = if input.run {
            self.config.run_speed
        } else {
            self.config.move_speed
        };

        let mut desired = direction.normalize_or_zero() * speed * dt;
        desired.y += self.config.gravity * dt;
        desired
    }

    fn respawn(&mut self, backend: &mut dyn PhysicsBackend, actor: ActorId, events: &mut EventQueue) {
        let position = self.spawn + Vec3::Y * self.config.respawn_bias;
        log::info!("{actor} fell to y={:.2}, respawning at {position}", self.position.y);

        self.position = position;
        self.last_displacement = Vec3::ZERO;
        self.grounded = false;
        backend.teleport(self.body, position, self.rotation);
        events.push(ActorEvent::Respawned { actor, position });
    }

    fn detect_sensors(&mut self, backend: &dyn PhysicsBackend, actor: ActorId, events: &mut EventQueue) {
        let overlapping: FxHashSet<ColliderHandle> = backend
            .query_sensor_overlaps(self.collider, self.position)
            .into_iter()
            .collect();

        for sensor in overlapping.difference(&self.touching) {
            log::debug!("{actor} touched sensor {sensor:?}");
            events.push(ActorEvent::SensorTouched {
                sensor: *sensor,
                actor,
            });
        }
        self.touching = overlapping;
    }

    /// Body position (collider center)
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Facing rotation about +Y
    #[must_use]
    pub const fn orientation(&self) -> Quat {
        self.rotation
    }

    /// Horizontal unit facing direction
    #[must_use]
    pub const fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Transform for the visual mesh
    #[must_use]
    pub fn visual_transform(&self) -> Transform {
        Transform {
            position: self.position + Vec3::Y * self.config.visual_offset,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Corrected displacement applied last tick
    #[must_use]
    pub const fn last_displacement(&self) -> Vec3 {
        self.last_displacement
    }

    /// Whether the last sweep ended on the ground
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[must_use]
    pub const fn spawn_position(&self) -> Vec3 {
        self.spawn
    }

    #[must_use]
    pub const fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    #[must_use]
    pub const fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }

    #[must_use]
    pub const fn can_swim(&self) -> bool {
        self.can_swim
    }
}

fn horizontal_forward(rotation: Quat) -> Vec3 {
    let forward = rotation * Transform::FORWARD;
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    if flat.length_squared() > f32::EPSILON {
        flat.normalize()
    } else {
        Transform::FORWARD
    }
}

/// Shortest rotation about +Y taking the canonical forward onto `forward`
fn facing_rotation(forward: Vec3) -> Quat {
    Quat::from_rotation_y(forward.x.atan2(forward.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::ScriptedBackend;

    const DT: f32 = 1.0 / 60.0;
    const ACTOR: ActorId = ActorId(1);

    fn controller(backend: &mut ScriptedBackend, position: Vec3) -> KinematicController {
        KinematicController::attach(
            backend,
            &Transform::from_position(position),
            &CapsuleConfig::default(),
            &SweepSettings::default(),
            MovementConfig::default(),
        )
    }

    fn input(f: impl FnOnce(&mut InputContract)) -> InputContract {
        let mut contract = InputContract::default();
        f(&mut contract);
        contract
    }

    #[test]
    fn test_attach_configures_sweep() {
        let mut backend = ScriptedBackend::default();
        let ctrl = controller(&mut backend, Vec3::new(0.0, 1.0, 0.0));

        assert_eq!(backend.sweep_settings, Some(SweepSettings::default()));
        assert_eq!(ctrl.forward(), Vec3::Z);
        assert_eq!(ctrl.spawn_position(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_forward_walk_displacement() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();
        let mut ctrl = controller(&mut backend, Vec3::new(0.0, 1.0, 0.0));

        ctrl.update(DT, &input(|i| i.forward = true), &mut backend, ACTOR, &mut events);

        let desired = backend.sweeps[0];
        let config = MovementConfig::default();
        assert!((desired.z - config.move_speed * DT).abs() < 1e-6);
        assert!((desired.y - config.gravity * DT).abs() < 1e-6);
        assert_eq!(desired.x, 0.0);
    }

    #[test]
    fn test_run_uses_run_speed() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();
        let mut ctrl = controller(&mut backend, Vec3::ZERO);

        let running = input(|i| {
            i.backward = true;
            i.run = true;
        });
        ctrl.update(DT, &running, &mut backend, ACTOR, &mut events);

        let desired = backend.sweeps[0];
        assert!((desired.z + MovementConfig::default().run_speed * DT).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_inputs_cancel() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();
        let mut ctrl = controller(&mut backend, Vec3::ZERO);

        let both = input(|i| {
            i.forward = true;
            i.backward = true;
        });
        ctrl.update(DT, &both, &mut backend, ACTOR, &mut events);

        let desired = backend.sweeps[0];
        assert_eq!(Vec3::new(desired.x, 0.0, desired.z), Vec3::ZERO);
    }

    #[test]
    fn test_turning_direction() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();

        let mut left = controller(&mut backend, Vec3::ZERO);
        left.update(0.5, &input(|i| i.left = true), &mut backend, ACTOR, &mut events);
        assert!(left.forward().x > 0.0, "left turns toward +X when facing +Z");
        assert!((left.forward().length() - 1.0).abs() < 1e-5);

        let mut right = controller(&mut backend, Vec3::ZERO);
        right.update(0.5, &input(|i| i.right = true), &mut backend, ACTOR, &mut events);
        assert!(right.forward().x < 0.0);

        // Orientation maps the canonical forward onto the facing direction
        let facing = left.orientation() * Transform::FORWARD;
        assert!((facing - left.forward()).length() < 1e-5);

        let angle = MovementConfig::default().rotation_speed * 0.5;
        assert!((left.forward().x - angle.sin()).abs() < 1e-5);
    }

    #[test]
    fn test_turning_alone_does_not_translate() {
        let mut backend = ScriptedBackend::with_floor(0.0);
        let mut events = EventQueue::new();
        let start = Vec3::new(0.0, CapsuleConfig::default().center_to_bottom(), 0.0);
        let mut ctrl = controller(&mut backend, start);

        ctrl.update(DT, &input(|i| i.left = true), &mut backend, ACTOR, &mut events);
        assert_eq!(ctrl.position(), start);
        assert!(ctrl.is_grounded());
    }

    #[test]
    fn test_pose_and_visual_sync() {
        let mut backend = ScriptedBackend::with_floor(0.0);
        let mut events = EventQueue::new();
        let start = Vec3::new(0.0, 0.9, 0.0);
        let mut ctrl = controller(&mut backend, start);

        ctrl.update(DT, &input(|i| i.forward = true), &mut backend, ACTOR, &mut events);

        let (body, position, rotation) = backend.poses[0];
        assert_eq!(body, ctrl.body_handle());
        assert_eq!(position, ctrl.position());
        assert_eq!(rotation, ctrl.orientation());

        let visual = ctrl.visual_transform();
        let config = MovementConfig::default();
        assert!((visual.position.y - (ctrl.position().y + config.visual_offset)).abs() < 1e-6);
        assert_eq!(visual.rotation, ctrl.orientation());
    }

    #[test]
    fn test_out_of_bounds_respawn() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();
        let spawn = Vec3::new(2.0, 1.0, -3.0);
        let mut ctrl = controller(&mut backend, spawn);

        backend.displacement = Some(Vec3::new(0.5, -10.0, 0.0));
        ctrl.update(DT, &input(|i| i.forward = true), &mut backend, ACTOR, &mut events);

        let expected = spawn + Vec3::Y * MovementConfig::default().respawn_bias;
        assert_eq!(ctrl.position(), expected);
        assert_eq!(ctrl.last_displacement(), Vec3::ZERO);
        assert_eq!(backend.teleports.len(), 1);
        assert_eq!(backend.teleports[0].1, expected);

        events.swap();
        let respawns: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, ActorEvent::Respawned { .. }))
            .collect();
        assert_eq!(respawns.len(), 1);
    }

    #[test]
    fn test_swimmer_bobs_instead_of_respawning() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();
        let mut ctrl = controller(&mut backend, Vec3::ZERO).with_swimming(true);

        backend.displacement = Some(Vec3::new(0.0, -10.0, 0.0));
        ctrl.update(0.25, &InputContract::NEUTRAL, &mut backend, ACTOR, &mut events);

        let config = MovementConfig::default();
        let expected = config.fall_threshold + config.bob_amplitude * (0.25 * config.bob_frequency).sin();
        assert!((ctrl.position().y - expected).abs() < 1e-5);
        assert!(backend.teleports.is_empty());
        assert_eq!(events.pending_count(), 0);
    }

    #[test]
    fn test_sensor_touch_is_edge_triggered() {
        let mut backend = ScriptedBackend::default();
        let mut events = EventQueue::new();
        let mut ctrl = controller(&mut backend, Vec3::ZERO);
        let goal = backend.sensor();

        backend.overlaps = vec![goal];
        ctrl.update(DT, &InputContract::NEUTRAL, &mut backend, ACTOR, &mut events);
        ctrl.update(DT, &InputContract::NEUTRAL, &mut backend, ACTOR, &mut events);
        backend.overlaps.clear();
        ctrl.update(DT, &InputContract::NEUTRAL, &mut backend, ACTOR, &mut events);
        backend.overlaps = vec![goal];
        ctrl.update(DT, &InputContract::NEUTRAL, &mut backend, ACTOR, &mut events);

        events.swap();
        let touches: Vec<_> = events.iter().collect();
        assert_eq!(touches.len(), 2);
        assert!(touches.iter().all(|e| **e
            == ActorEvent::SensorTouched {
                sensor: goal,
                actor: ACTOR
            }));
    }

    #[test]
    fn test_spawn_rotation_sets_facing() {
        let mut backend = ScriptedBackend::default();
        let spawn = Transform::from_position_rotation(
            Vec3::ZERO,
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let ctrl = KinematicController::attach(
            &mut backend,
            &spawn,
            &CapsuleConfig::default(),
            &SweepSettings::default(),
            MovementConfig::default(),
        );
        assert!((ctrl.forward() - Vec3::X).length() < 1e-5);
    }
}
