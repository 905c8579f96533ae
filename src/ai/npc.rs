//! Chase-and-attack behavior for non-player actors
//!
//! Stateless apart from the attack timestamp: every tick the contract is
//! rebuilt from distance and facing angle to the target.

use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{ActorEvent, ActorId, EventQueue};
use crate::input::InputContract;

/// Behavior thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Targets farther than this are ignored
    pub detection_range: f32,
    /// Targets within this distance can be attacked
    pub attack_range: f32,
    /// Minimum seconds between attacks
    pub attack_cooldown: f32,
    /// Facing error (radians) tolerated before turning
    pub rotation_deadzone: f32,
    /// Facing error (radians) under which the NPC advances
    pub forward_angle_threshold: f32,
    /// Damage carried by each attack event
    pub attack_damage: f32,
    /// Radius of the area around the spawn point the NPC guards
    pub patrol_radius: f32,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            detection_range: 20.0,
            attack_range: 2.0,
            attack_cooldown: 2.0,
            rotation_deadzone: 0.6,
            forward_angle_threshold: FRAC_PI_4,
            attack_damage: 10.0,
            patrol_radius: 3.0,
        }
    }
}

impl NpcConfig {
    pub fn with_detection_range(mut self, range: f32) -> Self {
        self.detection_range = range;
        self
    }

    pub fn with_attack_range(mut self, range: f32) -> Self {
        self.attack_range = range;
        self
    }

    pub fn with_attack_cooldown(mut self, seconds: f32) -> Self {
        self.attack_cooldown = seconds;
        self
    }

    pub fn with_attack_damage(mut self, damage: f32) -> Self {
        self.attack_damage = damage;
        self
    }
}

/// Actor the NPC hunts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: ActorId,
    pub position: Vec3,
}

/// Per-NPC decision state
#[derive(Debug, Clone)]
pub struct NpcBehavior {
    config: NpcConfig,
    /// Time of the last attack; `None` until the first one
    last_attack_time: Option<f32>,
    patrol_center: Vec3,
}

impl NpcBehavior {
    #[must_use]
    pub fn new(config: NpcConfig, patrol_center: Vec3) -> Self {
        Self {
            config,
            last_attack_time: None,
            patrol_center,
        }
    }

    /// Build this tick's contract for an NPC at `position` facing `forward`.
    ///
    /// Attacks push a [`ActorEvent::DamageDealt`] carrying `actor` and the
    /// target's id.
    pub fn decide(
        &mut self,
        now: f32,
        actor: ActorId,
        position: Vec3,
        forward: Vec3,
        target: Option<&Target>,
        events: &mut EventQueue,
    ) -> InputContract {
        let mut input = InputContract::NEUTRAL;
        let Some(target) = target else {
            return input;
        };

        let to_target = target.position - position;
        let distance = to_target.length();
        if distance > self.config.detection_range {
            return input;
        }

        let angle = signed_angle(forward, to_target);

        if distance >= self.config.attack_range / 2.0 && angle.abs() > self.config.rotation_deadzone {
            if angle > 0.0 {
                input.left = true;
            } else {
                input.right = true;
            }
        }

        if angle.abs() < self.config.forward_angle_threshold {
            input.forward = true;
        }

        if distance <= self.config.attack_range && self.cooldown_elapsed(now) {
            input.attack = true;
            self.last_attack_time = Some(now);
            log::debug!("{actor} attacks {} at distance {distance:.2}", target.id);
            events.push(ActorEvent::DamageDealt {
                attacker: actor,
                target: target.id,
                amount: self.config.attack_damage,
            });
        }

        input
    }

    fn cooldown_elapsed(&self, now: f32) -> bool {
        self.last_attack_time
            .is_none_or(|last| now - last >= self.config.attack_cooldown)
    }

    #[must_use]
    pub fn config(&self) -> &NpcConfig {
        &self.config
    }

    #[must_use]
    pub const fn last_attack_time(&self) -> Option<f32> {
        self.last_attack_time
    }

    /// Spawn position the NPC guards
    #[must_use]
    pub const fn patrol_center(&self) -> Vec3 {
        self.patrol_center
    }

    /// Horizontal distance from `position` to the patrol center
    #[must_use]
    pub fn distance_from_patrol_center(&self, position: Vec3) -> f32 {
        let offset = position - self.patrol_center;
        Vec3::new(offset.x, 0.0, offset.z).length()
    }

    /// Whether `position` lies inside the guarded area
    #[must_use]
    pub fn is_within_patrol_area(&self, position: Vec3) -> bool {
        self.distance_from_patrol_center(position) <= self.config.patrol_radius
    }
}

/// Angle from `forward` to `to_target` about +Y, positive when the target is
/// to the left (counter-clockwise seen from above).
fn signed_angle(forward: Vec3, to_target: Vec3) -> f32 {
    let f = Vec3::new(forward.x, 0.0, forward.z);
    let t = Vec3::new(to_target.x, 0.0, to_target.z);
    f.cross(t).y.atan2(f.dot(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPC: ActorId = ActorId(2);
    const PLAYER: ActorId = ActorId(1);

    fn target_at(position: Vec3) -> Target {
        Target {
            id: PLAYER,
            position,
        }
    }

    fn behavior() -> NpcBehavior {
        NpcBehavior::new(NpcConfig::default(), Vec3::ZERO)
    }

    #[test]
    fn test_chase_and_attack_scenario() {
        let config = NpcConfig::default();
        let mut npc = behavior();
        let mut events = EventQueue::new();
        let forward = Vec3::Z;

        // Out of detection range
        let far = target_at(Vec3::Z * (config.detection_range + 1.0));
        let input = npc.decide(0.0, NPC, Vec3::ZERO, forward, Some(&far), &mut events);
        assert!(input.is_neutral());

        // Close and straight ahead: advance without turning
        let near = target_at(Vec3::Z * (config.attack_range / 2.0 - 0.1));
        let input = npc.decide(0.1, NPC, Vec3::ZERO, forward, Some(&near), &mut events);
        assert!(input.forward);
        assert!(!input.left && !input.right);

        // Within attack range with the cooldown expired
        let reach = target_at(Vec3::Z * (config.attack_range - 0.1));
        let input = npc.decide(5.0, NPC, Vec3::ZERO, forward, Some(&reach), &mut events);
        assert!(input.attack);
        assert_eq!(npc.last_attack_time(), Some(5.0));

        // Second check inside the cooldown
        let input = npc.decide(
            5.0 + config.attack_cooldown / 2.0,
            NPC,
            Vec3::ZERO,
            forward,
            Some(&reach),
            &mut events,
        );
        assert!(!input.attack);
        assert_eq!(npc.last_attack_time(), Some(5.0));

        // And again once it has elapsed
        let input = npc.decide(
            5.0 + config.attack_cooldown,
            NPC,
            Vec3::ZERO,
            forward,
            Some(&reach),
            &mut events,
        );
        assert!(input.attack);
    }

    #[test]
    fn test_attack_emits_damage_event() {
        let mut npc = behavior();
        let mut events = EventQueue::new();

        let target = target_at(Vec3::new(0.0, 0.0, 1.0));
        npc.decide(1.0, NPC, Vec3::ZERO, Vec3::Z, Some(&target), &mut events);
        npc.decide(1.5, NPC, Vec3::ZERO, Vec3::Z, Some(&target), &mut events);

        events.swap();
        let events: Vec<_> = events.iter().collect();
        assert_eq!(
            events,
            vec![&ActorEvent::DamageDealt {
                attacker: NPC,
                target: PLAYER,
                amount: NpcConfig::default().attack_damage,
            }]
        );
    }

    #[test]
    fn test_turn_direction_sign() {
        let mut events = EventQueue::new();

        // Facing +Z, +X is on the left and -X on the right
        let right = target_at(Vec3::new(-10.0, 0.0, 0.0));
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&right), &mut events);
        assert!(input.right);
        assert!(!input.left);
        assert!(!input.forward);

        let left = target_at(Vec3::new(10.0, 0.0, 0.0));
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&left), &mut events);
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_no_turning_deep_inside_attack_range() {
        let mut events = EventQueue::new();
        let beside = target_at(Vec3::new(0.5, 0.0, 0.0));
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&beside), &mut events);
        assert!(!input.left && !input.right);
        assert!(input.attack);
    }

    #[test]
    fn test_small_facing_error_within_deadzone() {
        let mut events = EventQueue::new();
        // About 0.3 rad off: inside the deadzone, inside the forward cone
        let target = target_at(Vec3::new(3.0, 0.0, 10.0));
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&target), &mut events);
        assert!(input.forward);
        assert!(!input.left && !input.right);
    }

    #[test]
    fn test_target_exactly_at_detection_range_is_chased() {
        let mut events = EventQueue::new();
        let edge = target_at(Vec3::Z * NpcConfig::default().detection_range);
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&edge), &mut events);
        assert!(input.forward);
    }

    #[test]
    fn test_turns_at_half_attack_range() {
        let mut events = EventQueue::new();
        // Square to the left at exactly half the attack range
        let half = NpcConfig::default().attack_range / 2.0;
        let beside = target_at(Vec3::new(half, 0.0, 0.0));
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&beside), &mut events);
        assert!(input.left);
        assert!(input.attack);
    }

    #[test]
    fn test_turns_and_advances_between_deadzone_and_forward_cone() {
        let config = NpcConfig::default();
        let angle = (config.rotation_deadzone + config.forward_angle_threshold) / 2.0;
        let mut events = EventQueue::new();

        let left = target_at(Vec3::new(angle.sin(), 0.0, angle.cos()) * 10.0);
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&left), &mut events);
        assert!(input.left && input.forward);
        assert!(!input.right);

        let right = target_at(Vec3::new(-angle.sin(), 0.0, angle.cos()) * 10.0);
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, Some(&right), &mut events);
        assert!(input.right && input.forward);
        assert!(!input.left);
    }

    #[test]
    fn test_no_target_is_idle() {
        let mut events = EventQueue::new();
        let input = behavior().decide(0.0, NPC, Vec3::ZERO, Vec3::Z, None, &mut events);
        assert!(input.is_neutral());
    }

    #[test]
    fn test_patrol_area() {
        let npc = NpcBehavior::new(NpcConfig::default(), Vec3::new(5.0, 1.0, 5.0));
        assert!(npc.is_within_patrol_area(Vec3::new(6.0, 0.0, 5.0)));
        assert!(!npc.is_within_patrol_area(Vec3::new(9.0, 1.0, 5.0)));
        assert!((npc.distance_from_patrol_center(Vec3::new(5.0, 10.0, 8.0)) - 3.0).abs() < 1e-6);
    }
}
