//! Actor event queue
//!
//! Double-buffered queue that carries what happened to actors during a tick
//! (sensor hits, damage, animation changes, respawns) to the game layer
//! without the producers knowing who listens.
//!
//! Events pushed during tick N become readable after the `swap()` that
//! starts tick N+1.
//!
//! ```ignore
//! // Actor update
//! events.push(ActorEvent::DamageDealt { attacker, target, amount: 10.0 });
//!
//! // Game layer, next tick
//! events.swap();
//! for event in events.iter() {
//!     if let ActorEvent::DamageDealt { target, .. } = event {
//!         hurt(*target);
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationName;
use crate::physics::ColliderHandle;

/// Stable identifier of an actor, assigned by whoever spawns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// Something that happened to an actor this tick.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ActorEvent {
    /// An actor's collider started overlapping a sensor volume.
    SensorTouched {
        /// The sensor collider
        sensor: ColliderHandle,
        /// Actor that entered it
        actor: ActorId,
    },

    /// An NPC landed an attack.
    DamageDealt {
        /// The attacking NPC
        attacker: ActorId,
        /// Actor that was hit
        target: ActorId,
        /// Damage amount
        amount: f32,
    },

    /// The animation state machine changed state.
    AnimationChanged {
        actor: ActorId,
        from: AnimationName,
        to: AnimationName,
    },

    /// A non-swimming actor fell out of the world and was put back.
    Respawned {
        actor: ActorId,
        /// Where the body was teleported to
        position: Vec3,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue.
///
/// - Push: O(1) amortized
/// - Iteration: O(n)
/// - Swap: O(1)
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this tick
    pending: VecDeque<ActorEvent>,
    /// Events from the previous tick, ready for processing
    processing: VecDeque<ActorEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next tick.
    #[inline]
    pub fn push(&mut self, event: ActorEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call once per tick, before actors update.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous tick.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ActorEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous tick.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = ActorEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next tick.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn damage(amount: f32) -> ActorEvent {
        ActorEvent::DamageDealt {
            attacker: ActorId(2),
            target: ActorId(1),
            amount,
        }
    }

    #[test]
    fn test_event_queue_push_and_swap() {
        let mut queue = EventQueue::new();

        queue.push(damage(10.0));
        assert!(queue.is_empty(), "Events should not be visible before swap");
        assert_eq!(queue.pending_count(), 1);

        queue.swap();
        assert_eq!(queue.len(), 1);

        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events[0], &damage(10.0));
    }

    #[test]
    fn test_event_queue_double_buffer_isolation() {
        let mut queue = EventQueue::new();

        queue.push(damage(1.0));
        queue.swap();

        // Tick 2 writes while tick 1's events are read
        queue.push(damage(2.0));

        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events, vec![&damage(1.0)]);

        queue.swap();
        let events: Vec<_> = queue.iter().collect();
        assert_eq!(events, vec![&damage(2.0)]);
    }

    #[test]
    fn test_event_queue_drain() {
        let mut queue = EventQueue::new();

        queue.push(ActorEvent::AnimationChanged {
            actor: ActorId(1),
            from: AnimationName::Idle,
            to: AnimationName::Walk,
        });
        queue.push(ActorEvent::Respawned {
            actor: ActorId(1),
            position: Vec3::Y,
        });
        queue.swap();

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_queue_clear() {
        let mut queue = EventQueue::new();

        queue.push(damage(5.0));
        queue.swap();
        queue.push(damage(6.0));

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_actor_id_display() {
        assert_eq!(ActorId(7).to_string(), "actor#7");
    }
}
