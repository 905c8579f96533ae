//! Finite State Machine engine
//!
//! A generic, name-keyed state machine. States are registered as factories
//! under a name from a closed key type; transitions construct a fresh state
//! instance and drop the outgoing one.
//!
//! # Lifecycle
//!
//! - `set_state(name)` is ignored when `name` is already active, so a playing
//!   state is never restarted by a repeated request.
//! - Otherwise the outgoing state's `exit()` runs, the factory builds the new
//!   state, it becomes current and `enter(previous)` runs.
//! - `update()` forwards to the current state; a returned
//!   [`Transition::To`] is applied before `update()` returns.
//!
//! # Example
//!
//! ```ignore
//! let mut fsm: StateMachine<Mode, ()> = StateMachine::new();
//! fsm.register(Mode::Idle, || Box::new(IdleState));
//! fsm.register(Mode::Busy, || Box::new(BusyState::default()));
//!
//! fsm.set_state(Mode::Idle, &mut ());
//! fsm.update(dt, &input, &mut ());
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::input::InputContract;

// ============================================================================
// State Trait
// ============================================================================

/// A state in the finite state machine.
///
/// `N` is the key type states are registered under; `Ctx` is the mutable
/// context shared by every state of one machine.
pub trait State<N, Ctx>: fmt::Debug {
    /// Name this state is registered under.
    fn name(&self) -> N;

    /// Called once after this state becomes current.
    ///
    /// `previous` is `None` only for the first state of a machine.
    fn enter(&mut self, _previous: Option<N>, _ctx: &mut Ctx) {}

    /// Called each tick while this state is current.
    fn update(&mut self, dt: f32, input: &InputContract, ctx: &mut Ctx) -> Transition<N>;

    /// Called once before this state is dropped.
    fn exit(&mut self, _ctx: &mut Ctx) {}
}

// ============================================================================
// Transition
// ============================================================================

/// Returned from [`State::update`] to stay or move to another named state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<N> {
    /// Stay in the current state.
    None,
    /// Switch to the named state.
    To(N),
}

// ============================================================================
// State Machine
// ============================================================================

type Factory<N, Ctx> = Box<dyn Fn() -> Box<dyn State<N, Ctx>>>;

/// Name-keyed finite state machine.
pub struct StateMachine<N, Ctx> {
    /// Registered state constructors
    factories: FxHashMap<N, Factory<N, Ctx>>,
    /// Active state, `None` before the first `set_state`
    current: Option<Box<dyn State<N, Ctx>>>,
}

impl<N, Ctx> StateMachine<N, Ctx>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    /// Create an empty machine with no registered states.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
            current: None,
        }
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: N, factory: F)
    where
        F: Fn() -> Box<dyn State<N, Ctx>> + 'static,
    {
        self.factories.insert(name, Box::new(factory));
    }

    /// Whether a factory exists for `name`.
    #[must_use]
    pub fn is_registered(&self, name: N) -> bool {
        self.factories.contains_key(&name)
    }

    /// Switch to the state registered under `name`.
    ///
    /// Returns `false` when `name` is already active (nothing happens).
    ///
    /// # Panics
    ///
    /// Panics if `name` was never registered.
    pub fn set_state(&mut self, name: N, ctx: &mut Ctx) -> bool {
        let Some(factory) = self.factories.get(&name) else {
            panic!("state {name:?} is not registered with this state machine");
        };

        let previous = match self.current.as_mut() {
            Some(current) if current.name() == name => return false,
            Some(current) => {
                current.exit(ctx);
                Some(current.name())
            }
            None => None,
        };

        log::debug!("state transition {previous:?} -> {name:?}");

        let mut next = factory();
        next.enter(previous, ctx);
        self.current = Some(next);
        true
    }

    /// Update the active state and apply the transition it requests.
    pub fn update(&mut self, dt: f32, input: &InputContract, ctx: &mut Ctx) {
        let Some(current) = self.current.as_mut() else {
            return;
        };

        if let Transition::To(next) = current.update(dt, input, ctx) {
            self.set_state(next, ctx);
        }
    }

    /// Name of the active state.
    #[must_use]
    pub fn current_state_name(&self) -> Option<N> {
        self.current.as_ref().map(|state| state.name())
    }

    /// Check if the machine is in the named state.
    #[must_use]
    pub fn is_in_state(&self, name: N) -> bool {
        self.current_state_name() == Some(name)
    }
}

impl<N, Ctx> Default for StateMachine<N, Ctx>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, Ctx> fmt::Debug for StateMachine<N, Ctx>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_state_name())
            .field("registered", &self.factories.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
