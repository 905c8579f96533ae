//! Keyboard/mouse adapter producing an [`InputContract`]
//!
//! Raw window events are captured elsewhere; this module only folds key and
//! button transitions into the held-intent record the actor consumes.
//!
//! # Example
//!
//! ```ignore
//! let mut keyboard = KeyboardInput::with_defaults();
//!
//! // From the window event handler
//! keyboard.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
//!
//! // Once per tick
//! player.set_input(keyboard.contract());
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use super::InputContract;

// ============================================================================
// Intents
// ============================================================================

/// Logical intent a physical key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Jump,
    Run,
    Attack,
}

impl Intent {
    fn apply(self, contract: &mut InputContract) {
        match self {
            Self::Forward => contract.forward = true,
            Self::Backward => contract.backward = true,
            Self::TurnLeft => contract.left = true,
            Self::TurnRight => contract.right = true,
            Self::Jump => contract.jump = true,
            Self::Run => contract.run = true,
            Self::Attack => contract.attack = true,
        }
    }
}

// ============================================================================
// Key Bindings
// ============================================================================

/// Maps physical keys to intents.
///
/// Supports runtime rebinding and reverse lookup for UI display.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Key to intent bindings
    key_bindings: FxHashMap<KeyCode, Intent>,
    /// Reverse lookup: intent to keys
    intent_keys: FxHashMap<Intent, Vec<KeyCode>>,
}

impl KeyBindings {
    /// Create an empty binding table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_bindings: FxHashMap::default(),
            intent_keys: FxHashMap::default(),
        }
    }

    /// WASD + arrows, Shift to run, Space to jump, F to attack.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut bindings = Self::new();

        bindings.bind(KeyCode::KeyW, Intent::Forward);
        bindings.bind(KeyCode::KeyS, Intent::Backward);
        bindings.bind(KeyCode::KeyA, Intent::TurnLeft);
        bindings.bind(KeyCode::KeyD, Intent::TurnRight);

        bindings.bind(KeyCode::ArrowUp, Intent::Forward);
        bindings.bind(KeyCode::ArrowDown, Intent::Backward);
        bindings.bind(KeyCode::ArrowLeft, Intent::TurnLeft);
        bindings.bind(KeyCode::ArrowRight, Intent::TurnRight);

        bindings.bind(KeyCode::ShiftLeft, Intent::Run);
        bindings.bind(KeyCode::ShiftRight, Intent::Run);
        bindings.bind(KeyCode::Space, Intent::Jump);
        bindings.bind(KeyCode::KeyF, Intent::Attack);

        bindings
    }

    /// Bind a key to an intent, replacing any previous binding of that key.
    pub fn bind(&mut self, key: KeyCode, intent: Intent) {
        if let Some(old) = self.key_bindings.get(&key)
            && let Some(keys) = self.intent_keys.get_mut(old)
        {
            keys.retain(|k| *k != key);
        }

        self.key_bindings.insert(key, intent);
        self.intent_keys.entry(intent).or_default().push(key);
    }

    /// Unbind a key.
    pub fn unbind(&mut self, key: KeyCode) {
        if let Some(intent) = self.key_bindings.remove(&key)
            && let Some(keys) = self.intent_keys.get_mut(&intent)
        {
            keys.retain(|k| *k != key);
        }
    }

    /// Get the intent for a key.
    #[must_use]
    pub fn intent(&self, key: KeyCode) -> Option<Intent> {
        self.key_bindings.get(&key).copied()
    }

    /// Get all keys bound to an intent.
    #[must_use]
    pub fn keys(&self, intent: Intent) -> &[KeyCode] {
        self.intent_keys
            .get(&intent)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// Keyboard Input
// ============================================================================

/// Human-input adapter: tracks held keys and reports them as a contract.
#[derive(Debug)]
pub struct KeyboardInput {
    bindings: KeyBindings,
    /// Currently held keys
    pressed_keys: FxHashSet<KeyCode>,
    /// Primary mouse button held (attack)
    primary_button: bool,
}

impl KeyboardInput {
    /// Create an adapter with the given bindings.
    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed_keys: FxHashSet::default(),
            primary_button: false,
        }
    }

    /// Create an adapter with the default bindings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(KeyBindings::with_defaults())
    }

    /// Process a keyboard event
    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(key_code);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
            }
        }
    }

    /// Process a mouse button event; the left button attacks.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.primary_button = state == ElementState::Pressed;
        }
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.primary_button = false;
    }

    /// Mutable access to the bindings for rebinding at runtime.
    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    /// Snapshot of the held intents for this tick.
    #[must_use]
    pub fn contract(&self) -> InputContract {
        let mut contract = InputContract::default();
        for key in &self.pressed_keys {
            if let Some(intent) = self.bindings.intent(*key) {
                intent.apply(&mut contract);
            }
        }
        if self.primary_button {
            contract.attack = true;
        }
        contract
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::with_defaults()
    }
}
