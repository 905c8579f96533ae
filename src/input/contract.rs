//! The per-tick intent record shared by humans and NPCs

/// Normalized movement/action intents for one actor and one tick.
///
/// Produced either by a human-input adapter or by the NPC behavior
/// controller. Consumers only borrow it for the duration of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContract {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub run: bool,
    pub attack: bool,
}

impl InputContract {
    /// All intents released
    pub const NEUTRAL: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        jump: false,
        run: false,
        attack: false,
    };

    /// Any of forward/backward/left/right held
    #[must_use]
    pub const fn is_directional(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// True when no intent is asserted
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let input = InputContract::default();
        assert!(input.is_neutral());
        assert!(!input.is_directional());
    }

    #[test]
    fn test_turning_counts_as_directional() {
        let input = InputContract {
            left: true,
            ..Default::default()
        };
        assert!(input.is_directional());
        assert!(!input.is_neutral());
    }
}
