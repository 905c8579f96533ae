//! Simulation clock

/// Fixed-order simulation time, advanced once per tick by the owner of the
/// loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    elapsed: f32,
    delta: f32,
    ticks: u64,
}

impl SimClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds and return the new elapsed time
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.delta = dt;
        self.elapsed += dt;
        self.ticks += 1;
        self.elapsed
    }

    /// Seconds since the clock started
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Length of the last tick
    #[must_use]
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of ticks taken
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
