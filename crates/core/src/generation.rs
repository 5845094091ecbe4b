/// Token identifying one fetch. Results carrying a superseded token are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Issues generations; only the latest one may write state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Generation {
        self.current
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}
