/// Cursor position within a match set. `current < total` whenever `total > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigatorState {
    pub current: usize,
    pub total: usize,
}

/// Wrapping cursor over `total` matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchNavigator {
    state: NavigatorState,
}

impl MatchNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn current(&self) -> usize {
        self.state.current
    }

    pub fn total(&self) -> usize {
        self.state.total
    }

    pub fn is_empty(&self) -> bool {
        self.state.total == 0
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.state.total == 0 {
            return None;
        }
        self.state.current = (self.state.current + 1) % self.state.total;
        Some(self.state.current)
    }

    pub fn previous(&mut self) -> Option<usize> {
        if self.state.total == 0 {
            return None;
        }
        self.state.current = (self.state.current + self.state.total - 1) % self.state.total;
        Some(self.state.current)
    }

    pub fn reset(&mut self, total: usize) {
        self.state = NavigatorState { current: 0, total };
    }

    /// Jumps to `index`. Out-of-range indices leave the cursor unchanged.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index >= self.state.total {
            return None;
        }
        self.state.current = index;
        Some(index)
    }
}
