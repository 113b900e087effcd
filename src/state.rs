//! Generator aggregate and bounded history
//!
//! All state that must survive the session lives here, as one explicit value
//! object owned by the session controller. The persistence and backup modules
//! read and replace it wholesale; nothing else mutates it.

use std::collections::VecDeque;

use crate::consts::MAX_HISTORY;

/// The persisted generator aggregate: seed, history, and generation counter.
///
/// `generation_count` never decreases; `history` is a sliding window of at
/// most [`MAX_HISTORY`] values, so the two diverge once eviction begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorState {
    /// Seed consumed by the next generation; `None` until first seeded.
    /// Advances by exactly 1 per generation.
    pub seed: Option<i64>,
    /// Generated values, oldest first.
    pub history: VecDeque<i64>,
    /// Total successful generations across all sessions.
    pub generation_count: u64,
}

impl GeneratorState {
    /// Fresh, never-seeded state (the default for absent storage keys)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generated value, evicting the single oldest entry when the
    /// window is full.
    pub fn push(&mut self, value: i64) {
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(value);
    }

    /// The last `n` values in generation order, for display.
    pub fn visible_tail(&self, n: usize) -> Vec<i64> {
        let start = self.history.len().saturating_sub(n);
        self.history.iter().skip(start).copied().collect()
    }

    /// True when nothing has ever been generated or restored - used at
    /// startup to detect fresh or wiped storage.
    pub fn is_empty(&self) -> bool {
        self.seed.is_none() && self.generation_count == 0 && self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bounded_sliding_window() {
        let mut state = GeneratorState::new();
        let extra = 7;
        for i in 0..(MAX_HISTORY + extra) as i64 {
            state.push(i);
        }
        assert_eq!(state.history.len(), MAX_HISTORY);
        // Window holds exactly the last MAX_HISTORY values, in order
        let expected: Vec<i64> = (extra as i64..(MAX_HISTORY + extra) as i64).collect();
        let actual: Vec<i64> = state.history.iter().copied().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_visible_tail_order_and_len() {
        let mut state = GeneratorState::new();
        for i in 0..25 {
            state.push(i);
        }
        assert_eq!(state.visible_tail(10), (15..25).collect::<Vec<_>>());
        // Asking for more than exists returns everything
        assert_eq!(state.visible_tail(100).len(), 25);
        assert!(state.history.len() == 25);
    }

    #[test]
    fn test_visible_tail_does_not_mutate() {
        let mut state = GeneratorState::new();
        state.push(1);
        state.push(2);
        let before = state.clone();
        let _ = state.visible_tail(1);
        assert_eq!(state, before);
    }

    #[test]
    fn test_is_empty_requires_all_three() {
        let mut state = GeneratorState::new();
        assert!(state.is_empty());

        state.seed = Some(1);
        assert!(!state.is_empty());

        let mut state = GeneratorState::new();
        state.generation_count = 1;
        assert!(!state.is_empty());

        let mut state = GeneratorState::new();
        state.push(42);
        assert!(!state.is_empty());
    }
}
