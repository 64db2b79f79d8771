//! Bounded linear undo/redo over value snapshots.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_MAX_MEMORY;

/// Snapshots with a cursor. The visible state is always `snapshots[cursor]`.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    snapshots: VecDeque<T>,
    cursor: usize,
    max_memory: usize,
}

impl<T: Clone + PartialEq> HistoryBuffer<T> {
    /// History seeded with `initial`, keeping at most [`HISTORY_MAX_MEMORY`] snapshots.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_max_memory(initial, HISTORY_MAX_MEMORY)
    }

    /// `max_memory` below 1 is raised to 1.
    #[must_use]
    pub fn with_max_memory(initial: T, max_memory: usize) -> Self {
        Self { snapshots: VecDeque::from([initial]), cursor: 0, max_memory: max_memory.max(1) }
    }

    #[must_use]
    pub fn state(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Push `value` as the new current state.
    ///
    /// Equal to the current state: no-op. Otherwise any redo tail is dropped
    /// and the oldest snapshots are evicted past the memory bound.
    pub fn set_state(&mut self, value: T) {
        if *self.state() == value {
            return;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(value);
        while self.snapshots.len() > self.max_memory {
            self.snapshots.pop_front();
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step the cursor back by `steps`, stopping at the oldest snapshot.
    pub fn go_back(&mut self, steps: usize) -> &T {
        self.cursor = self.cursor.saturating_sub(steps);
        self.state()
    }

    /// Step the cursor forward by `steps`, stopping at the newest snapshot.
    pub fn go_forward(&mut self, steps: usize) -> &T {
        self.cursor = self.cursor.saturating_add(steps).min(self.snapshots.len() - 1);
        self.state()
    }

    /// Forget everything and start over from `initial`.
    pub fn reset_state(&mut self, initial: T) {
        self.snapshots.clear();
        self.snapshots.push_back(initial);
        self.cursor = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: a history always holds its current state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }
}
