//! # Snapshot History
//!
//! Linear undo/redo over whole-state snapshots.
//!
//! ## Design
//!
//! - Entry 0 is the state the editor was opened with
//! - `capture` ignores a state equal to the entry at the pointer
//! - Capturing after an undo discards the undone entries (no branches)
//! - The oldest entry is evicted once `max_entries` is exceeded
//! - `undo`/`redo` only move the pointer; callers copy the returned
//!   snapshot into live state, so restored data never aliases history
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(state.clone());
//! state.push(block);
//! history.capture(state.clone());
//!
//! if let Some(previous) = history.undo() {
//!     state = previous.clone();
//! }
//! ```

/// Bounded, index-addressed snapshot stack
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,

    /// Position of the snapshot matching live state
    index: usize,

    /// Maximum number of entries kept (0 = unlimited)
    max_entries: usize,
}

impl<T: Clone + PartialEq> History<T> {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    /// Create a history seeded with `initial`, capped at 100 entries
    pub fn new(initial: T) -> Self {
        Self::with_max_entries(initial, Self::DEFAULT_MAX_ENTRIES)
    }

    /// Create a history with a custom cap
    pub fn with_max_entries(initial: T, max_entries: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            max_entries,
        }
    }

    /// Record a snapshot; returns false if it matched the current entry
    pub fn capture(&mut self, state: T) -> bool {
        if self.entries.get(self.index) == Some(&state) {
            return false;
        }

        // New edit invalidates the redo branch
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        self.index = self.entries.len() - 1;

        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            self.entries.remove(0);
            self.index -= 1;
        }

        true
    }

    /// Step back; returns the snapshot to restore
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward; returns the snapshot to restore
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Snapshot at the pointer
    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its seed entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Apply `update` to every entry, keeping the pointer where it is
    pub fn update_entries(&mut self, mut update: impl FnMut(&mut T)) {
        for entry in &mut self.entries {
            update(entry);
        }
    }

    /// Drop every entry and start over from `initial`
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push(initial);
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_creation() {
        let history = History::new(0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(*history.current(), 0);
    }

    #[test]
    fn test_identical_capture_is_ignored() {
        let mut history = History::new(vec![1]);
        assert!(!history.capture(vec![1]));
        assert!(history.capture(vec![1, 2]));
        assert!(!history.capture(vec![1, 2]));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new("a");
        history.capture("b");
        history.capture("c");

        assert_eq!(history.undo(), Some(&"b"));
        assert_eq!(history.undo(), Some(&"a"));
        assert_eq!(history.undo(), None);
        assert!(history.can_redo());

        assert_eq!(history.redo(), Some(&"b"));
        assert_eq!(history.redo(), Some(&"c"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_capture_after_undo_discards_future() {
        let mut history = History::new(0);
        for i in 1..=5 {
            history.capture(i);
        }
        for _ in 0..3 {
            history.undo();
        }
        assert_eq!(*history.current(), 2);

        history.capture(42);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 4);
        assert_eq!(history.undo(), Some(&2));
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let mut history = History::new(0);
        for i in 1..=150 {
            history.capture(i);
        }

        assert_eq!(history.len(), 100);
        assert_eq!(history.index(), 99);

        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, 99);
        assert_eq!(*history.current(), 51);
    }

    #[test]
    fn test_unlimited_history() {
        let mut history = History::with_max_entries(0, 0);
        for i in 1..=300 {
            history.capture(i);
        }
        assert_eq!(history.len(), 301);
    }

    #[test]
    fn test_update_entries_keeps_pointer() {
        let mut history = History::new(1);
        history.capture(2);
        history.capture(3);
        history.undo();

        history.update_entries(|entry| *entry *= 10);
        assert_eq!(history.index(), 1);
        assert_eq!(*history.current(), 20);
        assert_eq!(history.redo(), Some(&30));
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(1);
        history.capture(2);
        history.reset(7);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), 7);
        assert!(!history.can_undo());
    }
}
