use std::collections::VecDeque;

use crate::snapshot::Snapshot;

/// Default number of snapshots kept on the undo stack
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded snapshot history backing undo/redo.
///
/// The top of the undo stack is always the current surface state. Its
/// bottom entry is the floor that undo never pops; once more than
/// `capacity` states are committed the oldest are dropped, so the floor
/// moves up and the initial blank canvas is no longer reachable.
#[derive(Debug, Clone)]
pub struct History {
    /// Committed states, oldest first
    undo_stack: VecDeque<Snapshot>,
    /// Undone states, most recently undone last
    redo_stack: Vec<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Creates an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a new current state. Any redo states are dropped.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Step back one state and return the snapshot to restore.
    ///
    /// Returns `None` when only the floor remains.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        self.undo_stack.back()
    }

    /// Step forward again and return the snapshot to restore
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(next);
        self.undo_stack.back()
    }

    /// The snapshot matching the current surface, if any was committed
    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget every state
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: u8) -> Snapshot {
        Snapshot::from_bytes(vec![tag])
    }

    #[test]
    fn floor_is_never_popped() {
        let mut history = History::default();
        assert!(history.undo().is_none());

        history.commit(snap(0));
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn undo_returns_previous_state() {
        let mut history = History::default();
        history.commit(snap(0));
        history.commit(snap(1));

        assert_eq!(history.undo(), Some(&snap(0)));
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(&snap(1)));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn commit_clears_redo() {
        let mut history = History::default();
        history.commit(snap(0));
        history.commit(snap(1));
        history.undo();
        history.commit(snap(2));

        assert!(!history.can_redo());
        assert_eq!(history.current(), Some(&snap(2)));
        assert_eq!(history.undo(), Some(&snap(0)));
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut history = History::new(3);
        for tag in 0..5 {
            history.commit(snap(tag));
        }
        assert_eq!(history.undo_depth(), 3);
        assert_eq!(history.undo(), Some(&snap(3)));
        assert_eq!(history.undo(), Some(&snap(2)));
        // snap(2) is now the floor
        assert!(history.undo().is_none());
    }
}
