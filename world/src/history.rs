//! Bounded undo history.

use std::collections::VecDeque;

use tile_merge_core::Snapshot;

/// First-in first-out ring of snapshots with a fixed capacity.
#[derive(Clone, Debug)]
pub(crate) struct History {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl History {
    /// Creates an empty history that retains at most `capacity` snapshots.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a snapshot, evicting the oldest ones once the bound is reached.
    pub(crate) fn push(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }

        while self.snapshots.len() >= self.capacity {
            let _ = self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Removes and returns the most recent snapshot.
    pub(crate) fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.snapshots.clear();
    }
}
