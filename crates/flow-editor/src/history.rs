//! Snapshot-based undo/redo.
//!
//! History is a linear list of content snapshots with a cursor. Each
//! recorded change captures the whole store; undo and redo move the cursor
//! and restore the snapshot it lands on. Recording after an undo drops the
//! redo tail.
//!
//! A snapshot identical to the one under the cursor is not recorded, so
//! selection-only changes and no-op batches never create entries.

use flow_core::model::EntityStore;
use flow_core::snapshot::Snapshot;
use std::collections::HashSet;

pub struct HistoryManager {
    snapshots: Vec<Snapshot>,
    /// Index of the snapshot matching the live store.
    index: usize,
    /// Maximum number of snapshots kept (oldest dropped first).
    limit: Option<usize>,
}

impl HistoryManager {
    /// Start history with `store` as the baseline. A baseline that cannot
    /// be encoded leaves history empty; the first successful record
    /// becomes the baseline instead.
    pub fn new(store: &EntityStore, limit: Option<usize>) -> Self {
        let snapshots = match Snapshot::capture(store) {
            Ok(snap) => vec![snap],
            Err(e) => {
                log::warn!("history baseline not recorded: {e}");
                Vec::new()
            }
        };
        Self {
            snapshots,
            index: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Record the current store content. Returns `false` when the content
    /// matches the current entry.
    pub fn snapshot(&mut self, store: &EntityStore) -> bool {
        let snap = match Snapshot::capture(store) {
            Ok(snap) => snap,
            Err(e) => {
                log::warn!("history entry not recorded: {e}");
                return false;
            }
        };
        if self.snapshots.get(self.index) == Some(&snap) {
            return false;
        }

        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snap);
        if let Some(limit) = self.limit
            && self.snapshots.len() > limit
        {
            let excess = self.snapshots.len() - limit;
            self.snapshots.drain(..excess);
        }
        self.index = self.snapshots.len() - 1;
        log::trace!("history: {} entries, at {}", self.snapshots.len(), self.index);
        true
    }

    /// Step back one entry and restore it into `store`.
    pub fn undo(&mut self, store: &mut EntityStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.restore(self.index - 1, store)
    }

    /// Step forward one entry and restore it into `store`.
    pub fn redo(&mut self, store: &mut EntityStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.restore(self.index + 1, store)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Replace `store` with entry `target`. Nothing is recorded here; the
    /// caller recomputes derived state without snapshotting.
    fn restore(&mut self, target: usize, store: &mut EntityStore) -> bool {
        match self.snapshots[target].restore() {
            Ok(mut fresh) => {
                carry_transient(store, &mut fresh);
                *store = fresh;
                self.index = target;
                true
            }
            Err(e) => {
                log::warn!("history entry {target} not restored: {e}");
                false
            }
        }
    }
}

/// Keep selection and computed curves for entities that survive a restore.
fn carry_transient(old: &EntityStore, fresh: &mut EntityStore) {
    let selected: HashSet<_> = old.selected_ids().into_iter().collect();
    for entity in fresh.iter_mut() {
        if selected.contains(&entity.id()) {
            entity.set_selected(true);
        }
    }
    for edge in fresh.edges_mut() {
        edge.curve = old.edge(edge.id).and_then(|e| e.curve);
    }
}
