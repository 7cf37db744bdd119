//! Bounded undo/redo history of annotation states.
//!
//! The history is a linear log of snapshots plus a cursor. Each committed
//! edit drops whatever lies ahead of the cursor (the redo branch), appends a
//! copy of the new state and evicts the oldest snapshot once the log grows
//! past its capacity. Undo and redo only move the cursor.
//!
//! ```ignore
//! let mut history = History::new(&doc.annotations);
//!
//! // After each finished edit
//! history.commit(&doc.annotations);
//!
//! // Undo
//! if let Some(prev) = history.undo() {
//!     doc.annotations = prev;
//! }
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Number of snapshots kept when no other capacity is configured
pub const DEFAULT_CAPACITY: usize = 50;

/// Tunable history settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots retained, including the current one
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// A saved copy of the full record collection at one point in history
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    records: Vec<T>,
    committed_at: DateTime<Utc>,
}

impl<T: Clone> Snapshot<T> {
    fn capture(records: &[T]) -> Self {
        Self {
            records: records.to_vec(),
            committed_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    fn to_records(&self) -> Vec<T> {
        self.records.clone()
    }
}

/// Linear, capacity-bounded history with redo-branch discarding
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Oldest snapshot at the front, newest at the back.
    ///
    /// **Invariant**: never empty, and never longer than `capacity`.
    log: VecDeque<Snapshot<T>>,
    /// Index of the snapshot the caller is currently showing.
    ///
    /// **Invariant**: `cursor < log.len()`
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// Start a history seeded with `initial` and the default capacity
    pub fn new(initial: &[T]) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    /// Start a history seeded with `initial`. A capacity of zero is treated as one.
    pub fn with_config(initial: &[T], config: HistoryConfig) -> Self {
        let capacity = config.capacity.max(1);
        let mut log = VecDeque::with_capacity(capacity);
        log.push_back(Snapshot::capture(initial));
        Self {
            log,
            cursor: 0,
            capacity,
        }
    }

    /// Record `next` as the newest state, dropping any redo branch
    pub fn commit(&mut self, next: &[T]) {
        let discarded = self.log.len() - 1 - self.cursor;
        self.log.truncate(self.cursor + 1);
        self.log.push_back(Snapshot::capture(next));

        let mut evicted = 0;
        while self.log.len() > self.capacity {
            self.log.pop_front();
            evicted += 1;
        }

        self.cursor = self.log.len() - 1;
        debug!(
            records = next.len(),
            discarded,
            evicted,
            position = self.cursor,
            "Committed snapshot"
        );
    }

    /// Step back one snapshot and return a copy of it
    pub fn undo(&mut self) -> Option<Vec<T>> {
        if !self.can_undo() {
            trace!("Undo requested at oldest snapshot");
            return None;
        }
        self.cursor -= 1;
        trace!(position = self.cursor, "Undo");
        Some(self.current())
    }

    /// Step forward one snapshot and return a copy of it
    pub fn redo(&mut self) -> Option<Vec<T>> {
        if !self.can_redo() {
            trace!("Redo requested at newest snapshot");
            return None;
        }
        self.cursor += 1;
        trace!(position = self.cursor, "Redo");
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.log.len()
    }

    /// Copy of the state the caller should currently be displaying
    pub fn current(&self) -> Vec<T> {
        self.current_snapshot().to_records()
    }

    pub fn current_snapshot(&self) -> &Snapshot<T> {
        &self.log[self.cursor]
    }

    /// Number of snapshots held, including the current one
    pub fn snapshot_count(&self) -> usize {
        self.log.len()
    }

    /// Index of the current snapshot, 0 being the oldest retained
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.log.len() - 1 - self.cursor
    }
}
