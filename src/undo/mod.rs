//! Undo/Redo over document snapshots
//!
//! Only user edits are recorded. Pagination commits are derived from the
//! content and are recomputed after every undo or redo, so they never show
//! up in the history.

use crate::document::Document;
use crate::editing::Selection;

/// Document and selection at one point in the history
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub doc: Document,
    pub selection: Selection,
}

impl Snapshot {
    pub fn new(doc: Document, selection: Selection) -> Self {
        Self { doc, selection }
    }
}

/// A single undoable user edit
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Description of the operation
    pub description: String,
    pub before: Snapshot,
    pub after: Snapshot,
    /// Timestamp for grouping (milliseconds)
    pub timestamp: u64,
}

/// Undo/Redo manager
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum history depth
    max_depth: usize,
    /// Time window for merging consecutive typing (ms)
    merge_window_ms: u64,
}

impl UndoManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
            merge_window_ms: 500,
        }
    }

    /// Record a user edit that turned `before` into `after`
    pub fn record(&mut self, description: &str, before: Snapshot, after: Snapshot) {
        self.record_at(description, before, after, current_timestamp());
    }

    fn record_at(&mut self, description: &str, before: Snapshot, after: Snapshot, timestamp: u64) {
        if before.doc == after.doc {
            return;
        }
        self.redo_stack.clear();

        if let Some(last) = self.undo_stack.last_mut() {
            if last.description == description
                && description == "insert"
                && timestamp.saturating_sub(last.timestamp) <= self.merge_window_ms
                && last.after.doc == before.doc
            {
                last.after = after;
                last.timestamp = timestamp;
                return;
            }
        }

        self.undo_stack.push(HistoryEntry {
            description: description.to_string(),
            before,
            after,
            timestamp,
        });
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Step back, returning the snapshot to restore
    pub fn undo(&mut self) -> Option<Snapshot> {
        let entry = self.undo_stack.pop()?;
        let snapshot = entry.before.clone();
        self.redo_stack.push(entry);
        Some(snapshot)
    }

    /// Step forward again, returning the snapshot to restore
    pub fn redo(&mut self) -> Option<Snapshot> {
        let entry = self.redo_stack.pop()?;
        let snapshot = entry.after.clone();
        self.undo_stack.push(entry);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
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

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
