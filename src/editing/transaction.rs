//! Editor state and the atomic edits applied to it

use crate::document::Document;
use crate::editing::Selection;

/// Who produced a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    User,
    /// Undo or redo
    History,
    /// A reflow commit
    Pagination,
}

/// An atomic replace-and-reselect edit
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub origin: Origin,
    /// Replacement tree, `None` for a selection-only edit
    pub doc: Option<Document>,
    pub selection: Selection,
    /// Version of the state the edit was computed from
    pub base_version: u64,
}

impl Transaction {
    pub fn replace(doc: Document, selection: Selection, origin: Origin, base_version: u64) -> Self {
        Self {
            origin,
            doc: Some(doc),
            selection,
            base_version,
        }
    }

    pub fn select(selection: Selection, origin: Origin, base_version: u64) -> Self {
        Self {
            origin,
            doc: None,
            selection,
            base_version,
        }
    }

    pub fn changes_doc(&self) -> bool {
        self.doc.is_some()
    }
}

/// The document and selection, versioned by document changes
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub doc: Document,
    pub selection: Selection,
    /// Bumped on every change to `doc`
    pub version: u64,
}

impl EditorState {
    pub fn new(doc: Document) -> Self {
        let selection = Selection::at_start(&doc);
        Self {
            doc,
            selection,
            version: 0,
        }
    }

    /// Apply a transaction computed from this state.
    ///
    /// Transactions computed from an older version are dropped. Returns
    /// whether the transaction was applied.
    pub fn apply(&mut self, tr: Transaction) -> bool {
        if tr.base_version != self.version {
            tracing::debug!(
                base = tr.base_version,
                current = self.version,
                origin = ?tr.origin,
                "dropping stale transaction"
            );
            return false;
        }
        if let Some(doc) = tr.doc {
            if doc != self.doc {
                self.doc = doc;
                self.version += 1;
            }
        }
        self.selection = tr.selection;
        true
    }

    /// Replace the tree after an in-place edit, bumping the version when it changed
    pub fn set_doc(&mut self, doc: Document, selection: Selection) {
        if doc != self.doc {
            self.doc = doc;
            self.version += 1;
        }
        self.selection = selection;
    }
}
