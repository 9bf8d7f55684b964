//! Selections over absolute positions

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A text range (possibly collapsed to a caret) or a selected atom block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    Text { anchor: usize, head: usize },
    /// `pos` is the start of the selected block
    Node { pos: usize },
}

impl Selection {
    pub fn caret(pos: usize) -> Self {
        Selection::Text {
            anchor: pos,
            head: pos,
        }
    }

    pub fn text(anchor: usize, head: usize) -> Self {
        Selection::Text { anchor, head }
    }

    pub fn node(pos: usize) -> Self {
        Selection::Node { pos }
    }

    /// Caret at the first text slot of the document
    pub fn at_start(doc: &Document) -> Self {
        Self::caret(doc.first_text_slot().unwrap_or(0))
    }

    /// Caret at the last text slot of the document
    pub fn at_end(doc: &Document) -> Self {
        Self::caret(doc.last_text_slot().unwrap_or_else(|| doc.content_size()))
    }

    pub fn anchor(&self) -> usize {
        match *self {
            Selection::Text { anchor, .. } => anchor,
            Selection::Node { pos } => pos,
        }
    }

    pub fn head(&self) -> usize {
        match *self {
            Selection::Text { head, .. } => head,
            Selection::Node { pos } => pos + 1,
        }
    }

    /// Start and end, ordered
    pub fn range(&self) -> (usize, usize) {
        let (a, h) = (self.anchor(), self.head());
        (a.min(h), a.max(h))
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, Selection::Text { anchor, head } if anchor == head)
    }
}
