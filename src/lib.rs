//! page-reflow: pagination core for a paged rich-text editor
//!
//! This crate keeps a document split into pages of fixed size:
//! - Body content is collected, measured and packed into pages
//! - Oversized text blocks are split at word boundaries
//! - Carets and selections are carried across every reflow
//! - Boundary predicates tell navigation where pages and regions begin and end

pub mod config;
pub mod document;
pub mod editing;
pub mod error;
pub mod layout;
pub mod reflow;
pub mod undo;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmEditor;

// Re-export primary types
pub use config::{PaginationConfig, RemainderHeight};
pub use document::{
    Block, BlockAddress, BlockKind, Document, ListMarker, NodeType, Page, PageAttrs, Region,
    RegionKind, Schema,
};
pub use editing::{DeleteAction, Direction, EditorState, Origin, Selection, Transaction};
pub use error::{ReflowError, Result};
pub use layout::{
    FontMetrics, HeightProvider, LayoutConstraints, MetricsMeasurer, PackedLayout, PositionMap,
    TextMeasurer,
};
pub use reflow::{reflow_document, Paginator, Reflow, ReflowState};
pub use undo::UndoManager;

use editing::{backspace_action, delete_forward_action, move_horizontal};
use undo::Snapshot;

/// The main editor state combining all components
pub struct Editor<B = MetricsMeasurer> {
    state: EditorState,
    paginator: Paginator,
    backend: B,
    pub undo_manager: UndoManager,
}

impl Editor<MetricsMeasurer> {
    /// Create an editor measuring with the built-in font metrics
    pub fn new(config: PaginationConfig) -> Self {
        let backend = MetricsMeasurer::for_config(&config);
        Self::with_backend(config, backend)
    }

    /// Create an editor with initial text content
    pub fn with_text(text: &str, config: PaginationConfig) -> Self {
        let mut editor = Self::new(config);
        let blocks = text.split('\n').map(Block::paragraph).collect();
        editor.load(editor.blank_document(blocks));
        editor
    }
}

impl<B: HeightProvider + TextMeasurer> Editor<B> {
    pub fn with_backend(config: PaginationConfig, backend: B) -> Self {
        let doc = Document {
            pages: vec![Page::new(
                config.default_page.clone(),
                vec![Block::paragraph("")],
            )],
        };
        let mut editor = Self {
            state: EditorState::new(doc),
            paginator: Paginator::new(config, Schema::paged()),
            backend,
            undo_manager: UndoManager::new(100),
        };
        editor
            .paginator
            .notify_state_changed(&editor.state, Origin::User);
        editor
    }

    fn blank_document(&self, blocks: Vec<Block>) -> Document {
        Document {
            pages: vec![Page::new(
                self.paginator.config().default_page.clone(),
                blocks,
            )],
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.doc
    }

    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the document, dropping history; the next frame reflows it
    pub fn load(&mut self, doc: Document) {
        self.undo_manager.clear();
        let selection = Selection::at_start(&doc);
        self.state.set_doc(doc, selection);
        self.paginator
            .notify_state_changed(&self.state, Origin::User);
    }

    /// Replace the pagination configuration and reflow on the next frame
    pub fn set_config(&mut self, config: PaginationConfig) {
        self.paginator.set_config(config);
        self.paginator
            .notify_state_changed(&self.state, Origin::User);
    }

    fn commit_user_edit(&mut self, description: &str, doc: Document, selection: Selection) {
        let before = Snapshot::new(self.state.doc.clone(), self.state.selection);
        self.undo_manager
            .record(description, before, Snapshot::new(doc.clone(), selection));
        self.state.set_doc(doc, selection);
        self.paginator
            .notify_state_changed(&self.state, Origin::User);
    }

    /// Delete the selected content from `doc`, returning the caret.
    fn delete_selection(&self, doc: &mut Document) -> Result<usize> {
        match self.state.selection {
            Selection::Node { pos } => {
                let address = doc
                    .block_refs()
                    .iter()
                    .find(|r| r.pos == pos)
                    .map(|r| r.address);
                if let Some(address) = address {
                    doc.remove_block(address);
                }
                Ok(doc
                    .text_slot_at_or_after(pos)
                    .or_else(|| doc.text_slot_at_or_before(pos))
                    .unwrap_or(pos))
            }
            selection => {
                let (from, to) = selection.range();
                if from == to {
                    return Ok(from);
                }
                doc.delete_range(from, to)
            }
        }
    }

    /// Insert text at the caret; newlines split the block
    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        let mut doc = self.state.doc.clone();
        let mut caret = self.delete_selection(&mut doc)?;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                caret = doc.split_block(caret)?;
            }
            if !line.is_empty() {
                caret = doc.insert_text(caret, line)?;
            }
        }
        self.commit_user_edit("insert", doc, Selection::caret(caret));
        Ok(())
    }

    /// Split the block at the caret (Enter key)
    pub fn split_block(&mut self) -> Result<()> {
        let mut doc = self.state.doc.clone();
        let caret = self.delete_selection(&mut doc)?;
        let caret = doc.split_block(caret)?;
        self.commit_user_edit("split", doc, Selection::caret(caret));
        Ok(())
    }

    fn delete(&mut self, backward: bool) -> Result<bool> {
        let mut doc = self.state.doc.clone();
        if !self.state.selection.is_collapsed() {
            let caret = self.delete_selection(&mut doc)?;
            self.commit_user_edit("delete", doc, Selection::caret(caret));
            return Ok(true);
        }

        let pos = self.state.selection.head();
        let action = if backward {
            backspace_action(&doc, pos)
        } else {
            delete_forward_action(&doc, pos)
        };
        let caret = match action {
            DeleteAction::DeleteText { from, to } => {
                doc.delete_text(from, to)?;
                from
            }
            DeleteAction::JoinBlocks { first, second } => doc.join_blocks(first, second)?,
            DeleteAction::RemoveBlock(address) => {
                doc.remove_block(address);
                // an atom before the caret takes one position with it
                if backward {
                    pos - 1
                } else {
                    pos
                }
            }
            DeleteAction::Nothing => return Ok(false),
        };
        self.commit_user_edit("delete", doc, Selection::caret(caret));
        Ok(true)
    }

    /// Delete backward (backspace)
    pub fn delete_backward(&mut self) -> Result<bool> {
        self.delete(true)
    }

    /// Delete forward (delete key)
    pub fn delete_forward(&mut self) -> Result<bool> {
        self.delete(false)
    }

    /// Move the caret one grapheme, optionally extending the selection
    pub fn move_cursor(&mut self, direction: Direction, extend_selection: bool) {
        let anchor = self.state.selection.anchor();
        let head = move_horizontal(&self.state.doc, self.state.selection.head(), direction);
        self.state.selection = if extend_selection {
            Selection::text(anchor, head)
        } else {
            Selection::caret(head)
        };
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.state.selection = selection;
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_manager.undo() else {
            return false;
        };
        self.state.set_doc(snapshot.doc, snapshot.selection);
        self.paginator
            .notify_state_changed(&self.state, Origin::History);
        true
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.undo_manager.redo() else {
            return false;
        };
        self.state.set_doc(snapshot.doc, snapshot.selection);
        self.paginator
            .notify_state_changed(&self.state, Origin::History);
        true
    }

    /// Run a scheduled reflow and commit its result.
    ///
    /// Returns whether the state changed.
    pub fn run_frame(&mut self) -> bool {
        let Some(tr) = self
            .paginator
            .run_frame(&self.state, &self.backend, &self.backend)
        else {
            return false;
        };
        if !self.state.apply(tr) {
            return false;
        }
        self.paginator
            .notify_state_changed(&self.state, Origin::Pagination);
        true
    }

    /// Get body text, one line per block
    pub fn text(&self) -> String {
        self.state.doc.body_text()
    }

    /// Get total page count
    pub fn page_count(&self) -> usize {
        self.state.doc.page_count()
    }
}
