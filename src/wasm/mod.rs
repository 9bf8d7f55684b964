//! WASM bindings for the editor
//!
//! Documents, selections and configuration cross the boundary as JSON.
//! Heights come from two JS callbacks so the host can measure with the DOM.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::PaginationConfig;
use crate::document::{Block, BlockKind, Document};
use crate::editing::{boundary, Direction, Selection};
use crate::layout::{HeightProvider, TextMeasurer};
use crate::Editor;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Measurement callbacks supplied by the host page.
///
/// `height_fn(blockJson, pos)` returns the rendered height of a block,
/// `text_fn(kindJson, text, width)` the height of candidate text laid out
/// off-screen. Anything that is not a number counts as unmeasurable.
pub struct JsBackend {
    height_fn: js_sys::Function,
    text_fn: js_sys::Function,
}

impl JsBackend {
    pub fn new(height_fn: js_sys::Function, text_fn: js_sys::Function) -> Self {
        Self { height_fn, text_fn }
    }
}

fn json_arg<T: Serialize + ?Sized>(value: &T) -> Option<JsValue> {
    serde_json::to_string(value)
        .ok()
        .map(|json| JsValue::from_str(&json))
}

impl HeightProvider for JsBackend {
    fn measure(&self, block: &Block, pos: usize) -> Option<f32> {
        let block = json_arg(block)?;
        self.height_fn
            .call2(&JsValue::NULL, &block, &JsValue::from_f64(pos as f64))
            .ok()?
            .as_f64()
            .map(|h| h as f32)
    }
}

impl TextMeasurer for JsBackend {
    fn measure_text(&self, kind: &BlockKind, text: &str, width: f32) -> Option<f32> {
        let kind = json_arg(kind)?;
        self.text_fn
            .call3(
                &JsValue::NULL,
                &kind,
                &JsValue::from_str(text),
                &JsValue::from_f64(width as f64),
            )
            .ok()?
            .as_f64()
            .map(|h| h as f32)
    }
}

/// WASM-exposed editor wrapper
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor<JsBackend>,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor; `config_json` may be empty for the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        height_fn: js_sys::Function,
        text_fn: js_sys::Function,
    ) -> Result<WasmEditor, JsValue> {
        let config = if config_json.trim().is_empty() {
            PaginationConfig::default()
        } else {
            PaginationConfig::from_json(config_json).map_err(to_js_error)?
        };
        Ok(Self {
            editor: Editor::with_backend(config, JsBackend::new(height_fn, text_fn)),
        })
    }

    /// Replace the document with a serialized one
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, json: &str) -> Result<(), JsValue> {
        let doc = Document::from_json(json).map_err(to_js_error)?;
        self.editor.load(doc);
        Ok(())
    }

    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<String, JsValue> {
        self.editor.document().to_json().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config = PaginationConfig::from_json(json).map_err(to_js_error)?;
        self.editor.set_config(config);
        Ok(())
    }

    /// Run a scheduled reflow; call from `requestAnimationFrame`
    #[wasm_bindgen(js_name = runFrame)]
    pub fn run_frame(&mut self) -> bool {
        self.editor.run_frame()
    }

    /// Whether a reflow is waiting for the next frame
    #[wasm_bindgen(js_name = isReflowScheduled)]
    pub fn is_reflow_scheduled(&self) -> bool {
        self.editor.paginator().state() == crate::ReflowState::Scheduled
    }

    /// Insert text at current cursor position
    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.editor.insert_text(text).map_err(to_js_error)
    }

    /// Insert a new paragraph (Enter key)
    #[wasm_bindgen(js_name = insertParagraph)]
    pub fn insert_paragraph(&mut self) -> Result<(), JsValue> {
        self.editor.split_block().map_err(to_js_error)
    }

    /// Delete backward (backspace)
    #[wasm_bindgen(js_name = deleteBackward)]
    pub fn delete_backward(&mut self) -> Result<bool, JsValue> {
        self.editor.delete_backward().map_err(to_js_error)
    }

    /// Delete forward (delete key)
    #[wasm_bindgen(js_name = deleteForward)]
    pub fn delete_forward(&mut self) -> Result<bool, JsValue> {
        self.editor.delete_forward().map_err(to_js_error)
    }

    /// Move cursor; negative is backward
    #[wasm_bindgen(js_name = moveCursor)]
    pub fn move_cursor(&mut self, horizontal: i32, extend_selection: bool) {
        let direction = if horizontal < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        for _ in 0..horizontal.unsigned_abs() {
            self.editor.move_cursor(direction, extend_selection);
        }
    }

    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.selection()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, json: &str) -> Result<(), JsValue> {
        let selection: Selection = serde_json::from_str(json).map_err(to_js_error)?;
        self.editor.set_selection(selection);
        Ok(())
    }

    /// Undo last operation
    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Redo last undone operation
    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// Get body text, one line per block
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.editor.text()
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.editor.page_count()
    }

    #[wasm_bindgen(js_name = isPosAtStartOfBody)]
    pub fn is_pos_at_start_of_body(&self, pos: usize, exact: bool) -> bool {
        boundary::is_pos_at_start_of_body(self.editor.document(), pos, exact)
    }

    #[wasm_bindgen(js_name = isPosAtEndOfBody)]
    pub fn is_pos_at_end_of_body(&self, pos: usize, exact: bool) -> bool {
        boundary::is_pos_at_end_of_body(self.editor.document(), pos, exact)
    }

    #[wasm_bindgen(js_name = isPosAtStartOfPage)]
    pub fn is_pos_at_start_of_page(&self, pos: usize, exact: bool) -> bool {
        boundary::is_pos_at_start_of_page(self.editor.document(), pos, exact)
    }

    #[wasm_bindgen(js_name = isPosAtEndOfPage)]
    pub fn is_pos_at_end_of_page(&self, pos: usize, exact: bool) -> bool {
        boundary::is_pos_at_end_of_page(self.editor.document(), pos, exact)
    }

    #[wasm_bindgen(js_name = isPosAtStartOfPageAmendment)]
    pub fn is_pos_at_start_of_page_amendment(&self, pos: usize, exact: bool) -> bool {
        boundary::is_pos_at_start_of_page_amendment(self.editor.document(), pos, exact)
    }

    #[wasm_bindgen(js_name = isPosAtEndOfPageAmendment)]
    pub fn is_pos_at_end_of_page_amendment(&self, pos: usize, exact: bool) -> bool {
        boundary::is_pos_at_end_of_page_amendment(self.editor.document(), pos, exact)
    }
}
