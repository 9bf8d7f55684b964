//! Reflow orchestration: when to paginate and how to commit the result

use crate::config::PaginationConfig;
use crate::document::{Document, Schema};
use crate::editing::{remap_selection, EditorState, Origin, Selection, Transaction};
use crate::error::Result;
use crate::layout::{block_height, collect_content, HeightProvider, PackedLayout, Packer, TextMeasurer};

/// Outcome of one collect, measure, pack and remap pass
#[derive(Debug, Clone)]
pub struct Reflow {
    pub layout: PackedLayout,
    pub selection: Selection,
}

impl Reflow {
    /// The edit that brings `state` in line with this reflow, if any
    pub fn into_transaction(self, state: &EditorState) -> Option<Transaction> {
        if self.layout.document != state.doc {
            Some(Transaction::replace(
                self.layout.document,
                self.selection,
                Origin::Pagination,
                state.version,
            ))
        } else if self.selection != state.selection {
            Some(Transaction::select(
                self.selection,
                Origin::Pagination,
                state.version,
            ))
        } else {
            None
        }
    }
}

/// Rebuild the page structure of `doc` and carry `selection` into it
pub fn reflow_document<H, M>(
    doc: &Document,
    selection: &Selection,
    config: &PaginationConfig,
    schema: &Schema,
    heights: &H,
    measurer: &M,
) -> Result<Reflow>
where
    H: HeightProvider + ?Sized,
    M: TextMeasurer + ?Sized,
{
    let content = collect_content(doc);
    let measured: Vec<f32> = content
        .entries
        .iter()
        .map(|entry| block_height(heights, entry.block, entry.pos, config.min_block_height))
        .collect();

    let layout = Packer::new(config, schema, doc, measurer).pack(&content, &measured)?;
    let selection = remap_selection(selection, &layout.position_map, &layout.document);

    tracing::debug!(
        nodes = content.len(),
        pages = layout.document.page_count(),
        splits = layout.stats.splits,
        overflows = layout.stats.overflows,
        "reflow complete"
    );
    Ok(Reflow { layout, selection })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflowState {
    #[default]
    Idle,
    /// A run is due on the next frame
    Scheduled,
    Paginating,
}

/// Resets the orchestrator to idle however a run ends
struct RunGuard<'a> {
    state: &'a mut ReflowState,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.state = ReflowState::Idle;
    }
}

/// Decides when to reflow and runs the pipeline at most once per frame.
///
/// The host reports every state change through [`Paginator::notify_state_changed`]
/// and calls [`Paginator::run_frame`] on its next animation frame.
#[derive(Debug)]
pub struct Paginator {
    config: PaginationConfig,
    schema: Schema,
    state: ReflowState,
    /// Document version of the last state seen by the paginator
    observed_version: Option<u64>,
    paginated_once: bool,
}

impl Paginator {
    pub fn new(config: PaginationConfig, schema: Schema) -> Self {
        Self {
            config,
            schema,
            state: ReflowState::Idle,
            observed_version: None,
            paginated_once: false,
        }
    }

    pub fn state(&self) -> ReflowState {
        self.state
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Replace the configuration; the next state change reflows
    pub fn set_config(&mut self, config: PaginationConfig) {
        self.config = config;
        self.observed_version = None;
        self.paginated_once = false;
    }

    /// Report a state change. Returns whether a run was scheduled by this call.
    pub fn notify_state_changed(&mut self, state: &EditorState, origin: Origin) -> bool {
        if self.state == ReflowState::Paginating {
            tracing::debug!(version = state.version, "state change during reflow ignored");
            return false;
        }
        if origin == Origin::Pagination {
            self.observed_version = Some(state.version);
            return false;
        }
        if self.observed_version == Some(state.version) {
            return false;
        }
        if self.paginated_once && state.doc.is_trivial() {
            tracing::debug!(version = state.version, "trivial document, reflow skipped");
            self.observed_version = Some(state.version);
            return false;
        }
        if self.state == ReflowState::Scheduled {
            return false;
        }

        self.state = ReflowState::Scheduled;
        true
    }

    /// Run a scheduled reflow against the current state.
    ///
    /// Returns the edit to commit, if the reflow changed anything. Errors are
    /// logged and leave the state untouched.
    pub fn run_frame<H, M>(
        &mut self,
        state: &EditorState,
        heights: &H,
        measurer: &M,
    ) -> Option<Transaction>
    where
        H: HeightProvider + ?Sized,
        M: TextMeasurer + ?Sized,
    {
        if self.state != ReflowState::Scheduled {
            return None;
        }
        let guard = RunGuard {
            state: &mut self.state,
        };
        *guard.state = ReflowState::Paginating;
        self.observed_version = Some(state.version);

        match reflow_document(
            &state.doc,
            &state.selection,
            &self.config,
            &self.schema,
            heights,
            measurer,
        ) {
            Ok(reflow) => {
                self.paginated_once = true;
                reflow.into_transaction(state)
            }
            Err(err) => {
                tracing::error!(error = %err, version = state.version, "reflow aborted");
                None
            }
        }
    }
}
