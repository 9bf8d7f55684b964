//! Height measurement: the provider contracts and a metrics-based backend

use std::cell::RefCell;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use crate::config::PaginationConfig;
use crate::document::{Block, BlockKind};
use crate::layout::font::FontMetrics;
use crate::layout::line_break::LineBreaker;
use crate::layout::LayoutConstraints;

/// Indentation width per list level
pub const INDENT_WIDTH: f32 = 24.0;

/// Rendered height of a block sitting at a position of the current tree.
///
/// `None` means the block could not be measured; callers fall back to the
/// configured minimum block height.
pub trait HeightProvider {
    fn measure(&self, block: &Block, pos: usize) -> Option<f32>;
}

impl<F> HeightProvider for F
where
    F: Fn(&Block, usize) -> Option<f32>,
{
    fn measure(&self, block: &Block, pos: usize) -> Option<f32> {
        self(block, pos)
    }
}

/// Off-screen measurement of candidate text for a block kind
pub trait TextMeasurer {
    fn measure_text(&self, kind: &BlockKind, text: &str, width: f32) -> Option<f32>;
}

impl<F> TextMeasurer for F
where
    F: Fn(&BlockKind, &str, f32) -> Option<f32>,
{
    fn measure_text(&self, kind: &BlockKind, text: &str, width: f32) -> Option<f32> {
        self(kind, text, width)
    }
}

/// A usable height: positive and finite
pub fn valid_height(height: Option<f32>) -> Option<f32> {
    height.filter(|h| h.is_finite() && *h > 0.0)
}

/// Height the packer uses for a block, falling back to `min_block_height`
pub fn block_height<H: HeightProvider + ?Sized>(
    provider: &H,
    block: &Block,
    pos: usize,
    min_block_height: f32,
) -> f32 {
    match valid_height(provider.measure(block, pos)) {
        Some(height) => height,
        None => {
            tracing::debug!(pos, "unmeasurable block, using minimum height");
            min_block_height
        }
    }
}

/// Measures blocks from font metrics and line breaking, with a cache keyed
/// by content.
#[derive(Debug)]
pub struct MetricsMeasurer {
    metrics: FontMetrics,
    /// Body width used when measuring whole blocks
    width: f32,
    breaker: LineBreaker,
    cache: RefCell<FxHashMap<u64, f32>>,
}

impl MetricsMeasurer {
    pub fn new(metrics: FontMetrics, width: f32) -> Self {
        Self {
            metrics,
            width,
            breaker: LineBreaker::new(),
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Default metrics at the body width of the configured default page
    pub fn for_config(config: &PaginationConfig) -> Self {
        let constraints = LayoutConstraints::for_page(&config.default_page, config);
        Self::new(FontMetrics::default(), constraints.content_width())
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Height of `text` laid out as a block of `kind` at `width`
    pub fn text_height(&self, kind: &BlockKind, text: &str, width: f32) -> f32 {
        let line_height = self.metrics.line_height * kind.line_height_multiplier();
        let spacing = kind.spacing_after() * self.metrics.line_height;
        let effective_width = match kind {
            BlockKind::ListItem { indent_level, .. } => {
                width - (*indent_level as f32 + 1.0) * INDENT_WIDTH
            }
            _ => width,
        };

        let key = cache_key(text, effective_width, line_height, spacing);
        if let Some(height) = self.cache.borrow().get(&key) {
            return *height;
        }

        let lines = self
            .breaker
            .count_lines(text, effective_width.max(1.0), &self.metrics);
        let height = lines as f32 * line_height + spacing;
        self.cache.borrow_mut().insert(key, height);
        height
    }

    pub fn block_height(&self, block: &Block) -> f32 {
        let spacing = block.kind.spacing_after() * self.metrics.line_height;
        match block.kind {
            BlockKind::Image { height } => height + spacing,
            BlockKind::HorizontalRule => self.metrics.line_height + spacing,
            _ => self.text_height(&block.kind, &block.text, self.width),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}

fn cache_key(text: &str, width: f32, line_height: f32, spacing: f32) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    width.to_bits().hash(&mut hasher);
    line_height.to_bits().hash(&mut hasher);
    spacing.to_bits().hash(&mut hasher);
    hasher.finish()
}

impl HeightProvider for MetricsMeasurer {
    fn measure(&self, block: &Block, _pos: usize) -> Option<f32> {
        Some(self.block_height(block))
    }
}

impl TextMeasurer for MetricsMeasurer {
    fn measure_text(&self, kind: &BlockKind, text: &str, width: f32) -> Option<f32> {
        Some(self.text_height(kind, text, width))
    }
}
