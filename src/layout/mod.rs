//! Layout: measurement, splitting and page packing

mod collect;
pub mod font;
mod geometry;
mod line_break;
mod measure;
mod pagination;
mod position_map;
mod split;

pub use collect::{collect_content, AmendmentSpan, CollectedContent, ContentEntry};
pub use font::FontMetrics;
pub use geometry::LayoutConstraints;
pub use line_break::LineBreaker;
pub use measure::{
    block_height, valid_height, HeightProvider, MetricsMeasurer, TextMeasurer, INDENT_WIDTH,
};
pub use pagination::{PackStats, PackedLayout, Packer, PageSummary};
pub use position_map::{AmendmentMapping, PositionMap};
pub use split::{split_block, SplitResult};
