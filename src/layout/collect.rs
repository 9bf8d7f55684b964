//! Content collection: flatten the paged tree into body blocks

use std::ops::Range;

use crate::document::{Block, Document, RegionKind};

/// A body block and its absolute start position in the collected tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentEntry<'a> {
    pub block: &'a Block,
    pub pos: usize,
}

/// Content range of a header or footer region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmendmentSpan {
    pub page: usize,
    pub kind: RegionKind,
    /// Positions inside the region, both ends included as caret positions
    pub content: Range<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedContent<'a> {
    pub entries: Vec<ContentEntry<'a>>,
    pub amendments: Vec<AmendmentSpan>,
}

impl CollectedContent<'_> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collect body blocks in document order.
///
/// Header and footer regions only advance the running offset; their spans
/// are reported separately.
pub fn collect_content(doc: &Document) -> CollectedContent<'_> {
    let mut collected = CollectedContent::default();
    let mut page_offset = 0;

    for (page_index, page) in doc.pages.iter().enumerate() {
        let mut region_offset = page_offset + 1;
        for (kind, region) in page.regions() {
            let content_start = region_offset + 1;
            if kind.is_amendment() {
                collected.amendments.push(AmendmentSpan {
                    page: page_index,
                    kind,
                    content: content_start..content_start + region.content_size() + 1,
                });
            } else {
                let mut child_offset = content_start;
                for block in &region.blocks {
                    collected.entries.push(ContentEntry {
                        block,
                        pos: child_offset,
                    });
                    child_offset += block.node_size();
                }
            }
            region_offset += region.node_size();
        }
        page_offset += page.node_size();
    }

    collected
}
