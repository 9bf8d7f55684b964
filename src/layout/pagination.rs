//! Page packing: distribute body content over pages

use std::borrow::Cow;
use std::collections::VecDeque;

use crate::config::{PaginationConfig, RemainderHeight};
use crate::document::{Block, Document, Region, RegionKind, Schema};
use crate::error::{ReflowError, Result};
use crate::layout::collect::CollectedContent;
use crate::layout::measure::{valid_height, TextMeasurer};
use crate::layout::position_map::PositionMap;
use crate::layout::split::split_block;

/// A node waiting to be placed: an original body block or a split remainder
#[derive(Debug, Clone)]
struct WorkItem<'a> {
    block: Cow<'a, Block>,
    /// Start of the originating block in the tree being paginated
    original_pos: usize,
    /// Chars of the originating block already placed on earlier pages
    offset: usize,
    height: f32,
}

impl WorkItem<'_> {
    /// Position map key for this item
    fn key(&self) -> usize {
        if self.offset == 0 {
            self.original_pos
        } else {
            self.original_pos + self.offset + 1
        }
    }

    /// Anchor of the key within the placed block
    fn anchor(&self) -> usize {
        usize::from(self.offset > 0)
    }
}

/// Packed height of one page of the rebuilt tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSummary {
    pub height: f32,
    pub available: f32,
    /// The page holds a single node taller than its body
    pub overflow: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    pub splits: usize,
    pub overflows: usize,
}

/// Result of one packing pass
#[derive(Debug, Clone)]
pub struct PackedLayout {
    pub document: Document,
    pub position_map: PositionMap,
    pub pages: Vec<PageSummary>,
    pub stats: PackStats,
}

/// Body content of a page still being filled
#[derive(Debug, Default)]
struct OpenPage {
    blocks: Vec<Block>,
    height: f32,
    /// Size of `blocks` in tokens
    size: usize,
    /// (key, offset from the body content start)
    mapping: Vec<(usize, usize)>,
    overflow: bool,
}

impl OpenPage {
    fn place(&mut self, key: usize, anchor: usize, block: Block, height: f32) {
        self.mapping.push((key, self.size + anchor));
        self.size += block.node_size();
        self.height += height;
        self.blocks.push(block);
    }

    /// No placed block takes up height yet
    fn is_blank(&self) -> bool {
        self.height <= 0.0
    }
}

/// Packs collected body content into pages.
///
/// Page attributes and header/footer regions come from the page at the same
/// index of `previous`, falling back to the configuration and the schema.
pub struct Packer<'a, M: TextMeasurer + ?Sized> {
    config: &'a PaginationConfig,
    schema: &'a Schema,
    previous: &'a Document,
    measurer: &'a M,
}

impl<'a, M: TextMeasurer + ?Sized> Packer<'a, M> {
    pub fn new(
        config: &'a PaginationConfig,
        schema: &'a Schema,
        previous: &'a Document,
        measurer: &'a M,
    ) -> Self {
        Self {
            config,
            schema,
            previous,
            measurer,
        }
    }

    /// Available body height and width of page `index`
    fn body_area(&self, index: usize) -> (f32, f32) {
        let constraints = self.config.constraints_for(self.previous, index);
        (constraints.content_height(), constraints.content_width())
    }

    fn remainder_height(&self, block: &Block, width: f32) -> f32 {
        match self.config.remainder_height {
            RemainderHeight::Estimate => self.config.min_block_height,
            RemainderHeight::Measured => {
                valid_height(self.measurer.measure_text(&block.kind, &block.text, width))
                    .unwrap_or(self.config.min_block_height)
            }
        }
    }

    /// Pack `content` with one height per collected entry.
    ///
    /// A successful split always closes the page, full or not; the remainder
    /// opens the next one.
    pub fn pack(&self, content: &CollectedContent<'_>, heights: &[f32]) -> Result<PackedLayout> {
        self.schema
            .require_pagination(self.config.header_enabled, self.config.footer_enabled)?;
        if heights.len() != content.len() {
            return Err(ReflowError::Internal(format!(
                "{} heights for {} content nodes",
                heights.len(),
                content.len()
            )));
        }

        let mut queue: VecDeque<WorkItem<'_>> = content
            .entries
            .iter()
            .zip(heights)
            .map(|(entry, height)| WorkItem {
                block: Cow::Borrowed(entry.block),
                original_pos: entry.pos,
                offset: 0,
                height: *height,
            })
            .collect();

        let mut finished: Vec<(OpenPage, f32)> = Vec::new();
        let mut current = OpenPage::default();
        let (mut available, mut width) = self.body_area(0);
        let mut stats = PackStats::default();

        while let Some(item) = queue.pop_front() {
            if item.block.is_empty_text() {
                current.place(item.key(), item.anchor(), item.block.into_owned(), 0.0);
                continue;
            }

            if current.height + item.height <= available {
                let (key, anchor, height) = (item.key(), item.anchor(), item.height);
                current.place(key, anchor, item.block.into_owned(), height);
                continue;
            }

            let room = available - current.height;
            match split_block(&item.block, room, width, self.measurer) {
                Some(split) => {
                    stats.splits += 1;
                    current.place(item.key(), item.anchor(), split.fitting, split.fitting_height);
                    let remaining_height = self.remainder_height(&split.remaining, width);
                    queue.push_front(WorkItem {
                        block: Cow::Owned(split.remaining),
                        original_pos: item.original_pos,
                        offset: item.offset + split.consumed,
                        height: remaining_height,
                    });
                    self.finalize(&mut finished, &mut current, available);
                    (available, width) = self.body_area(finished.len());
                }
                None if current.is_blank() => {
                    tracing::warn!(
                        page = finished.len(),
                        height = item.height,
                        available,
                        "node taller than page body placed alone"
                    );
                    stats.overflows += 1;
                    current.overflow = true;
                    let (key, anchor, height) = (item.key(), item.anchor(), item.height);
                    current.place(key, anchor, item.block.into_owned(), height);
                }
                None => {
                    self.finalize(&mut finished, &mut current, available);
                    (available, width) = self.body_area(finished.len());
                    queue.push_front(item);
                }
            }
        }

        if !current.blocks.is_empty() || finished.is_empty() {
            self.finalize(&mut finished, &mut current, available);
        }

        self.build(content, finished, stats)
    }

    fn finalize(&self, finished: &mut Vec<(OpenPage, f32)>, current: &mut OpenPage, available: f32) {
        let page = std::mem::take(current);
        tracing::debug!(
            page = finished.len(),
            blocks = page.blocks.len(),
            height = page.height,
            available,
            "page finalized"
        );
        finished.push((page, available));
    }

    /// Region for a header or footer of page `index`
    fn amendment(&self, index: usize, kind: RegionKind, enabled: bool) -> Option<Region> {
        if !enabled {
            return None;
        }
        let reused = self
            .previous
            .pages
            .get(index)
            .and_then(|page| page.region(kind))
            .cloned();
        Some(reused.unwrap_or_else(|| self.schema.empty_amendment()))
    }

    fn build(
        &self,
        content: &CollectedContent<'_>,
        finished: Vec<(OpenPage, f32)>,
        stats: PackStats,
    ) -> Result<PackedLayout> {
        let mut pages = Vec::with_capacity(finished.len());
        let mut summaries = Vec::with_capacity(finished.len());
        let mut mappings = Vec::with_capacity(finished.len());

        for (index, (open, available)) in finished.into_iter().enumerate() {
            summaries.push(PageSummary {
                height: open.height,
                available,
                overflow: open.overflow,
            });
            mappings.push(open.mapping);
            pages.push(self.schema.page(
                self.config.page_attrs(self.previous, index),
                self.amendment(index, RegionKind::Header, self.config.header_enabled),
                open.blocks,
                self.amendment(index, RegionKind::Footer, self.config.footer_enabled),
            )?);
        }
        let document = Document { pages };

        let mut position_map = PositionMap::new();
        let mut page_start = 0;
        for (page, mapping) in document.pages.iter().zip(&mappings) {
            let body_offset = page
                .region_offset(RegionKind::Body)
                .ok_or_else(|| ReflowError::Internal("page without body".into()))?;
            let body_content = page_start + body_offset + 1;
            for (key, offset) in mapping {
                position_map.insert(*key, body_content + offset);
            }
            page_start += page.node_size();
        }

        for span in &content.amendments {
            let Some(old_page) = self.previous.pages.get(span.page) else {
                continue;
            };
            let (Some(page), Some(page_start)) =
                (document.pages.get(span.page), document.page_start(span.page))
            else {
                continue;
            };
            // Only regions carried over verbatim keep their content
            if page.region(span.kind) != old_page.region(span.kind) {
                continue;
            }
            if let Some(offset) = page.region_offset(span.kind) {
                position_map.insert_amendment(span.content.clone(), page_start + offset + 1);
            }
        }

        position_map.clamp(document.content_size());

        Ok(PackedLayout {
            document,
            position_map,
            pages: summaries,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockKind, Margins, NodeType, Page, PageAttrs, PaperSize};
    use crate::layout::collect::collect_content;

    fn small_page(height: f32) -> PageAttrs {
        PageAttrs {
            paper_size: PaperSize::Custom {
                width: 400.0,
                height,
            },
            margins: Margins::zero(),
            ..PageAttrs::default()
        }
    }

    fn config(height: f32) -> PaginationConfig {
        PaginationConfig {
            default_page: small_page(height),
            ..PaginationConfig::default()
        }
    }

    fn doc_of(height: f32, blocks: Vec<Block>) -> Document {
        Document {
            pages: vec![Page::new(small_page(height), blocks)],
        }
    }

    fn six_per_line(_: &BlockKind, text: &str, _: f32) -> Option<f32> {
        Some(text.chars().count().div_ceil(6).max(1) as f32 * 12.0)
    }

    fn pack_doc(
        doc: &Document,
        heights: &[f32],
        config: &PaginationConfig,
    ) -> Result<PackedLayout> {
        let schema = Schema::paged();
        let content = collect_content(doc);
        Packer::new(config, &schema, doc, &six_per_line).pack(&content, heights)
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.body.blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_twenty_paragraphs_four_pages() {
        let config = config(200.0);
        let blocks = (0..20).map(|i| Block::paragraph(format!("p{i}"))).collect();
        let doc = Document {
            pages: vec![Page::new(small_page(200.0), blocks)],
        };
        let packed = pack_doc(&doc, &[30.0; 20], &config).unwrap();

        let counts: Vec<_> = packed
            .document
            .pages
            .iter()
            .map(|p| p.body.blocks.len())
            .collect();
        assert_eq!(counts, vec![6, 6, 6, 2]);
        assert_eq!(packed.stats, PackStats::default());
        assert!(packed.pages.iter().all(|p| p.height <= p.available));
    }

    #[test]
    fn test_split_remainder_goes_to_next_page() {
        let config = config(20.0);
        let doc = doc_of(20.0, vec![Block::paragraph("alpha beta gamma delta")]);
        let packed = pack_doc(&doc, &[48.0], &config).unwrap();

        // the remainder is estimated at one minimum block height
        let pages = &packed.document.pages;
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["alpha"]);
        assert_eq!(texts(&pages[1]), vec!["beta gamma delta"]);
        assert_eq!(packed.stats.splits, 1);
    }

    #[test]
    fn test_split_closes_page_with_room_left() {
        let config = config(40.0);
        let doc = doc_of(
            40.0,
            vec![Block::paragraph("alpha beta gamma delta"), Block::paragraph("")],
        );
        let packed = pack_doc(&doc, &[48.0, 0.0], &config).unwrap();

        let pages = &packed.document.pages;
        assert_eq!(texts(&pages[0]), vec!["alpha beta gamma"]);
        assert_eq!(texts(&pages[1]), vec!["delta", ""]);
        assert!(packed.pages[0].height < packed.pages[0].available);
    }

    #[test]
    fn test_unsplittable_moves_to_next_page() {
        let config = config(100.0);
        let doc = doc_of(100.0, vec![
            Block::paragraph("intro"),
            Block::paragraph("abcdefghijklmnopqrstuvwx"),
        ]);
        let packed = pack_doc(&doc, &[50.0, 60.0], &config).unwrap();
        let pages = &packed.document.pages;
        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0]), vec!["intro"]);
        assert_eq!(texts(&pages[1]), vec!["abcdefghijklmnopqrstuvwx"]);
    }

    #[test]
    fn test_oversized_atom_is_accepted_overflow() {
        let config = config(100.0);
        let doc = doc_of(100.0, vec![
            Block::paragraph("before"),
            Block::image(500.0),
            Block::paragraph("after"),
        ]);
        let packed = pack_doc(&doc, &[20.0, 500.0, 20.0], &config).unwrap();
        assert_eq!(packed.document.page_count(), 3);
        assert!(packed.pages[1].overflow);
        assert_eq!(packed.stats.overflows, 1);
        assert_eq!(texts(&packed.document.pages[2]), vec!["after"]);
    }

    #[test]
    fn test_no_content_gives_one_empty_page() {
        let config = config(100.0);
        let doc = Document {
            pages: vec![Page::new(small_page(100.0), vec![])],
        };
        let packed = pack_doc(&doc, &[], &config).unwrap();
        assert_eq!(packed.document.page_count(), 1);
        assert!(packed.document.pages[0].body.blocks.is_empty());
        assert!(packed.position_map.is_empty());
    }

    #[test]
    fn test_empty_paragraphs_always_fit() {
        let config = config(40.0);
        let doc = doc_of(40.0, vec![
            Block::paragraph("one"),
            Block::paragraph(""),
            Block::paragraph(""),
            Block::paragraph("two"),
        ]);
        let packed = pack_doc(&doc, &[40.0, 20.0, 20.0, 40.0], &config).unwrap();
        let pages = &packed.document.pages;
        assert_eq!(texts(&pages[0]), vec!["one", "", ""]);
        assert_eq!(texts(&pages[1]), vec!["two"]);
    }

    #[test]
    fn test_position_map_across_pages() {
        let config = config(40.0);
        let doc = doc_of(40.0, vec![Block::paragraph("one"), Block::paragraph("two")]);
        let packed = pack_doc(&doc, &[40.0, 40.0], &config).unwrap();
        // old: "one" at 2, "two" at 7; new: page 2 body content at 9 + 2
        assert_eq!(packed.position_map.get(2), Some(2));
        assert_eq!(packed.position_map.get(7), Some(11));
        assert_eq!(packed.position_map.map(9), Some(13));
    }

    #[test]
    fn test_remainder_anchored_at_first_slot() {
        let config = config(20.0);
        let doc = doc_of(20.0, vec![Block::paragraph("alpha beta")]);
        let packed = pack_doc(&doc, &[24.0], &config).unwrap();
        let map = &packed.position_map;
        // old block at 2: caret 8 sits before the trimmed space
        assert_eq!(map.map(8), Some(8));
        // page 0 = 2 + body(2 + 7) = 11; "beta" at 13, first slot 14
        assert_eq!(map.get(9), Some(14));
        assert_eq!(map.map(13), Some(18));
    }

    #[test]
    fn test_measured_remainder_splits_in_one_pass() {
        let mut config = config(24.0);
        config.remainder_height = RemainderHeight::Measured;
        let doc = doc_of(
            24.0,
            vec![Block::paragraph("aaaa bbbb cccc dddd eeee ffff gggg hhhh")],
        );
        let packed = pack_doc(&doc, &[84.0], &config).unwrap();
        assert!(packed.pages.iter().all(|p| p.height <= p.available));
        assert_eq!(packed.document.page_count(), 4);
        let fragments: Vec<_> = packed.document.body_blocks().map(|b| b.text.as_str()).collect();
        assert_eq!(fragments.join(" "), "aaaa bbbb cccc dddd eeee ffff gggg hhhh");
    }

    #[test]
    fn test_amendments_reused_or_created() {
        let mut config = config(200.0);
        config.header_enabled = true;
        config.header_height = 50.0;
        let mut first = Page::new(small_page(200.0), vec![Block::paragraph("a")]);
        first.header = Some(Region::new(vec![Block::paragraph("Title")]));
        first.body.blocks.push(Block::paragraph("b"));
        let doc = Document { pages: vec![first] };

        let packed = pack_doc(&doc, &[100.0, 100.0], &config).unwrap();
        let pages = &packed.document.pages;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].header.as_ref().unwrap().blocks[0].text, "Title");
        assert_eq!(pages[1].header, Some(Schema::paged().empty_amendment()));
        assert!(pages[0].footer.is_none());
        // header content of page 0 keeps its place
        assert_eq!(packed.position_map.map(3), Some(3));
    }

    #[test]
    fn test_disabled_amendments_are_dropped() {
        let config = config(200.0);
        let mut page = Page::new(small_page(200.0), vec![Block::paragraph("a")]);
        page.footer = Some(Region::new(vec![Block::paragraph("foot")]));
        let doc = Document { pages: vec![page] };
        let packed = pack_doc(&doc, &[20.0], &config).unwrap();
        assert!(packed.document.pages[0].footer.is_none());
        assert!(packed.position_map.amendments().is_empty());
    }

    #[test]
    fn test_missing_schema_type_aborts() {
        let mut config = config(200.0);
        config.footer_enabled = true;
        let doc = Document::from_blocks(vec![Block::paragraph("a")]);
        let schema = Schema::paged().without(NodeType::Footer);
        let content = collect_content(&doc);
        let result = Packer::new(&config, &schema, &doc, &six_per_line).pack(&content, &[20.0]);
        assert!(matches!(result, Err(ReflowError::MissingNodeType(NodeType::Footer))));
    }

    #[test]
    fn test_height_count_mismatch() {
        let config = config(200.0);
        let doc = doc_of(200.0, vec![Block::paragraph("a")]);
        assert!(matches!(
            pack_doc(&doc, &[], &config),
            Err(ReflowError::Internal(_))
        ));
    }

    #[test]
    fn test_page_attrs_follow_index() {
        let config = config(60.0);
        let mut attrs = small_page(60.0);
        attrs.colour = "#abc".into();
        let doc = Document {
            pages: vec![Page::new(
                attrs.clone(),
                vec![Block::paragraph("a"), Block::paragraph("b")],
            )],
        };
        let packed = pack_doc(&doc, &[50.0, 50.0], &config).unwrap();
        assert_eq!(packed.document.pages[0].attrs, attrs);
        assert_eq!(packed.document.pages[1].attrs, config.default_page);
    }
}
