//! Position resolution into an explicit page/region/block path

use smallvec::SmallVec;

use crate::document::{BlockAddress, Document, NodeType, RegionKind};
use crate::error::{ReflowError, Result};

/// One container on the path from the document root to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeType,
    /// Index of this node within its parent
    pub index: usize,
    /// Position of the node's opening token
    pub start: usize,
    pub size: usize,
}

impl PathStep {
    /// First position inside the node
    pub fn content_start(&self) -> usize {
        self.start + 1
    }

    /// Last position inside the node
    pub fn content_end(&self) -> usize {
        self.start + self.size - 1
    }
}

/// A position together with the containers that strictly enclose it.
///
/// Depth 0 is the document itself; depth 1 a page, 2 a region, 3 a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    path: SmallVec<[PathStep; 3]>,
}

impl ResolvedPos {
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    pub fn page(&self) -> Option<&PathStep> {
        self.path.first()
    }

    pub fn page_index(&self) -> Option<usize> {
        self.page().map(|s| s.index)
    }

    pub fn region(&self) -> Option<&PathStep> {
        self.path.get(1)
    }

    pub fn region_kind(&self) -> Option<RegionKind> {
        self.region().and_then(|s| RegionKind::from_node_type(s.node))
    }

    /// The innermost block; only text blocks can enclose a position
    pub fn block(&self) -> Option<&PathStep> {
        self.path.get(2)
    }

    pub fn address(&self) -> Option<BlockAddress> {
        Some(BlockAddress {
            page: self.page_index()?,
            region: self.region_kind()?,
            index: self.block()?.index,
        })
    }

    /// Whether the position is a caret slot inside a text block
    pub fn in_text_block(&self) -> bool {
        self.block().is_some()
    }

    /// Offset from the start of the innermost container's content
    pub fn parent_offset(&self) -> usize {
        match self.path.last() {
            Some(step) => self.pos - step.content_start(),
            None => self.pos,
        }
    }
}

impl Document {
    /// Resolve a position into the path of containers enclosing it
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos> {
        let size = self.content_size();
        if pos > size {
            return Err(ReflowError::PositionOutOfRange { pos, size });
        }

        let mut path = SmallVec::new();
        let mut page_start = 0;
        for (page_index, page) in self.pages.iter().enumerate() {
            let page_size = page.node_size();
            if pos > page_start && pos < page_start + page_size {
                path.push(PathStep {
                    node: NodeType::Page,
                    index: page_index,
                    start: page_start,
                    size: page_size,
                });
                let mut region_start = page_start + 1;
                for (region_index, (kind, region)) in page.regions().enumerate() {
                    let region_size = region.node_size();
                    if pos > region_start && pos < region_start + region_size {
                        path.push(PathStep {
                            node: kind.node_type(),
                            index: region_index,
                            start: region_start,
                            size: region_size,
                        });
                        let mut block_start = region_start + 1;
                        for (block_index, block) in region.blocks.iter().enumerate() {
                            let block_size = block.node_size();
                            if pos > block_start && pos < block_start + block_size {
                                path.push(PathStep {
                                    node: block.kind.node_type(),
                                    index: block_index,
                                    start: block_start,
                                    size: block_size,
                                });
                                break;
                            }
                            block_start += block_size;
                        }
                        break;
                    }
                    region_start += region_size;
                }
                break;
            }
            page_start += page_size;
        }

        Ok(ResolvedPos { pos, path })
    }

    /// Whether a caret can sit at `pos`
    pub fn is_text_slot(&self, pos: usize) -> bool {
        self.resolve(pos).map(|r| r.in_text_block()).unwrap_or(false)
    }

    pub fn first_text_slot(&self) -> Option<usize> {
        self.block_refs().iter().find_map(|r| r.first_slot())
    }

    pub fn last_text_slot(&self) -> Option<usize> {
        self.block_refs().iter().rev().find_map(|r| r.last_slot())
    }

    /// Nearest caret slot at or after `pos`
    pub fn text_slot_at_or_after(&self, pos: usize) -> Option<usize> {
        self.block_refs().iter().find_map(|r| {
            let (first, last) = (r.first_slot()?, r.last_slot()?);
            (last >= pos).then(|| pos.max(first))
        })
    }

    /// Nearest caret slot at or before `pos`
    pub fn text_slot_at_or_before(&self, pos: usize) -> Option<usize> {
        self.block_refs().iter().rev().find_map(|r| {
            let (first, last) = (r.first_slot()?, r.last_slot()?);
            (first <= pos).then(|| pos.min(last))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Page, PageAttrs, Region};

    fn doc() -> Document {
        // page 0 [0..13): header "h" at 2, body "ab" at 7
        // page 1 [13..23): body hr at 15, "cde" at 16
        let mut first = Page::new(PageAttrs::default(), vec![Block::paragraph("ab")]);
        first.header = Some(Region::new(vec![Block::paragraph("h")]));
        let second = Page::new(
            PageAttrs::default(),
            vec![Block::horizontal_rule(), Block::paragraph("cde")],
        );
        Document {
            pages: vec![first, second],
        }
    }

    #[test]
    fn test_resolve_inside_text() {
        let doc = doc();
        let resolved = doc.resolve(9).unwrap();
        assert_eq!(resolved.depth(), 3);
        assert_eq!(resolved.page_index(), Some(0));
        assert_eq!(resolved.region_kind(), Some(RegionKind::Body));
        assert_eq!(resolved.parent_offset(), 1);
        assert!(resolved.in_text_block());
        assert_eq!(
            resolved.address(),
            Some(BlockAddress {
                page: 0,
                region: RegionKind::Body,
                index: 0
            })
        );
    }

    #[test]
    fn test_resolve_between_nodes() {
        let doc = doc();
        // between the header and body regions
        let resolved = doc.resolve(6).unwrap();
        assert_eq!(resolved.depth(), 1);
        assert!(!resolved.in_text_block());
        // between pages
        assert_eq!(doc.resolve(13).unwrap().depth(), 0);
        // before the atom in page 1's body
        let resolved = doc.resolve(15).unwrap();
        assert_eq!(resolved.region_kind(), Some(RegionKind::Body));
        assert_eq!(resolved.depth(), 2);
    }

    #[test]
    fn test_resolve_out_of_range() {
        let doc = doc();
        assert!(doc.resolve(23).is_ok());
        assert!(matches!(
            doc.resolve(24),
            Err(ReflowError::PositionOutOfRange { pos: 24, size: 23 })
        ));
    }

    #[test]
    fn test_text_slots() {
        let doc = doc();
        assert_eq!(doc.first_text_slot(), Some(3));
        assert_eq!(doc.last_text_slot(), Some(20));
        assert!(doc.is_text_slot(8));
        assert!(!doc.is_text_slot(15));
        assert_eq!(doc.text_slot_at_or_after(11), Some(17));
        assert_eq!(doc.text_slot_at_or_before(11), Some(10));
        assert_eq!(doc.text_slot_at_or_after(21), None);
        assert_eq!(doc.text_slot_at_or_before(1), None);
    }
}
