//! In-place text edits on the tree

use crate::document::{Block, BlockAddress, BlockKind, Document};
use crate::error::{ReflowError, Result};

/// A caret slot resolved to its block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLocation {
    pub address: BlockAddress,
    pub block_start: usize,
    /// Char offset within the block's text
    pub offset: usize,
}

impl Document {
    /// Locate the text block holding the caret slot `pos`
    pub fn locate_text(&self, pos: usize) -> Result<TextLocation> {
        let resolved = self.resolve(pos)?;
        let address = resolved.address().ok_or(ReflowError::NotInTextBlock(pos))?;
        let block = resolved.block().ok_or(ReflowError::NotInTextBlock(pos))?;
        Ok(TextLocation {
            address,
            block_start: block.start,
            offset: pos - block.content_start(),
        })
    }

    fn text_block_mut(&mut self, address: BlockAddress) -> Result<&mut Block> {
        self.block_mut(address)
            .ok_or_else(|| ReflowError::Internal(format!("no block at {address:?}")))
    }

    /// Insert text at a caret slot, returning the caret after the insertion
    pub fn insert_text(&mut self, pos: usize, text: &str) -> Result<usize> {
        let location = self.locate_text(pos)?;
        let block = self.text_block_mut(location.address)?;
        let at = block.byte_index(location.offset);
        block.text.insert_str(at, text);
        Ok(pos + text.chars().count())
    }

    /// Delete the text between two caret slots of the same block
    pub fn delete_text(&mut self, from: usize, to: usize) -> Result<()> {
        let (from, to) = (from.min(to), from.max(to));
        let start = self.locate_text(from)?;
        let end = self.locate_text(to)?;
        if start.address != end.address {
            return Err(ReflowError::NotInTextBlock(to));
        }
        let block = self.text_block_mut(start.address)?;
        let range = block.byte_index(start.offset)..block.byte_index(end.offset);
        block.text.replace_range(range, "");
        Ok(())
    }

    /// Delete everything between two caret slots, joining the edge blocks.
    ///
    /// Blocks strictly between the edges are removed. A range that leaves a
    /// header or footer, or spans two regions, is rejected. Returns the caret
    /// at the start of the deleted range.
    pub fn delete_range(&mut self, from: usize, to: usize) -> Result<usize> {
        let (from, to) = (from.min(to), from.max(to));
        let start = self.locate_text(from)?;
        let end = self.locate_text(to)?;
        if start.address == end.address {
            self.delete_text(from, to)?;
            return Ok(from);
        }
        let (first, last) = (start.address, end.address);
        if first.region != last.region || (first.region.is_amendment() && first.page != last.page) {
            return Err(ReflowError::NotInTextBlock(to));
        }

        let between: Vec<BlockAddress> = self
            .block_refs()
            .iter()
            .filter(|r| {
                r.address.region == first.region
                    && r.pos > start.block_start
                    && r.pos < end.block_start
            })
            .map(|r| r.address)
            .collect();

        let tail = self.text_block_mut(last)?;
        let cut = tail.byte_index(end.offset);
        tail.text.replace_range(..cut, "");
        let head = self.text_block_mut(first)?;
        let cut = head.byte_index(start.offset);
        head.text.truncate(cut);

        for address in between.iter().rev() {
            self.remove_block(*address);
        }
        let shifted = between
            .iter()
            .filter(|a| a.page == last.page && a.region == last.region)
            .count();
        let last = BlockAddress {
            index: last.index - shifted,
            ..last
        };

        self.join_blocks(first, last)
    }

    /// Split a text block at the caret, returning the caret in the new block.
    ///
    /// Headings continue as paragraphs; other kinds keep their kind.
    pub fn split_block(&mut self, pos: usize) -> Result<usize> {
        let location = self.locate_text(pos)?;
        let block = self.text_block_mut(location.address)?;
        let at = block.byte_index(location.offset);
        let tail = block.text.split_off(at);
        let kind = match &block.kind {
            BlockKind::Heading { .. } => BlockKind::Paragraph,
            other => other.clone(),
        };

        let address = location.address;
        let region = self
            .pages
            .get_mut(address.page)
            .and_then(|p| p.region_mut(address.region))
            .ok_or_else(|| ReflowError::Internal(format!("no region at {address:?}")))?;
        region.blocks.insert(address.index + 1, Block::new(kind, tail));

        // close the old block, open the new one
        Ok(pos + 2)
    }

    /// Append the text of `second` to `first` and remove `second`.
    ///
    /// Returns the caret at the join point. `first` must precede `second`.
    pub fn join_blocks(&mut self, first: BlockAddress, second: BlockAddress) -> Result<usize> {
        let first_start = self
            .block_start(first)
            .ok_or_else(|| ReflowError::Internal(format!("no block at {first:?}")))?;
        let second_start = self
            .block_start(second)
            .ok_or_else(|| ReflowError::Internal(format!("no block at {second:?}")))?;
        if second_start <= first_start {
            return Err(ReflowError::Internal(format!(
                "cannot join {second:?} into later block {first:?}"
            )));
        }

        let head = self.text_block_mut(first)?;
        if !head.is_text_bearing() {
            return Err(ReflowError::NotInTextBlock(first_start));
        }
        let caret = first_start + 1 + head.char_len();

        if !self.block(second).is_some_and(Block::is_text_bearing) {
            return Err(ReflowError::NotInTextBlock(second_start));
        }
        let tail = self
            .remove_block(second)
            .ok_or_else(|| ReflowError::Internal(format!("no block at {second:?}")))?;
        self.text_block_mut(first)?.text.push_str(&tail.text);
        Ok(caret)
    }

    /// Remove a block, leaving its region possibly empty
    pub fn remove_block(&mut self, address: BlockAddress) -> Option<Block> {
        let region = self.pages.get_mut(address.page)?.region_mut(address.region)?;
        (address.index < region.blocks.len()).then(|| region.blocks.remove(address.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Page, PageAttrs, RegionKind};

    fn body(page: usize, index: usize) -> BlockAddress {
        BlockAddress {
            page,
            region: RegionKind::Body,
            index,
        }
    }

    #[test]
    fn test_insert_text() {
        let mut doc = Document::from_text("Hello");
        // page(1) + body(1) + paragraph(1) => text starts at 3
        let caret = doc.insert_text(8, ", World").unwrap();
        assert_eq!(doc.body_text(), "Hello, World");
        assert_eq!(caret, 15);
    }

    #[test]
    fn test_insert_outside_text_block() {
        let mut doc = Document::from_text("Hello");
        assert!(matches!(
            doc.insert_text(1, "x"),
            Err(ReflowError::NotInTextBlock(1))
        ));
    }

    #[test]
    fn test_delete_text() {
        let mut doc = Document::from_text("Hello World");
        doc.delete_text(8, 14).unwrap();
        assert_eq!(doc.body_text(), "Hello");
    }

    #[test]
    fn test_delete_across_blocks_rejected() {
        let mut doc = Document::from_text("ab\ncd");
        assert!(doc.delete_text(4, 8).is_err());
    }

    #[test]
    fn test_delete_range_joins_edge_blocks() {
        // "ab"@2, "cd"@6, "ef"@10: from after 'a' to before 'f'
        let mut doc = Document::from_text("ab\ncd\nef");
        let caret = doc.delete_range(4, 12).unwrap();
        assert_eq!(doc.body_text(), "af");
        assert_eq!(caret, 4);
    }

    #[test]
    fn test_delete_range_across_pages_keeps_amendments() {
        let mut second = Page::new(
            PageAttrs::default(),
            vec![Block::paragraph("cd"), Block::paragraph("ef")],
        );
        second.header = Some(crate::document::Region::new(vec![Block::paragraph("h")]));
        let mut doc = Document {
            pages: vec![
                Page::new(PageAttrs::default(), vec![Block::paragraph("ab")]),
                second,
            ],
        };
        // page 0 spans 0..8; page 1 header "h"@10, body "cd"@15, "ef"@19
        let caret = doc.delete_range(4, 21).unwrap();
        assert_eq!(caret, 4);
        assert_eq!(doc.pages[0].body.blocks[0].text, "af");
        assert!(doc.pages[1].body.blocks.is_empty());
        assert_eq!(doc.pages[1].header.as_ref().unwrap().blocks[0].text, "h");
    }

    #[test]
    fn test_delete_range_within_block() {
        let mut doc = Document::from_text("Hello World");
        assert_eq!(doc.delete_range(14, 8).unwrap(), 8);
        assert_eq!(doc.body_text(), "Hello");
    }

    #[test]
    fn test_delete_range_rejects_region_crossing() {
        let mut page = Page::new(PageAttrs::default(), vec![Block::paragraph("ab")]);
        page.header = Some(crate::document::Region::new(vec![Block::paragraph("h")]));
        let mut doc = Document { pages: vec![page] };
        // header "h"@2 slots 3..=4, body "ab"@7 slots 8..=10
        assert!(doc.delete_range(3, 9).is_err());
        assert_eq!(doc.pages[0].body.blocks[0].text, "ab");
    }

    #[test]
    fn test_split_block() {
        let mut doc = Document::from_blocks(vec![Block::heading(1, "Title text")]);
        let caret = doc.split_block(8).unwrap();
        assert_eq!(doc.body_text(), "Title\n text");
        assert_eq!(doc.pages[0].body.blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(caret, 10);
        assert!(doc.is_text_slot(caret));
        assert_eq!(doc.locate_text(caret).unwrap().offset, 0);
    }

    #[test]
    fn test_join_blocks_across_pages() {
        let mut doc = Document {
            pages: vec![
                Page::new(PageAttrs::default(), vec![Block::paragraph("ab")]),
                Page::new(PageAttrs::default(), vec![Block::paragraph("cd")]),
            ],
        };
        let caret = doc.join_blocks(body(0, 0), body(1, 0)).unwrap();
        assert_eq!(caret, 5);
        assert_eq!(doc.pages[0].body.blocks[0].text, "abcd");
        assert!(doc.pages[1].body.blocks.is_empty());
    }

    #[test]
    fn test_join_rejects_atoms() {
        let mut doc = Document::from_blocks(vec![Block::horizontal_rule(), Block::paragraph("x")]);
        assert!(doc.join_blocks(body(0, 0), body(0, 1)).is_err());
        assert_eq!(doc.pages[0].body.blocks.len(), 2);
    }
}
