//! Caret movement and deletion across page boundaries
//!
//! Body content flows across pages, so moving or deleting past the edge of
//! a body continues in the body of the neighbouring page. Headers and
//! footers are confined: the caret never leaves them by arrowing.

use unicode_segmentation::UnicodeSegmentation;

use crate::document::{BlockAddress, BlockRef, Document, RegionKind};
use crate::editing::boundary::{
    is_pos_at_end_of_page_amendment, is_pos_at_start_of_page_amendment,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// What a delete keystroke should do at the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAction {
    /// Delete text between two caret slots of one block
    DeleteText { from: usize, to: usize },
    /// Merge `second` into `first`
    JoinBlocks {
        first: BlockAddress,
        second: BlockAddress,
    },
    /// Remove an atom block
    RemoveBlock(BlockAddress),
    Nothing,
}

/// Blocks the caret can flow through from a block at `address`
fn flow_blocks(doc: &Document, address: BlockAddress) -> Vec<BlockRef<'_>> {
    doc.block_refs()
        .into_iter()
        .filter(|r| match address.region {
            RegionKind::Body => r.address.region == RegionKind::Body,
            kind => r.address.region == kind && r.address.page == address.page,
        })
        .collect()
}

/// Char length of the grapheme before (or after) char `offset` of `text`
fn grapheme_len(text: &str, offset: usize, direction: Direction) -> usize {
    let byte = text
        .char_indices()
        .nth(offset)
        .map_or(text.len(), |(i, _)| i);
    let grapheme = match direction {
        Direction::Backward => text[..byte].graphemes(true).next_back(),
        Direction::Forward => text[byte..].graphemes(true).next(),
    };
    grapheme.map_or(0, |g| g.chars().count())
}

/// Adjacent block in the flow, atoms included
fn neighbour<'a>(
    flow: &[BlockRef<'a>],
    address: BlockAddress,
    direction: Direction,
) -> Option<BlockRef<'a>> {
    let index = flow.iter().position(|r| r.address == address)?;
    match direction {
        Direction::Backward => index.checked_sub(1).and_then(|i| flow.get(i)).copied(),
        Direction::Forward => flow.get(index + 1).copied(),
    }
}

/// Move the caret one grapheme, crossing into the neighbouring text block
/// of the same flow when at a block edge. Positions outside a text block
/// snap to the nearest caret slot.
pub fn move_horizontal(doc: &Document, pos: usize, direction: Direction) -> usize {
    let Ok(location) = doc.locate_text(pos) else {
        let snapped = match direction {
            Direction::Backward => doc.text_slot_at_or_before(pos),
            Direction::Forward => doc.text_slot_at_or_after(pos),
        };
        return snapped.unwrap_or(pos);
    };
    let Some(block) = doc.block(location.address) else {
        return pos;
    };

    let step = grapheme_len(&block.text, location.offset, direction);
    if step > 0 {
        return match direction {
            Direction::Backward => pos - step,
            Direction::Forward => pos + step,
        };
    }

    let flow = flow_blocks(doc, location.address);
    let Some(index) = flow.iter().position(|r| r.address == location.address) else {
        return pos;
    };
    let target = match direction {
        Direction::Backward => flow[..index].iter().rev().find_map(BlockRef::last_slot),
        Direction::Forward => flow[index + 1..].iter().find_map(BlockRef::first_slot),
    };
    target.unwrap_or(pos)
}

/// The effect of Backspace with a collapsed caret at `pos`
pub fn backspace_action(doc: &Document, pos: usize) -> DeleteAction {
    let Ok(location) = doc.locate_text(pos) else {
        return DeleteAction::Nothing;
    };
    let Some(block) = doc.block(location.address) else {
        return DeleteAction::Nothing;
    };

    let step = grapheme_len(&block.text, location.offset, Direction::Backward);
    if step > 0 {
        return DeleteAction::DeleteText {
            from: pos - step,
            to: pos,
        };
    }
    if location.address.region.is_amendment() && is_pos_at_start_of_page_amendment(doc, pos, true)
    {
        return DeleteAction::Nothing;
    }

    let flow = flow_blocks(doc, location.address);
    match neighbour(&flow, location.address, Direction::Backward) {
        Some(prev) if prev.block.is_text_bearing() => DeleteAction::JoinBlocks {
            first: prev.address,
            second: location.address,
        },
        Some(prev) => DeleteAction::RemoveBlock(prev.address),
        None => DeleteAction::Nothing,
    }
}

/// The effect of Delete with a collapsed caret at `pos`
pub fn delete_forward_action(doc: &Document, pos: usize) -> DeleteAction {
    let Ok(location) = doc.locate_text(pos) else {
        return DeleteAction::Nothing;
    };
    let Some(block) = doc.block(location.address) else {
        return DeleteAction::Nothing;
    };

    let step = grapheme_len(&block.text, location.offset, Direction::Forward);
    if step > 0 {
        return DeleteAction::DeleteText {
            from: pos,
            to: pos + step,
        };
    }
    if location.address.region.is_amendment() && is_pos_at_end_of_page_amendment(doc, pos, true) {
        return DeleteAction::Nothing;
    }

    let flow = flow_blocks(doc, location.address);
    match neighbour(&flow, location.address, Direction::Forward) {
        Some(next) if next.block.is_text_bearing() => DeleteAction::JoinBlocks {
            first: location.address,
            second: next.address,
        },
        Some(next) => DeleteAction::RemoveBlock(next.address),
        None => DeleteAction::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Page, PageAttrs, Region};

    /// page 0 [0..14): header "h" at 2, body "ab" at 7 and hr at 11
    /// page 1 [14..27): body "cd" at 16, footer "f" at 22
    fn doc() -> Document {
        let mut first = Page::new(
            PageAttrs::default(),
            vec![Block::paragraph("ab"), Block::horizontal_rule()],
        );
        first.header = Some(Region::new(vec![Block::paragraph("h")]));
        let mut second = Page::new(PageAttrs::default(), vec![Block::paragraph("cd")]);
        second.footer = Some(Region::new(vec![Block::paragraph("f")]));
        Document {
            pages: vec![first, second],
        }
    }

    fn body(page: usize, index: usize) -> BlockAddress {
        BlockAddress {
            page,
            region: RegionKind::Body,
            index,
        }
    }

    #[test]
    fn test_fixture_positions() {
        let starts: Vec<_> = doc().block_refs().iter().map(|r| r.pos).collect();
        assert_eq!(starts, vec![2, 7, 11, 16, 22]);
    }

    #[test]
    fn test_move_within_block() {
        let doc = doc();
        assert_eq!(move_horizontal(&doc, 8, Direction::Forward), 9);
        assert_eq!(move_horizontal(&doc, 9, Direction::Backward), 8);
    }

    #[test]
    fn test_move_across_pages_skips_atoms() {
        let doc = doc();
        // end of "ab" on page 0 to start of "cd" on page 1
        assert_eq!(move_horizontal(&doc, 10, Direction::Forward), 17);
        assert_eq!(move_horizontal(&doc, 17, Direction::Backward), 10);
    }

    #[test]
    fn test_amendments_confine_caret() {
        let doc = doc();
        assert_eq!(move_horizontal(&doc, 4, Direction::Forward), 4);
        assert_eq!(move_horizontal(&doc, 3, Direction::Backward), 3);
        // the body never flows into a footer
        assert_eq!(move_horizontal(&doc, 19, Direction::Forward), 19);
    }

    #[test]
    fn test_grapheme_steps() {
        let doc = Document::from_blocks(vec![Block::paragraph("e\u{301}x")]);
        assert_eq!(move_horizontal(&doc, 3, Direction::Forward), 5);
        assert_eq!(move_horizontal(&doc, 5, Direction::Backward), 3);
    }

    #[test]
    fn test_backspace() {
        let doc = doc();
        assert_eq!(
            backspace_action(&doc, 9),
            DeleteAction::DeleteText { from: 8, to: 9 }
        );
        // start of "cd": the previous body block is the hr on page 0
        assert_eq!(backspace_action(&doc, 17), DeleteAction::RemoveBlock(body(0, 1)));
        assert_eq!(backspace_action(&doc, 8), DeleteAction::Nothing);
        assert_eq!(backspace_action(&doc, 3), DeleteAction::Nothing);
    }

    #[test]
    fn test_delete_forward() {
        let doc = doc();
        assert_eq!(
            delete_forward_action(&doc, 8),
            DeleteAction::DeleteText { from: 8, to: 9 }
        );
        assert_eq!(delete_forward_action(&doc, 10), DeleteAction::RemoveBlock(body(0, 1)));
        assert_eq!(delete_forward_action(&doc, 19), DeleteAction::Nothing);
        assert_eq!(delete_forward_action(&doc, 24), DeleteAction::Nothing);
    }

    #[test]
    fn test_join_across_pages() {
        let doc = Document {
            pages: vec![
                Page::new(PageAttrs::default(), vec![Block::paragraph("ab")]),
                Page::new(PageAttrs::default(), vec![Block::paragraph("cd")]),
            ],
        };
        // page 1 starts at 8, "cd" at 10
        assert_eq!(
            backspace_action(&doc, 11),
            DeleteAction::JoinBlocks {
                first: body(0, 0),
                second: body(1, 0),
            }
        );
        assert_eq!(
            delete_forward_action(&doc, 5),
            DeleteAction::JoinBlocks {
                first: body(0, 0),
                second: body(1, 0),
            }
        );
    }
}
