//! Carry a selection from the tree before a reflow into the rebuilt tree

use crate::document::Document;
use crate::editing::Selection;
use crate::layout::PositionMap;

/// Map an old caret position to a valid caret in `doc`.
///
/// Never fails: unmapped positions land at the end of the document.
pub fn remap_position(old: usize, map: &PositionMap, doc: &Document) -> usize {
    let end = document_end(doc);
    let Some(mapped) = map.map(old) else {
        tracing::debug!(old, "no position map entry, caret to document end");
        return end;
    };
    let mapped = mapped.min(doc.content_size());

    if doc.is_text_slot(mapped) {
        return mapped;
    }
    doc.text_slot_at_or_after(mapped)
        .or_else(|| doc.text_slot_at_or_before(mapped))
        .unwrap_or(end)
}

fn document_end(doc: &Document) -> usize {
    doc.last_text_slot().unwrap_or_else(|| doc.content_size())
}

/// Whether `pos` is the start of an atom block in `doc`
fn is_atom_start(doc: &Document, pos: usize) -> bool {
    doc.block_refs()
        .iter()
        .any(|r| r.pos == pos && r.block.kind.is_atom())
}

/// Map a whole selection through a reflow
pub fn remap_selection(selection: &Selection, map: &PositionMap, doc: &Document) -> Selection {
    match *selection {
        Selection::Text { anchor, head } if anchor == head => {
            Selection::caret(remap_position(head, map, doc))
        }
        Selection::Text { anchor, head } => Selection::Text {
            anchor: remap_position(anchor, map, doc),
            head: remap_position(head, map, doc),
        },
        Selection::Node { pos } => {
            if let Some(mapped) = map.map(pos) {
                if is_atom_start(doc, mapped) {
                    return Selection::Node { pos: mapped };
                }
            }
            Selection::caret(remap_position(pos, map, doc))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Page, PageAttrs};

    fn two_pages() -> Document {
        // page 0 [0..9): "one" at 2; page 1 [9..18): "two" at 11
        Document {
            pages: vec![
                Page::new(PageAttrs::default(), vec![Block::paragraph("one")]),
                Page::new(PageAttrs::default(), vec![Block::paragraph("two")]),
            ],
        }
    }

    #[test]
    fn test_maps_with_intra_node_offset() {
        let doc = two_pages();
        let mut map = PositionMap::new();
        map.insert(2, 2);
        map.insert(7, 11);
        assert_eq!(remap_position(9, &map, &doc), 13);
        assert_eq!(remap_position(4, &map, &doc), 4);
    }

    #[test]
    fn test_non_slot_searches_forward_then_backward() {
        let doc = two_pages();
        let mut map = PositionMap::new();
        // lands on the page boundary between the two blocks
        map.insert(2, 7);
        assert_eq!(remap_position(2, &map, &doc), 12);

        let mut map = PositionMap::new();
        map.insert(2, 17);
        assert_eq!(remap_position(2, &map, &doc), 15);
    }

    #[test]
    fn test_unmapped_goes_to_document_end() {
        let doc = two_pages();
        let mut map = PositionMap::new();
        map.insert(10, 2);
        assert_eq!(remap_position(3, &map, &doc), 15);
        assert_eq!(remap_position(3, &PositionMap::new(), &doc), 15);
    }

    #[test]
    fn test_clamps_past_end() {
        let doc = two_pages();
        let mut map = PositionMap::new();
        map.insert(2, 12);
        assert_eq!(remap_position(40, &map, &doc), 15);
    }

    #[test]
    fn test_text_selection_maps_both_ends() {
        let doc = two_pages();
        let mut map = PositionMap::new();
        map.insert(2, 2);
        map.insert(7, 11);
        let sel = remap_selection(&Selection::text(4, 9), &map, &doc);
        assert_eq!(sel, Selection::text(4, 13));
        let caret = remap_selection(&Selection::caret(8), &map, &doc);
        assert_eq!(caret, Selection::caret(12));
    }

    #[test]
    fn test_node_selection_kept_on_atom() {
        let doc = Document::from_blocks(vec![Block::paragraph("a"), Block::image(30.0)]);
        let mut map = PositionMap::new();
        map.insert(2, 2);
        map.insert(9, 5);
        assert_eq!(
            remap_selection(&Selection::node(9), &map, &doc),
            Selection::node(5)
        );
        // an atom that moved away falls back to a caret
        let mut map = PositionMap::new();
        map.insert(2, 2);
        assert_eq!(
            remap_selection(&Selection::node(2), &map, &doc),
            Selection::caret(3)
        );
    }
}
