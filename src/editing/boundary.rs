//! Boundary predicates: is a position at the start or end of a region
//!
//! These are pure and never measure; navigation calls them on every
//! keystroke and the remapper on every reflow.

use crate::document::{Block, Document, Page, RegionKind};

/// The containers the predicates reason about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// A whole page, all its regions included
    Page,
    Body,
    /// A header or footer
    PageAmendment,
}

impl Scope {
    fn matches(&self, kind: RegionKind) -> bool {
        match self {
            Scope::Page => true,
            Scope::Body => kind == RegionKind::Body,
            Scope::PageAmendment => kind.is_amendment(),
        }
    }
}

/// A page or region enclosing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSpan {
    pub page: usize,
    /// `None` when the span is the page itself
    pub kind: Option<RegionKind>,
    /// Position of the opening token
    pub start: usize,
    pub size: usize,
}

impl RegionSpan {
    pub fn content_start(&self) -> usize {
        self.start + 1
    }

    pub fn content_end(&self) -> usize {
        self.start + self.size - 1
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.content_start() && pos <= self.content_end()
    }
}

/// The page or region of `scope` enclosing `pos`
pub fn enclosing_region(doc: &Document, pos: usize, scope: Scope) -> Option<RegionSpan> {
    let resolved = doc.resolve(pos).ok()?;
    let page = resolved.page()?;
    if scope == Scope::Page {
        return Some(RegionSpan {
            page: page.index,
            kind: None,
            start: page.start,
            size: page.size,
        });
    }

    let region = resolved.region()?;
    let kind = RegionKind::from_node_type(region.node)?;
    scope.matches(kind).then_some(RegionSpan {
        page: page.index,
        kind: Some(kind),
        start: region.start,
        size: region.size,
    })
}

/// At or before the first caret slot of the document
pub fn is_pos_at_start_of_document(doc: &Document, pos: usize) -> bool {
    match doc.first_text_slot() {
        Some(first) => pos <= first,
        None => pos == 0,
    }
}

/// At or after the last caret slot of the document
pub fn is_pos_at_end_of_document(doc: &Document, pos: usize) -> bool {
    match doc.last_text_slot() {
        Some(last) => pos >= last,
        None => pos >= doc.content_size(),
    }
}

/// Caret positions that belong to a child block starting at `start`
fn child_slots(start: usize, block: &Block) -> (usize, usize) {
    if block.is_text_bearing() {
        (start + 1, start + 1 + block.char_len())
    } else {
        (start, start)
    }
}

fn span_page<'a>(doc: &'a Document, span: &RegionSpan) -> Option<&'a Page> {
    doc.pages.get(span.page)
}

/// First block of the span with its start position
fn first_child<'a>(doc: &'a Document, span: &RegionSpan) -> Option<(usize, &'a Block)> {
    let page = span_page(doc, span)?;
    match span.kind {
        Some(kind) => {
            let block = page.region(kind)?.blocks.first()?;
            Some((span.content_start(), block))
        }
        // the first region opens at the page's content start
        None => {
            let (_, region) = page.regions().next()?;
            Some((span.content_start() + 1, region.blocks.first()?))
        }
    }
}

/// Last block of the span with its start position
fn last_child<'a>(doc: &'a Document, span: &RegionSpan) -> Option<(usize, &'a Block)> {
    let page = span_page(doc, span)?;
    let (block, content_end) = match span.kind {
        Some(kind) => (page.region(kind)?.blocks.last()?, span.content_end()),
        // the last region closes one token before the page does
        None => {
            let (_, region) = page.regions().last()?;
            (region.blocks.last()?, span.content_end() - 1)
        }
    };
    Some((content_end - block.node_size(), block))
}

fn at_start(doc: &Document, pos: usize, scope: Scope, exact: bool) -> bool {
    if is_pos_at_start_of_document(doc, pos) {
        return true;
    }
    let Some(span) = enclosing_region(doc, pos, scope) else {
        return false;
    };
    let Some((start, block)) = first_child(doc, &span) else {
        return false;
    };
    let (first, last) = child_slots(start, block);
    if exact {
        pos == first
    } else {
        pos >= first && pos <= last
    }
}

fn at_end(doc: &Document, pos: usize, scope: Scope, exact: bool) -> bool {
    if is_pos_at_end_of_document(doc, pos) {
        return true;
    }
    let Some(span) = enclosing_region(doc, pos, scope) else {
        return false;
    };
    let Some((start, block)) = last_child(doc, &span) else {
        return false;
    };
    let (first, last) = child_slots(start, block);
    if exact {
        pos == last
    } else {
        pos >= first && pos <= last
    }
}

pub fn is_pos_at_start_of_body(doc: &Document, pos: usize, exact: bool) -> bool {
    at_start(doc, pos, Scope::Body, exact)
}

pub fn is_pos_at_end_of_body(doc: &Document, pos: usize, exact: bool) -> bool {
    at_end(doc, pos, Scope::Body, exact)
}

pub fn is_pos_at_start_of_page(doc: &Document, pos: usize, exact: bool) -> bool {
    at_start(doc, pos, Scope::Page, exact)
}

pub fn is_pos_at_end_of_page(doc: &Document, pos: usize, exact: bool) -> bool {
    at_end(doc, pos, Scope::Page, exact)
}

pub fn is_pos_at_start_of_page_amendment(doc: &Document, pos: usize, exact: bool) -> bool {
    at_start(doc, pos, Scope::PageAmendment, exact)
}

pub fn is_pos_at_end_of_page_amendment(doc: &Document, pos: usize, exact: bool) -> bool {
    at_end(doc, pos, Scope::PageAmendment, exact)
}

pub fn is_pos_at_first_child_of_body(doc: &Document, pos: usize) -> bool {
    at_start(doc, pos, Scope::Body, false)
}

pub fn is_pos_at_last_child_of_body(doc: &Document, pos: usize) -> bool {
    at_end(doc, pos, Scope::Body, false)
}

pub fn is_pos_at_first_child_of_page(doc: &Document, pos: usize) -> bool {
    at_start(doc, pos, Scope::Page, false)
}

pub fn is_pos_at_last_child_of_page(doc: &Document, pos: usize) -> bool {
    at_end(doc, pos, Scope::Page, false)
}

pub fn is_pos_at_first_child_of_page_amendment(doc: &Document, pos: usize) -> bool {
    at_start(doc, pos, Scope::PageAmendment, false)
}

pub fn is_pos_at_last_child_of_page_amendment(doc: &Document, pos: usize) -> bool {
    at_end(doc, pos, Scope::PageAmendment, false)
}
