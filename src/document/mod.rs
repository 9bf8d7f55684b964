//! Paged document model
//!
//! The tree is `Document -> Page -> Region -> Block`. Positions count tokens:
//! every container contributes an opening and a closing token, text counts
//! one per char, and atom blocks count one. Position 0 is the start of the
//! document's content.

mod attrs;
mod block;
mod edit;
mod resolve;
mod schema;

pub use attrs::{Borders, Margins, Orientation, PageAttrs, PaperSize, PX_PER_MM};
pub use block::{Block, BlockKind, ListMarker};
pub use edit::TextLocation;
pub use resolve::{PathStep, ResolvedPos};
pub use schema::{NodeType, Schema};

use serde::{Deserialize, Serialize};

use crate::error::{ReflowError, Result};

/// Which region of a page a block lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Header,
    Body,
    Footer,
}

impl RegionKind {
    /// Headers and footers are page amendments
    pub fn is_amendment(&self) -> bool {
        !matches!(self, RegionKind::Body)
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            RegionKind::Header => NodeType::Header,
            RegionKind::Body => NodeType::Body,
            RegionKind::Footer => NodeType::Footer,
        }
    }

    pub fn from_node_type(node_type: NodeType) -> Option<Self> {
        match node_type {
            NodeType::Header => Some(RegionKind::Header),
            NodeType::Body => Some(RegionKind::Body),
            NodeType::Footer => Some(RegionKind::Footer),
            _ => None,
        }
    }
}

/// A header, body or footer container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub blocks: Vec<Block>,
}

impl Region {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(Block::node_size).sum()
    }

    pub fn node_size(&self) -> usize {
        self.content_size() + 2
    }
}

/// A page: optional header, exactly one body, optional footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub attrs: PageAttrs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Region>,
    pub body: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Region>,
}

impl Page {
    /// A page with only a body
    pub fn new(attrs: PageAttrs, body: Vec<Block>) -> Self {
        Self {
            attrs,
            header: None,
            body: Region::new(body),
            footer: None,
        }
    }

    /// Regions in document order
    pub fn regions(&self) -> impl Iterator<Item = (RegionKind, &Region)> + '_ {
        self.header
            .iter()
            .map(|r| (RegionKind::Header, r))
            .chain(std::iter::once((RegionKind::Body, &self.body)))
            .chain(self.footer.iter().map(|r| (RegionKind::Footer, r)))
    }

    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        match kind {
            RegionKind::Header => self.header.as_ref(),
            RegionKind::Body => Some(&self.body),
            RegionKind::Footer => self.footer.as_ref(),
        }
    }

    pub fn region_mut(&mut self, kind: RegionKind) -> Option<&mut Region> {
        match kind {
            RegionKind::Header => self.header.as_mut(),
            RegionKind::Body => Some(&mut self.body),
            RegionKind::Footer => self.footer.as_mut(),
        }
    }

    /// Offset of the region's opening token from the page's opening token
    pub fn region_offset(&self, kind: RegionKind) -> Option<usize> {
        let mut offset = 1;
        for (k, region) in self.regions() {
            if k == kind {
                return Some(offset);
            }
            offset += region.node_size();
        }
        None
    }

    pub fn content_size(&self) -> usize {
        self.regions().map(|(_, r)| r.node_size()).sum()
    }

    pub fn node_size(&self) -> usize {
        self.content_size() + 2
    }
}

/// Address of a block within the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockAddress {
    pub page: usize,
    pub region: RegionKind,
    pub index: usize,
}

/// A block together with its address and absolute start position
#[derive(Debug, Clone, Copy)]
pub struct BlockRef<'a> {
    pub address: BlockAddress,
    pub pos: usize,
    pub block: &'a Block,
}

impl BlockRef<'_> {
    /// First caret slot, for text-bearing blocks
    pub fn first_slot(&self) -> Option<usize> {
        self.block.is_text_bearing().then_some(self.pos + 1)
    }

    /// Last caret slot, for text-bearing blocks
    pub fn last_slot(&self) -> Option<usize> {
        self.block
            .is_text_bearing()
            .then(|| self.pos + 1 + self.block.char_len())
    }

    pub fn end(&self) -> usize {
        self.pos + self.block.node_size()
    }
}

/// The root of a paged document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// One default page holding one empty paragraph
    pub fn new() -> Self {
        Self::from_blocks(vec![Block::paragraph("")])
    }

    /// Unpaginated content wrapped in a single default page
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            pages: vec![Page::new(PageAttrs::default(), blocks)],
        }
    }

    /// One paragraph per line, all on a single page
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(text.split('\n').map(Block::paragraph).collect())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ReflowError::InvalidDocument)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ReflowError::Internal(e.to_string()))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Size of the document's content
    pub fn content_size(&self) -> usize {
        self.pages.iter().map(Page::node_size).sum()
    }

    /// Position of the page's opening token
    pub fn page_start(&self, index: usize) -> Option<usize> {
        if index >= self.pages.len() {
            return None;
        }
        Some(self.pages[..index].iter().map(Page::node_size).sum())
    }

    /// Every block in document order with its absolute start
    pub fn block_refs(&self) -> Vec<BlockRef<'_>> {
        let mut refs = Vec::new();
        let mut page_start = 0;
        for (page_index, page) in self.pages.iter().enumerate() {
            let mut region_start = page_start + 1;
            for (kind, region) in page.regions() {
                let mut pos = region_start + 1;
                for (index, block) in region.blocks.iter().enumerate() {
                    refs.push(BlockRef {
                        address: BlockAddress {
                            page: page_index,
                            region: kind,
                            index,
                        },
                        pos,
                        block,
                    });
                    pos += block.node_size();
                }
                region_start += region.node_size();
            }
            page_start += page.node_size();
        }
        refs
    }

    /// Body blocks of all pages in order
    pub fn body_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.pages.iter().flat_map(|p| p.body.blocks.iter())
    }

    /// Body text with one line per block
    pub fn body_text(&self) -> String {
        self.body_blocks()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn block(&self, address: BlockAddress) -> Option<&Block> {
        self.pages
            .get(address.page)?
            .region(address.region)?
            .blocks
            .get(address.index)
    }

    pub fn block_mut(&mut self, address: BlockAddress) -> Option<&mut Block> {
        self.pages
            .get_mut(address.page)?
            .region_mut(address.region)?
            .blocks
            .get_mut(address.index)
    }

    /// Absolute start position of the block
    pub fn block_start(&self, address: BlockAddress) -> Option<usize> {
        let page = self.pages.get(address.page)?;
        let region = page.region(address.region)?;
        if address.index >= region.blocks.len() {
            return None;
        }
        let page_start = self.page_start(address.page)?;
        let region_start = page_start + page.region_offset(address.region)?;
        let before: usize = region.blocks[..address.index]
            .iter()
            .map(Block::node_size)
            .sum();
        Some(region_start + 1 + before)
    }

    /// One page whose body holds at most one empty text block
    pub fn is_trivial(&self) -> bool {
        match self.pages.as_slice() {
            [page] => match page.body.blocks.as_slice() {
                [] => true,
                [block] => block.is_empty_text(),
                _ => false,
            },
            _ => false,
        }
    }
}
