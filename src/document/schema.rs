//! Node types and the node factory used by the paginator

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::document::{Block, BlockKind, Page, PageAttrs, Region};
use crate::error::{ReflowError, Result};

/// Every node type that can appear in a paged document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Doc,
    Page,
    Header,
    Body,
    Footer,
    Paragraph,
    Heading,
    ListItem,
    HorizontalRule,
    Image,
}

/// Node types the host editor registered, plus the block used to seed
/// freshly created regions.
#[derive(Debug, Clone)]
pub struct Schema {
    node_types: FxHashSet<NodeType>,
    default_block: BlockKind,
}

impl Default for Schema {
    fn default() -> Self {
        Self::paged()
    }
}

impl Schema {
    /// Schema with every paged node type registered
    pub fn paged() -> Self {
        let node_types = [
            NodeType::Doc,
            NodeType::Page,
            NodeType::Header,
            NodeType::Body,
            NodeType::Footer,
            NodeType::Paragraph,
            NodeType::Heading,
            NodeType::ListItem,
            NodeType::HorizontalRule,
            NodeType::Image,
        ]
        .into_iter()
        .collect();

        Self {
            node_types,
            default_block: BlockKind::Paragraph,
        }
    }

    /// Drop a node type from the schema
    pub fn without(mut self, node_type: NodeType) -> Self {
        self.node_types.remove(&node_type);
        self
    }

    pub fn supports(&self, node_type: NodeType) -> bool {
        self.node_types.contains(&node_type)
    }

    pub fn require(&self, node_type: NodeType) -> Result<()> {
        if self.supports(node_type) {
            Ok(())
        } else {
            Err(ReflowError::MissingNodeType(node_type))
        }
    }

    /// Check everything a reflow must be able to construct
    pub fn require_pagination(&self, header: bool, footer: bool) -> Result<()> {
        self.require(NodeType::Page)?;
        self.require(NodeType::Body)?;
        if header {
            self.require(NodeType::Header)?;
        }
        if footer {
            self.require(NodeType::Footer)?;
        }
        self.require(self.default_block.node_type())
    }

    /// The empty block that seeds new header/footer regions
    pub fn default_block(&self) -> Block {
        Block::new(self.default_block.clone(), "")
    }

    /// A fresh header or footer holding one empty paragraph
    pub fn empty_amendment(&self) -> Region {
        Region::new(vec![self.default_block()])
    }

    pub fn page(
        &self,
        attrs: PageAttrs,
        header: Option<Region>,
        body: Vec<Block>,
        footer: Option<Region>,
    ) -> Result<Page> {
        self.require(NodeType::Page)?;
        self.require(NodeType::Body)?;
        if header.is_some() {
            self.require(NodeType::Header)?;
        }
        if footer.is_some() {
            self.require(NodeType::Footer)?;
        }
        Ok(Page {
            attrs,
            header,
            body: Region::new(body),
            footer,
        })
    }
}
