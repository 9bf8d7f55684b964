//! Block-level content nodes

use serde::{Deserialize, Serialize};

use crate::document::NodeType;

/// Type of list marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListMarker {
    Bullet,
    Numbered { ordinal: u32 },
}

/// The kind of block element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Regular paragraph
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// List item
    ListItem { indent_level: u8, marker: ListMarker },
    /// Horizontal rule (atom)
    HorizontalRule,
    /// Image with an intrinsic height in px (atom)
    Image { height: f32 },
}

impl BlockKind {
    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            _ => 1.0,
        }
    }

    /// Get the spacing after this block (in line heights)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { .. } => 0.5,
            BlockKind::ListItem { .. } => 0.25,
            BlockKind::HorizontalRule | BlockKind::Image { .. } => 0.5,
        }
    }

    /// Whether blocks of this kind hold text and caret slots
    pub fn is_text_bearing(&self) -> bool {
        !self.is_atom()
    }

    /// Atoms have no content and a node size of one
    pub fn is_atom(&self) -> bool {
        matches!(self, BlockKind::HorizontalRule | BlockKind::Image { .. })
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, BlockKind::ListItem { .. })
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            BlockKind::Paragraph => NodeType::Paragraph,
            BlockKind::Heading { .. } => NodeType::Heading,
            BlockKind::ListItem { .. } => NodeType::ListItem,
            BlockKind::HorizontalRule => NodeType::HorizontalRule,
            BlockKind::Image { .. } => NodeType::Image,
        }
    }
}

/// A block-level content node.
///
/// Text is counted in Unicode scalar values for position arithmetic. Atom
/// kinds always carry empty text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        let text = if kind.is_atom() {
            String::new()
        } else {
            text.into()
        };
        Self { kind, text }
    }

    /// Create a new paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    /// Create a new heading block
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(
            BlockKind::Heading {
                level: level.clamp(1, 6),
            },
            text,
        )
    }

    /// Create a new list item block
    pub fn list_item(indent_level: u8, marker: ListMarker, text: impl Into<String>) -> Self {
        Self::new(
            BlockKind::ListItem {
                indent_level,
                marker,
            },
            text,
        )
    }

    pub fn horizontal_rule() -> Self {
        Self::new(BlockKind::HorizontalRule, "")
    }

    pub fn image(height: f32) -> Self {
        Self::new(BlockKind::Image { height }, "")
    }

    /// A block of the same kind holding different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(self.kind.clone(), text)
    }

    pub fn is_text_bearing(&self) -> bool {
        self.kind.is_text_bearing()
    }

    /// Text-bearing block with no text
    pub fn is_empty_text(&self) -> bool {
        self.is_text_bearing() && self.text.is_empty()
    }

    /// Number of characters (position units) of text
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Size of this node in position units
    pub fn node_size(&self) -> usize {
        if self.kind.is_atom() {
            1
        } else {
            self.char_len() + 2
        }
    }

    /// Byte index of the char offset, clamped to the text length
    pub fn byte_index(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
