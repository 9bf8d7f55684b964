//! Error types for the reflow pipeline and the editing commands.

use thiserror::Error;

use crate::document::NodeType;

/// Errors surfaced by fallible document and reflow operations.
///
/// Measurement and split failures never show up here: the packer recovers
/// from them locally with fallback heights and page-break policies.
#[derive(Error, Debug)]
pub enum ReflowError {
    /// The host schema lacks a node type the paginator must construct.
    #[error("schema is missing node type {0:?}")]
    MissingNodeType(NodeType),

    /// A position lies outside the document's content.
    #[error("position {pos} out of range for document of size {size}")]
    PositionOutOfRange { pos: usize, size: usize },

    /// A text edit targeted a position that is not a text slot.
    #[error("position {0} is not inside a text block")]
    NotInTextBlock(usize),

    /// The pagination configuration failed to parse.
    #[error("invalid pagination config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    /// A serialized document failed to parse.
    #[error("invalid document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    /// Internal consistency failure inside the pipeline.
    #[error("internal reflow error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ReflowError>;
