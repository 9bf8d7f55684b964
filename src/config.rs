//! Pagination configuration

use serde::{Deserialize, Serialize};

use crate::document::{Document, PageAttrs};
use crate::error::{ReflowError, Result};
use crate::layout::LayoutConstraints;

/// Height used for blocks that cannot be measured, in px
pub const DEFAULT_MIN_BLOCK_HEIGHT: f32 = 20.0;

/// Default header/footer reservation in px
pub const DEFAULT_AMENDMENT_HEIGHT: f32 = 48.0;

/// How the packer sizes a split remainder before it is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderHeight {
    /// One minimum block height; corrected on the next reflow
    #[default]
    Estimate,
    /// Measure the remainder text immediately
    Measured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Attributes for pages that have no counterpart in the previous tree
    pub default_page: PageAttrs,
    pub header_enabled: bool,
    pub footer_enabled: bool,
    /// Height reserved for the header region, in px
    pub header_height: f32,
    /// Height reserved for the footer region, in px
    pub footer_height: f32,
    pub min_block_height: f32,
    pub remainder_height: RemainderHeight,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: PageAttrs::default(),
            header_enabled: false,
            footer_enabled: false,
            header_height: DEFAULT_AMENDMENT_HEIGHT,
            footer_height: DEFAULT_AMENDMENT_HEIGHT,
            min_block_height: DEFAULT_MIN_BLOCK_HEIGHT,
            remainder_height: RemainderHeight::Estimate,
        }
    }
}

impl PaginationConfig {
    /// Parse a JSON config; `min_block_height` must be positive and finite
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ReflowError::InvalidConfig)?;
        if !(config.min_block_height.is_finite() && config.min_block_height > 0.0) {
            return Err(ReflowError::InvalidConfig(serde::de::Error::custom(format!(
                "min_block_height must be positive, got {}",
                config.min_block_height
            ))));
        }
        Ok(config)
    }

    /// Attributes for page `index` of a rebuilt tree
    pub fn page_attrs(&self, previous: &Document, index: usize) -> PageAttrs {
        previous
            .pages
            .get(index)
            .map(|p| p.attrs.clone())
            .unwrap_or_else(|| self.default_page.clone())
    }

    /// Body constraints for page `index` of a rebuilt tree
    pub fn constraints_for(&self, previous: &Document, index: usize) -> LayoutConstraints {
        LayoutConstraints::for_page(&self.page_attrs(previous, index), self)
    }
}
