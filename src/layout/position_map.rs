//! Old-to-new position mapping produced by one packing pass

use std::collections::BTreeMap;
use std::ops::Range;

/// A header or footer span carried to the same region of the rebuilt page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmendmentMapping {
    pub old: Range<usize>,
    pub new_start: usize,
}

/// Maps positions of the tree before a reflow to the rebuilt tree.
///
/// Body entries are keyed by the original start of each placed node (or of
/// the first text slot of a split remainder). A position maps through the
/// largest key at or before it, keeping its offset from that key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    entries: BTreeMap<usize, usize>,
    amendments: Vec<AmendmentMapping>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: usize, new: usize) {
        self.entries.insert(old, new);
    }

    pub fn insert_amendment(&mut self, old: Range<usize>, new_start: usize) {
        self.amendments.push(AmendmentMapping { old, new_start });
    }

    pub fn get(&self, old: usize) -> Option<usize> {
        self.entries.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.amendments.is_empty()
    }

    /// Body entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    pub fn amendments(&self) -> &[AmendmentMapping] {
        &self.amendments
    }

    /// Map an old position; `None` when no entry precedes it
    pub fn map(&self, pos: usize) -> Option<usize> {
        if let Some(span) = self.amendments.iter().find(|a| a.old.contains(&pos)) {
            return Some(span.new_start + (pos - span.old.start));
        }
        self.entries
            .range(..=pos)
            .next_back()
            .map(|(key, value)| value + (pos - key))
    }

    /// Bound every target by the rebuilt tree's content size
    pub fn clamp(&mut self, max: usize) {
        for value in self.entries.values_mut() {
            *value = (*value).min(max);
        }
        for span in &mut self.amendments {
            span.new_start = span.new_start.min(max);
        }
    }
}
