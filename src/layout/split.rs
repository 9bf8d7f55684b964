//! Text splitting at word boundaries

use unicode_segmentation::UnicodeSegmentation;

use crate::document::Block;
use crate::layout::measure::{valid_height, TextMeasurer};

/// The two fragments of a block that did not fit whole
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub fitting: Block,
    pub remaining: Block,
    /// Measured height of the fitting fragment
    pub fitting_height: f32,
    /// Chars of the original text taken by the fitting fragment, including
    /// the separating space
    pub consumed: usize,
}

/// Split a text block so its prefix fits in `available_height`.
///
/// The cut is the longest prefix the measurer accepts, walked back to the
/// nearest preceding space. Returns `None` when the block is not text, the
/// whole text fits, no word boundary exists before the cut, or either
/// fragment would be empty.
pub fn split_block<M: TextMeasurer + ?Sized>(
    block: &Block,
    available_height: f32,
    width: f32,
    measurer: &M,
) -> Option<SplitResult> {
    if !block.is_text_bearing()
        || block.text.is_empty()
        || available_height.is_nan()
        || available_height <= 0.0
    {
        return None;
    }
    let text = block.text.as_str();
    let fits = |end: usize| {
        valid_height(measurer.measure_text(&block.kind, &text[..end], width))
            .is_some_and(|h| h <= available_height)
    };

    if fits(text.len()) {
        return None;
    }

    // Candidate cuts: every grapheme boundary except the start and the end
    let cuts: Vec<usize> = text.grapheme_indices(true).skip(1).map(|(i, _)| i).collect();

    let (mut lo, mut hi) = (0, cuts.len());
    let mut best = 0;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if fits(cuts[mid]) {
            best = cuts[mid];
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    let space = if text[best..].starts_with(' ') {
        best
    } else {
        text[..best].rfind(' ')?
    };
    if space == 0 {
        return None;
    }

    let fitting_text = &text[..space];
    let remaining_text = &text[space + 1..];
    if remaining_text.is_empty() {
        return None;
    }

    let fitting_height = valid_height(measurer.measure_text(&block.kind, fitting_text, width))?;
    tracing::trace!(
        cut = space,
        fitting_height,
        available_height,
        "split text block"
    );

    Some(SplitResult {
        fitting: block.with_text(fitting_text),
        remaining: block.with_text(remaining_text),
        fitting_height,
        consumed: fitting_text.chars().count() + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockKind;

    /// 12px per line of six chars
    fn six_per_line(_: &BlockKind, text: &str, _: f32) -> Option<f32> {
        let lines = text.chars().count().div_ceil(6).max(1);
        Some(lines as f32 * 12.0)
    }

    #[test]
    fn test_splits_at_word_boundary() {
        let block = Block::paragraph("alpha beta gamma delta");
        let result = split_block(&block, 20.0, 100.0, &six_per_line).unwrap();
        assert_eq!(result.fitting.text, "alpha");
        assert_eq!(result.remaining.text, "beta gamma delta");
        assert_eq!(result.fitting_height, 12.0);
        assert_eq!(result.consumed, 6);
    }

    #[test]
    fn test_fragments_keep_kind() {
        let block = Block::heading(2, "alpha beta gamma delta");
        let result = split_block(&block, 30.0, 100.0, &six_per_line).unwrap();
        assert_eq!(result.fitting.kind, block.kind);
        assert_eq!(result.remaining.kind, block.kind);
        // 12 chars fit in two lines; the cut walks back to the space after "beta"
        assert_eq!(result.fitting.text, "alpha beta");
        assert_eq!(result.remaining.text, "gamma delta");
    }

    #[test]
    fn test_no_space_means_no_split() {
        let block = Block::paragraph("abcdefghijklmnopqrstuvwxyz");
        assert!(split_block(&block, 20.0, 100.0, &six_per_line).is_none());
    }

    #[test]
    fn test_whole_text_fits() {
        let block = Block::paragraph("short");
        assert!(split_block(&block, 20.0, 100.0, &six_per_line).is_none());
    }

    #[test]
    fn test_nothing_fits() {
        let block = Block::paragraph("alpha beta");
        assert!(split_block(&block, 5.0, 100.0, &six_per_line).is_none());
        assert!(split_block(&block, 0.0, 100.0, &six_per_line).is_none());
    }

    #[test]
    fn test_atoms_and_empty_text() {
        assert!(split_block(&Block::image(500.0), 20.0, 100.0, &six_per_line).is_none());
        assert!(split_block(&Block::paragraph(""), 20.0, 100.0, &six_per_line).is_none());
    }

    #[test]
    fn test_unmeasurable_prefix_does_not_fit() {
        let broken = |_: &BlockKind, _: &str, _: f32| -> Option<f32> { None };
        let block = Block::paragraph("alpha beta gamma");
        assert!(split_block(&block, 20.0, 100.0, &broken).is_none());
    }

    #[test]
    fn test_multibyte_text() {
        let block = Block::paragraph("héllo wörld ünïcode");
        let result = split_block(&block, 20.0, 100.0, &six_per_line).unwrap();
        assert_eq!(result.fitting.text, "héllo");
        assert_eq!(result.remaining.text, "wörld ünïcode");
        assert_eq!(result.consumed, 6);
    }
}
