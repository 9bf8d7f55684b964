//! Line breaking for the built-in measurement backend

use std::ops::Range;

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::font::FontMetrics;

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Default, Clone, Copy)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Byte ranges of the lines `text` wraps into at `max_width`.
    ///
    /// Empty text still occupies one line. Trailing whitespace of a segment
    /// never forces a wrap.
    pub fn break_lines(&self, text: &str, max_width: f32, metrics: &FontMetrics) -> Vec<Range<usize>> {
        if text.is_empty() {
            return vec![0..0];
        }

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width: f32 = 0.0;
        let mut segment_start = 0;

        for (break_at, opportunity) in linebreaks(text) {
            let segment = &text[segment_start..break_at];
            let visible_width = self.width(segment.trim_end(), metrics);

            if line_width + visible_width > max_width && line_start < segment_start {
                lines.push(line_start..segment_start);
                line_start = segment_start;
                line_width = 0.0;
            }

            if visible_width > max_width {
                // Emergency break inside an overlong segment
                let mut x: f32 = 0.0;
                for (idx, grapheme) in segment.grapheme_indices(true) {
                    let w = metrics.cluster_width(grapheme);
                    if x + w > max_width && x > 0.0 {
                        lines.push(line_start..segment_start + idx);
                        line_start = segment_start + idx;
                        x = 0.0;
                    }
                    x += w;
                }
                line_width = x;
            } else {
                line_width += self.width(segment, metrics);
            }

            if opportunity == BreakOpportunity::Mandatory {
                lines.push(line_start..break_at);
                line_start = break_at;
                line_width = 0.0;
            }
            segment_start = break_at;
        }

        lines
    }

    pub fn count_lines(&self, text: &str, max_width: f32, metrics: &FontMetrics) -> usize {
        self.break_lines(text, max_width, metrics).len()
    }

    fn width(&self, text: &str, metrics: &FontMetrics) -> f32 {
        text.graphemes(true).map(|g| metrics.cluster_width(g)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics::monospace(8.0, 10.0)
    }

    #[test]
    fn test_empty_text() {
        let lines = LineBreaker::new().break_lines("", 100.0, &metrics());
        assert_eq!(lines, vec![0..0]);
    }

    #[test]
    fn test_single_line() {
        let lines = LineBreaker::new().break_lines("Hello", 100.0, &metrics());
        assert_eq!(lines, vec![0..5]);
    }

    #[test]
    fn test_line_wrap() {
        // With 8px per char, 40px width = 5 chars per line
        let lines = LineBreaker::new().break_lines("Hello World", 40.0, &metrics());
        assert_eq!(lines, vec![0..6, 6..11]);
    }

    #[test]
    fn test_explicit_newline() {
        let lines = LineBreaker::new().break_lines("Hello\nWorld", 1000.0, &metrics());
        assert_eq!(lines, vec![0..6, 6..11]);
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let count = LineBreaker::new().count_lines("abcdefghijkl", 40.0, &metrics());
        assert_eq!(count, 3);
    }
}
