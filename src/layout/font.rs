//! Font metrics for the built-in measurement backend

/// Metrics needed for text measurement
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 14px * 1.2 line height, 8.41px monospace advance
        Self::monospace(8.41, 16.8)
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character has the same advance
    pub fn monospace(char_width: f32, line_height: f32) -> Self {
        Self::new(line_height, vec![char_width; 128], char_width)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of a grapheme cluster; tabs are four advances, controls are zero
    pub fn cluster_width(&self, grapheme: &str) -> f32 {
        if grapheme == "\t" {
            self.default_width * 4.0
        } else if grapheme.chars().all(char::is_control) {
            0.0
        } else {
            grapheme.chars().map(|c| self.width(c)).sum()
        }
    }
}
