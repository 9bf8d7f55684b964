//! Page geometry: the body area available on a page

use crate::config::PaginationConfig;
use crate::document::{PageAttrs, PX_PER_MM};

/// Layout constraints for one page, in px
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Border widths, top/right/bottom/left
    pub borders: [f32; 4],
    /// Height reserved for the header, zero when disabled
    pub header_height: f32,
    /// Height reserved for the footer, zero when disabled
    pub footer_height: f32,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self::for_page(&PageAttrs::default(), &PaginationConfig::default())
    }
}

impl LayoutConstraints {
    pub fn for_page(attrs: &PageAttrs, config: &PaginationConfig) -> Self {
        let (page_width, page_height) = attrs.paper_px();
        let m = attrs.margins;
        let b = attrs.borders;
        Self {
            page_width,
            page_height,
            margin_top: m.top * PX_PER_MM,
            margin_bottom: m.bottom * PX_PER_MM,
            margin_left: m.left * PX_PER_MM,
            margin_right: m.right * PX_PER_MM,
            borders: [b.top, b.right, b.bottom, b.left],
            header_height: if config.header_enabled {
                config.header_height
            } else {
                0.0
            },
            footer_height: if config.footer_enabled {
                config.footer_height
            } else {
                0.0
            },
        }
    }

    /// Get usable body width
    pub fn content_width(&self) -> f32 {
        let [_, right, _, left] = self.borders;
        (self.page_width - self.margin_left - self.margin_right - left - right).max(0.0)
    }

    /// Get usable body height
    pub fn content_height(&self) -> f32 {
        let [top, _, bottom, _] = self.borders;
        (self.page_height
            - self.margin_top
            - self.margin_bottom
            - top
            - bottom
            - self.header_height
            - self.footer_height)
            .max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Borders, Margins, PaperSize};

    fn custom(width: f32, height: f32) -> PageAttrs {
        PageAttrs {
            paper_size: PaperSize::Custom { width, height },
            margins: Margins::zero(),
            ..PageAttrs::default()
        }
    }

    #[test]
    fn test_custom_page_without_margins() {
        let c = LayoutConstraints::for_page(&custom(400.0, 200.0), &PaginationConfig::default());
        assert_eq!(c.content_width(), 400.0);
        assert_eq!(c.content_height(), 200.0);
    }

    #[test]
    fn test_borders_and_amendments_reduce_body() {
        let mut attrs = custom(400.0, 300.0);
        attrs.borders = Borders {
            top: 2.0,
            right: 3.0,
            bottom: 2.0,
            left: 3.0,
        };
        let config = PaginationConfig {
            header_enabled: true,
            header_height: 40.0,
            footer_enabled: true,
            footer_height: 20.0,
            ..PaginationConfig::default()
        };
        let c = LayoutConstraints::for_page(&attrs, &config);
        assert_eq!(c.content_width(), 394.0);
        assert_eq!(c.content_height(), 236.0);
    }

    #[test]
    fn test_margins_in_mm() {
        let attrs = PageAttrs {
            paper_size: PaperSize::Custom {
                width: 500.0,
                height: 500.0,
            },
            margins: Margins::uniform(25.4),
            ..PageAttrs::default()
        };
        let c = LayoutConstraints::for_page(&attrs, &PaginationConfig::default());
        assert!((c.content_width() - 308.0).abs() < 1e-3);
        assert!((c.content_height() - 308.0).abs() < 1e-3);
    }

    #[test]
    fn test_never_negative() {
        let c = LayoutConstraints::for_page(&custom(10.0, 10.0), &PaginationConfig {
            header_enabled: true,
            ..PaginationConfig::default()
        });
        assert_eq!(c.content_height(), 0.0);
    }
}
