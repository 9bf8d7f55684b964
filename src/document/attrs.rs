//! Page attributes: paper, orientation, margins, borders, colour

use serde::{Deserialize, Serialize};

/// CSS pixels per millimetre (96 px per inch)
pub const PX_PER_MM: f32 = 96.0 / 25.4;

/// Paper size; named sizes are in millimetres, `Custom` is in px
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    B5,
    Letter,
    Legal,
    Tabloid,
    Custom { width: f32, height: f32 },
}

impl PaperSize {
    /// Portrait (width, height) in px
    pub fn size_px(&self) -> (f32, f32) {
        let mm = |w: f32, h: f32| (w * PX_PER_MM, h * PX_PER_MM);
        match *self {
            PaperSize::A3 => mm(297.0, 420.0),
            PaperSize::A4 => mm(210.0, 297.0),
            PaperSize::A5 => mm(148.0, 210.0),
            PaperSize::B5 => mm(176.0, 250.0),
            PaperSize::Letter => mm(215.9, 279.4),
            PaperSize::Legal => mm(215.9, 355.6),
            PaperSize::Tabloid => mm(279.4, 431.8),
            PaperSize::Custom { width, height } => (width, height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(25.4)
    }
}

impl Margins {
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }

    pub fn zero() -> Self {
        Self::uniform(0.0)
    }
}

/// Page border widths in px
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Borders {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Attributes carried by every page node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageAttrs {
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,
    pub borders: Borders,
    pub colour: String,
}

impl Default for PageAttrs {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            borders: Borders::default(),
            colour: "#fff".to_string(),
        }
    }
}

impl PageAttrs {
    /// Paper (width, height) in px after applying orientation
    pub fn paper_px(&self) -> (f32, f32) {
        let (w, h) = self.paper_size.size_px();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}
