//! Drawing primitives assembled by page templates.
//!
//! A page is a list of [`Element`] values in paint order. Elements are
//! plain data; turning them into PDF content stream operators happens in
//! [`crate::pdf::content`].

pub mod path;
pub mod table;

pub use path::{PaintMode, PathElement, PathOp};
pub use table::{CellAlign, CellElement, RowElement, TableElement, TableStyle};

use crate::geometry::Rect;
use crate::pdf::image::ImageData;

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a color from normalized components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit components.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// The Base-14 Helvetica variants the writer embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Oblique,
}

impl FontStyle {
    /// PostScript base font name for the font dictionary.
    pub fn base_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Oblique => "Helvetica-Oblique",
        }
    }

    /// Resource dictionary key, used both when registering the font and
    /// in `Tf` operators. Hyphens are stripped so the two always agree.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "HelveticaBold",
            FontStyle::Oblique => "HelveticaOblique",
        }
    }

    /// All variants, for font registration.
    pub fn all() -> [FontStyle; 3] {
        [FontStyle::Regular, FontStyle::Bold, FontStyle::Oblique]
    }
}

/// A run of text anchored at its baseline start point.
#[derive(Debug, Clone)]
pub struct TextElement {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: FontStyle,
    pub size: f64,
    pub color: Color,
}

impl TextElement {
    pub fn new(text: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font: FontStyle::Regular,
            size,
            color: Color::BLACK,
        }
    }

    pub fn font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Approximate advance width. Helvetica averages close to half an em
    /// per glyph at text sizes, which is accurate enough for centering.
    pub fn width(&self) -> f64 {
        self.size * 0.5 * self.text.chars().count() as f64
    }

    /// Re-anchor so the run is centered on `center_x`.
    pub fn centered_on(mut self, center_x: f64) -> Self {
        self.x = center_x - self.width() / 2.0;
        self
    }

    /// Re-anchor so the run ends at `right_x`.
    pub fn right_aligned_at(mut self, right_x: f64) -> Self {
        self.x = right_x - self.width();
        self
    }
}

/// An image placed into a rectangle.
#[derive(Debug, Clone)]
pub struct ImageElement {
    pub image: ImageData,
    pub rect: Rect,
}

/// One paintable item on a page.
#[derive(Debug, Clone)]
pub enum Element {
    Text(TextElement),
    Path(PathElement),
    Image(ImageElement),
    Table(TableElement),
}

impl From<TextElement> for Element {
    fn from(e: TextElement) -> Self {
        Element::Text(e)
    }
}

impl From<PathElement> for Element {
    fn from(e: PathElement) -> Self {
        Element::Path(e)
    }
}

impl From<ImageElement> for Element {
    fn from(e: ImageElement) -> Self {
        Element::Image(e)
    }
}

impl From<TableElement> for Element {
    fn from(e: TableElement) -> Self {
        Element::Table(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_rgb8() {
        let c = Color::from_rgb8(255, 0, 51);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_font_names_agree() {
        for font in FontStyle::all() {
            assert_eq!(font.resource_name(), font.base_name().replace('-', ""));
        }
    }

    #[test]
    fn test_text_centering() {
        let text = TextElement::new("ABCD", 0.0, 0.0, 10.0).centered_on(100.0);
        // 4 chars at half an em of 10pt = 20pt wide
        assert_eq!(text.x, 90.0);
        let text = TextElement::new("ABCD", 0.0, 0.0, 10.0).right_aligned_at(100.0);
        assert_eq!(text.x, 80.0);
    }
}
