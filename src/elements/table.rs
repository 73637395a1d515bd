//! Table element.
//!
//! A table is a header row plus data rows laid out top-down inside a
//! rectangle. Column widths are fractions of the rectangle width so
//! templates stay independent of page size.

use super::{Color, FontStyle};
use crate::geometry::Rect;

/// Visual parameters shared by a whole table.
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub font_size: f64,
    pub header_font_size: f64,
    pub row_height: f64,
    pub border_width: f64,
    pub border_color: Color,
    pub cell_padding: f64,
    pub header_background: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            header_font_size: 10.0,
            row_height: 20.0,
            border_width: 0.75,
            border_color: Color::from_rgb8(120, 120, 120),
            cell_padding: 4.0,
            header_background: Color::from_rgb8(230, 230, 230),
        }
    }
}

/// Horizontal alignment within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// One table cell.
#[derive(Debug, Clone)]
pub struct CellElement {
    pub text: String,
    pub align: CellAlign,
    pub font: FontStyle,
    pub color: Color,
    /// Overrides the row background when set
    pub background: Option<Color>,
}

impl CellElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align: CellAlign::Left,
            font: FontStyle::Regular,
            color: Color::BLACK,
            background: None,
        }
    }

    pub fn align(mut self, align: CellAlign) -> Self {
        self.align = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.font = FontStyle::Bold;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// One table row.
#[derive(Debug, Clone, Default)]
pub struct RowElement {
    pub cells: Vec<CellElement>,
}

impl RowElement {
    pub fn new(cells: Vec<CellElement>) -> Self {
        Self { cells }
    }
}

/// A complete table placed on a page.
///
/// `rect.top()` is the top edge of the header row; rows grow downward.
/// `rect.height` is ignored in favor of the computed height.
#[derive(Debug, Clone)]
pub struct TableElement {
    pub rect: Rect,
    /// Fractions of `rect.width`, one per column
    pub column_widths: Vec<f64>,
    pub header: Vec<CellElement>,
    pub rows: Vec<RowElement>,
    pub style: TableStyle,
}

impl TableElement {
    pub fn new(rect: Rect, column_widths: Vec<f64>, header: Vec<CellElement>) -> Self {
        Self {
            rect,
            column_widths,
            header,
            rows: Vec::new(),
            style: TableStyle::default(),
        }
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn push_row(&mut self, row: RowElement) {
        self.rows.push(row);
    }

    /// Total height including the header row.
    pub fn height(&self) -> f64 {
        (self.rows.len() + 1) as f64 * self.style.row_height
    }

    /// Absolute column widths in page units.
    pub fn absolute_widths(&self) -> Vec<f64> {
        self.column_widths
            .iter()
            .map(|f| f * self.rect.width)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_counts_header() {
        let rect = Rect::new(0.0, 0.0, 100.0, 0.0);
        let mut table = TableElement::new(rect, vec![0.5, 0.5], vec![
            CellElement::new("A"),
            CellElement::new("B"),
        ]);
        table.push_row(RowElement::new(vec![CellElement::new("1"), CellElement::new("2")]));
        table.push_row(RowElement::new(vec![CellElement::new("3"), CellElement::new("4")]));
        assert_eq!(table.height(), 3.0 * table.style.row_height);
    }

    #[test]
    fn test_absolute_widths() {
        let rect = Rect::new(0.0, 0.0, 200.0, 0.0);
        let table = TableElement::new(rect, vec![0.25, 0.75], vec![]);
        assert_eq!(table.absolute_widths(), vec![50.0, 150.0]);
    }

    #[test]
    fn test_cell_builder() {
        let cell = CellElement::new("42").align(CellAlign::Right).bold();
        assert_eq!(cell.align, CellAlign::Right);
        assert_eq!(cell.font, FontStyle::Bold);
        assert!(cell.background.is_none());
    }
}
