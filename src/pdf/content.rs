//! Content stream generation.
//!
//! Turns [`Element`](crate::elements::Element) values into PDF content
//! stream operators. Images cannot be painted inline; each placement is
//! recorded as a [`PendingImage`] that the writer registers as an
//! XObject in the page's resource dictionary.

use crate::elements::{
    CellAlign, CellElement, Color, Element, FontStyle, ImageElement, PaintMode, PathElement,
    PathOp, TableElement, TextElement,
};
use crate::geometry::{Point, Rect};
use crate::pdf::image::ImageData;

/// An image placement awaiting XObject registration.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub image: ImageData,
    /// Resource name used in the `Do` operator, e.g. `Im0`
    pub resource_id: String,
}

/// Builds one page's content stream.
#[derive(Debug, Default)]
pub struct ContentStreamBuilder {
    ops: String,
    current_font: Option<(FontStyle, u32)>,
    pending_images: Vec<PendingImage>,
}

impl ContentStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one element's operators.
    pub fn add_element(&mut self, element: &Element) {
        match element {
            Element::Text(text) => self.add_text(text),
            Element::Path(path) => self.add_path(path),
            Element::Image(image) => self.add_image(image),
            Element::Table(table) => self.add_table(table),
        }
    }

    /// Finish the stream, yielding the operator bytes and the images
    /// that must be registered on the page.
    pub fn finish(self) -> (Vec<u8>, Vec<PendingImage>) {
        (self.ops.into_bytes(), self.pending_images)
    }

    fn add_text(&mut self, text: &TextElement) {
        self.set_fill_color(text.color);
        self.ops.push_str("BT\n");
        self.set_font(text.font, text.size);
        self.push_op(&[text.x, text.y], "Td");
        self.ops.push('(');
        for ch in text.text.chars() {
            // WinAnsiEncoding covers Latin-1; anything outside degrades
            // to a question mark rather than corrupting the stream.
            let byte = if (ch as u32) <= 0xFF { ch as u32 as u8 } else { b'?' };
            match byte {
                b'(' | b')' | b'\\' => {
                    self.ops.push('\\');
                    self.ops.push(byte as char);
                },
                0x20..=0x7E => self.ops.push(byte as char),
                _ => {
                    self.ops.push_str(&format!("\\{:03o}", byte));
                },
            }
        }
        self.ops.push_str(") Tj\nET\n");
    }

    fn add_path(&mut self, path: &PathElement) {
        self.ops.push_str("q\n");
        match path.mode {
            PaintMode::Stroke => {
                self.set_stroke_state(path);
            },
            PaintMode::Fill => {
                self.set_fill_color(path.fill_color);
            },
            PaintMode::FillStroke => {
                self.set_stroke_state(path);
                self.set_fill_color(path.fill_color);
            },
        }
        for op in &path.ops {
            match op {
                PathOp::MoveTo(p) => self.push_op(&[p.x, p.y], "m"),
                PathOp::LineTo(p) => self.push_op(&[p.x, p.y], "l"),
                PathOp::CurveTo(c1, c2, end) => {
                    self.push_op(&[c1.x, c1.y, c2.x, c2.y, end.x, end.y], "c")
                },
                PathOp::Rect(r) => self.push_op(&[r.x, r.y, r.width, r.height], "re"),
                PathOp::Close => self.ops.push_str("h\n"),
            }
        }
        self.ops.push_str(match path.mode {
            PaintMode::Stroke => "S\n",
            PaintMode::Fill => "f\n",
            PaintMode::FillStroke => "B\n",
        });
        self.ops.push_str("Q\n");
        // Graphics state was restored; the font dedup cache survives Q
        // but color state assumptions do not matter since every painter
        // sets its own color first.
        self.current_font = None;
    }

    fn add_image(&mut self, image: &ImageElement) {
        let resource_id = format!("Im{}", self.pending_images.len());
        let r = image.rect;
        self.ops.push_str("q\n");
        self.push_op(&[r.width, 0.0, 0.0, r.height, r.x, r.y], "cm");
        self.ops.push_str(&format!("/{} Do\nQ\n", resource_id));
        self.pending_images.push(PendingImage {
            image: image.image.clone(),
            resource_id,
        });
    }

    fn add_table(&mut self, table: &TableElement) {
        let style = &table.style;
        let widths = table.absolute_widths();
        let top = table.rect.top();
        let left = table.rect.x;
        let total_width: f64 = widths.iter().sum();
        let total_height = table.height();

        // Backgrounds first, then text, then the grid on top.
        let mut row_top = top;
        for (row_index, cells) in std::iter::once(&table.header)
            .chain(table.rows.iter().map(|r| &r.cells))
            .enumerate()
        {
            let is_header = row_index == 0;
            let mut x = left;
            for (cell, width) in cells.iter().zip(&widths) {
                let background = cell
                    .background
                    .or(if is_header { Some(style.header_background) } else { None });
                if let Some(color) = background {
                    self.add_path(&PathElement::rect(
                        Rect::new(x, row_top - style.row_height, *width, style.row_height),
                        Some(color),
                        None,
                    ));
                }
                x += width;
            }
            row_top -= style.row_height;
        }

        let mut row_top = top;
        for (row_index, cells) in std::iter::once(&table.header)
            .chain(table.rows.iter().map(|r| &r.cells))
            .enumerate()
        {
            let is_header = row_index == 0;
            let size = if is_header { style.header_font_size } else { style.font_size };
            let baseline = row_top - style.row_height / 2.0 - size * 0.35;
            let mut x = left;
            for (cell, width) in cells.iter().zip(&widths) {
                self.add_cell_text(cell, x, baseline, *width, size, style.cell_padding, is_header);
                x += width;
            }
            row_top -= style.row_height;
        }

        self.add_grid(left, top, &widths, total_width, total_height, table);
    }

    fn add_cell_text(
        &mut self,
        cell: &CellElement,
        x: f64,
        baseline: f64,
        width: f64,
        size: f64,
        padding: f64,
        is_header: bool,
    ) {
        if cell.text.is_empty() {
            return;
        }
        let font = if is_header && cell.font == FontStyle::Regular {
            FontStyle::Bold
        } else {
            cell.font
        };
        let text_width = size * 0.5 * cell.text.chars().count() as f64;
        let text_x = match cell.align {
            CellAlign::Left => x + padding,
            CellAlign::Center => x + (width - text_width) / 2.0,
            CellAlign::Right => x + width - padding - text_width,
        };
        self.add_text(&TextElement {
            text: cell.text.clone(),
            x: text_x,
            y: baseline,
            font,
            size,
            color: cell.color,
        });
    }

    fn add_grid(
        &mut self,
        left: f64,
        top: f64,
        widths: &[f64],
        total_width: f64,
        total_height: f64,
        table: &TableElement,
    ) {
        let style = &table.style;
        let rows = table.rows.len() + 1;
        for i in 0..=rows {
            let y = top - i as f64 * style.row_height;
            self.add_path(&PathElement::line(
                Point::new(left, y),
                Point::new(left + total_width, y),
                style.border_color,
                style.border_width,
            ));
        }
        let mut x = left;
        for width in std::iter::once(&0.0).chain(widths.iter()) {
            x += width;
            self.add_path(&PathElement::line(
                Point::new(x, top),
                Point::new(x, top - total_height),
                style.border_color,
                style.border_width,
            ));
        }
    }

    fn set_font(&mut self, font: FontStyle, size: f64) {
        let key = (font, (size * 100.0) as u32);
        if self.current_font != Some(key) {
            self.ops
                .push_str(&format!("/{} {} Tf\n", font.resource_name(), num(size)));
            self.current_font = Some(key);
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.push_op(&[color.r as f64, color.g as f64, color.b as f64], "rg");
    }

    fn set_stroke_state(&mut self, path: &PathElement) {
        let c = path.stroke_color;
        self.push_op(&[c.r as f64, c.g as f64, c.b as f64], "RG");
        self.push_op(&[path.line_width], "w");
        match &path.dash {
            Some((pattern, phase)) => {
                let joined: Vec<String> = pattern.iter().map(|v| num(*v)).collect();
                self.ops
                    .push_str(&format!("[{}] {} d\n", joined.join(" "), num(*phase)));
            },
            None => self.ops.push_str("[] 0 d\n"),
        }
    }

    fn push_op(&mut self, operands: &[f64], operator: &str) {
        for v in operands {
            self.ops.push_str(&num(*v));
            self.ops.push(' ');
        }
        self.ops.push_str(operator);
        self.ops.push('\n');
    }
}

/// Format a number for a content stream, trimming trailing zeros.
fn num(value: f64) -> String {
    let mut s = format!("{:.3}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::RowElement;

    fn stream_of(element: Element) -> String {
        let mut builder = ContentStreamBuilder::new();
        builder.add_element(&element);
        let (bytes, _) = builder.finish();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_num_trims() {
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(2.0), "2");
        assert_eq!(num(0.125), "0.125");
    }

    #[test]
    fn test_text_block() {
        let stream = stream_of(
            TextElement::new("Hi (there)", 10.0, 20.0, 12.0)
                .font(FontStyle::Bold)
                .into(),
        );
        assert!(stream.contains("BT"));
        assert!(stream.contains("/HelveticaBold 12 Tf"));
        assert!(stream.contains("10 20 Td"));
        assert!(stream.contains("(Hi \\(there\\)) Tj"));
        assert!(stream.contains("ET"));
    }

    #[test]
    fn test_non_latin_degrades_to_question_mark() {
        let stream = stream_of(TextElement::new("a\u{20B9}b", 0.0, 0.0, 10.0).into());
        assert!(stream.contains("(a?b) Tj"));
    }

    #[test]
    fn test_stroked_path() {
        let stream = stream_of(
            PathElement::line(Point::new(0.0, 0.0), Point::new(5.0, 5.0), Color::BLACK, 2.0)
                .dashed(vec![3.0, 2.0], 0.0)
                .into(),
        );
        assert!(stream.contains("2 w"));
        assert!(stream.contains("[3 2] 0 d"));
        assert!(stream.contains("0 0 m"));
        assert!(stream.contains("5 5 l"));
        assert!(stream.ends_with("Q\n"));
        assert!(stream.contains("S\n"));
    }

    #[test]
    fn test_image_records_pending() {
        let image = ImageData {
            width: 2,
            height: 2,
            color_space: "DeviceRGB",
            bits_per_component: 8,
            filter: "FlateDecode",
            data: vec![0, 1, 2],
            soft_mask: None,
        };
        let mut builder = ContentStreamBuilder::new();
        builder.add_element(
            &ImageElement {
                image,
                rect: Rect::new(10.0, 20.0, 100.0, 50.0),
            }
            .into(),
        );
        let (bytes, pending) = builder.finish();
        let stream = String::from_utf8(bytes).unwrap();
        assert!(stream.contains("100 0 0 50 10 20 cm"));
        assert!(stream.contains("/Im0 Do"));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].resource_id, "Im0");
    }

    #[test]
    fn test_table_paints_header_and_grid() {
        let mut table = TableElement::new(
            Rect::new(0.0, 0.0, 100.0, 40.0),
            vec![0.5, 0.5],
            vec![CellElement::new("Name"), CellElement::new("Value")],
        );
        table.push_row(RowElement::new(vec![
            CellElement::new("Cash"),
            CellElement::new("100").align(CellAlign::Right),
        ]));
        let stream = stream_of(table.into());
        // Header text defaults to bold, data stays regular.
        assert!(stream.contains("/HelveticaBold"));
        assert!(stream.contains("(Cash) Tj"));
        // Grid: 3 horizontal + 3 vertical strokes.
        assert_eq!(stream.matches(" re\n").count(), 2); // two header backgrounds
        assert_eq!(stream.matches("S\n").count(), 6);
    }
}
