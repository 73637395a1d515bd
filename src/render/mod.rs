//! Page construction.
//!
//! Templates in [`pages`] build [`Page`] values out of drawing elements;
//! nothing here touches the PDF syntax. Page sizes are in points and
//! differ per section to give tables and charts the proportions they
//! need.

pub mod chart;
pub mod pages;
pub mod style;
pub mod table;

use crate::elements::{Element, FontStyle, ImageElement, TextElement};
use crate::geometry::Rect;
use crate::pdf::ImageData;
use log::{debug, warn};
use std::path::Path;

/// Cover, summary, and holdings pages: 16in x 10in.
pub const STATEMENT_PAGE: (f64, f64) = (1152.0, 720.0);
/// FNO page: 12in x 14in, tall for table plus graph.
pub const FNO_PAGE: (f64, f64) = (864.0, 1008.0);
/// Realized gains page: 12in x 8in.
pub const REALIZED_PAGE: (f64, f64) = (864.0, 576.0);
/// Unrealized gains donut page: 8in x 4in.
pub const DONUT_PAGE: (f64, f64) = (576.0, 288.0);

/// One finished page: a size and elements in paint order.
#[derive(Debug, Clone)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new((width, height): (f64, f64)) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.extend(elements);
    }
}

/// Optional branding images looked up next to the inputs.
///
/// Branding never blocks a statement: a missing or undecodable image is
/// logged and skipped.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    pub logo: Option<ImageData>,
    pub header: Option<ImageData>,
    pub footer: Option<ImageData>,
}

impl Branding {
    /// Load `logo.png`, `header.png`, and `footer.png` from `dir`.
    pub fn load(dir: &Path) -> Self {
        Self {
            logo: Self::load_one(&dir.join("logo.png")),
            header: Self::load_one(&dir.join("header.png")),
            footer: Self::load_one(&dir.join("footer.png")),
        }
    }

    fn load_one(path: &Path) -> Option<ImageData> {
        if !path.is_file() {
            debug!("branding image {} not present", path.display());
            return None;
        }
        match ImageData::from_file(path) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!("skipping branding image {}: {}", path.display(), e);
                None
            },
        }
    }
}

/// Paint the header banner, footer banner, and page chrome text.
pub fn apply_chrome(page: &mut Page, branding: &Branding) {
    if let Some(header) = &branding.header {
        let strip = Rect::new(0.0, page.height - 50.0, page.width, 46.0);
        page.push(ImageElement {
            image: header.clone(),
            rect: header.fit_to_box(strip),
        });
    }
    if let Some(footer) = &branding.footer {
        let strip = Rect::new(0.0, 30.0, page.width, 30.0);
        page.push(ImageElement {
            image: footer.clone(),
            rect: footer.fit_to_box(strip),
        });
    }

    let now = chrono::Local::now();
    let stamp = format!(
        "Generated on {} at {}",
        now.format("%d-%b-%Y"),
        now.format("%I:%M %p")
    );
    page.push(
        TextElement::new(
            "This statement is for information purposes only and does not constitute investment advice.",
            36.0,
            16.0,
            7.0,
        )
        .font(FontStyle::Oblique)
        .color(style::SLATE),
    );
    page.push(
        TextElement::new(stamp, 0.0, 16.0, 7.0)
            .color(style::SLATE)
            .right_aligned_at(page.width - 36.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_collects_elements() {
        let mut page = Page::new(STATEMENT_PAGE);
        page.push(TextElement::new("x", 0.0, 0.0, 10.0));
        assert_eq!(page.width, 1152.0);
        assert_eq!(page.elements.len(), 1);
    }

    #[test]
    fn test_branding_absent_files_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let branding = Branding::load(dir.path());
        assert!(branding.logo.is_none());
        assert!(branding.header.is_none());
        assert!(branding.footer.is_none());
    }

    #[test]
    fn test_branding_bad_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"not a png").unwrap();
        let branding = Branding::load(dir.path());
        assert!(branding.logo.is_none());
    }

    #[test]
    fn test_chrome_adds_footer_text() {
        let mut page = Page::new(STATEMENT_PAGE);
        apply_chrome(&mut page, &Branding::default());
        assert_eq!(page.elements.len(), 2);
    }
}
