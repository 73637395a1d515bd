//! PDF document assembly.
//!
//! Pages are appended one at a time; [`PdfWriter::finish`] serializes
//! the whole document into a byte vector. Nothing touches the
//! filesystem here, so callers can write the file in one shot.

use crate::elements::{Element, FontStyle};
use crate::error::Result;
use crate::pdf::content::ContentStreamBuilder;
use crate::pdf::object::{Object, ObjectRef, ObjectSerializer};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;

/// Writer options.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// Flate-compress content streams
    pub compress: bool,
    /// Document title for the Info dictionary
    pub title: Option<String>,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            compress: true,
            title: None,
        }
    }
}

/// Incremental PDF document writer.
pub struct PdfWriter {
    config: PdfWriterConfig,
    next_id: u32,
    objects: Vec<(ObjectRef, Object)>,
    page_refs: Vec<ObjectRef>,
    pages_ref: ObjectRef,
    fonts: Vec<(FontStyle, ObjectRef)>,
}

impl PdfWriter {
    pub fn new(config: PdfWriterConfig) -> Self {
        let mut writer = Self {
            config,
            next_id: 1,
            objects: Vec::new(),
            page_refs: Vec::new(),
            pages_ref: ObjectRef::new(0),
            fonts: Vec::new(),
        };
        writer.pages_ref = writer.alloc();

        // The Base-14 Helvetica variants, registered once and shared by
        // every page's resource dictionary.
        for font in FontStyle::all() {
            let r = writer.alloc();
            writer.add_object(
                r,
                Object::dict(vec![
                    ("Type", Object::name("Font")),
                    ("Subtype", Object::name("Type1")),
                    ("BaseFont", Object::name(font.base_name())),
                    ("Encoding", Object::name("WinAnsiEncoding")),
                ]),
            );
            writer.fonts.push((font, r));
        }
        writer
    }

    fn alloc(&mut self) -> ObjectRef {
        let r = ObjectRef::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn add_object(&mut self, r: ObjectRef, object: Object) {
        self.objects.push((r, object));
    }

    /// Append a page of the given size painting `elements` in order.
    pub fn add_page(&mut self, width: f64, height: f64, elements: &[Element]) -> Result<()> {
        let mut builder = ContentStreamBuilder::new();
        for element in elements {
            builder.add_element(element);
        }
        let (stream, pending_images) = builder.finish();

        let mut content_dict = HashMap::new();
        let data = if self.config.compress {
            content_dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            compress(&stream)?
        } else {
            stream
        };
        let content_ref = self.alloc();
        self.add_object(
            content_ref,
            Object::Stream {
                dict: content_dict,
                data,
            },
        );

        // Register each placed image (and its soft mask) as an XObject
        // reachable from this page's resources.
        let mut xobjects = HashMap::new();
        for pending in pending_images {
            let soft_mask_ref = match (pending.image.build_soft_mask_dict(), &pending.image.soft_mask) {
                (Some(dict), Some(samples)) => {
                    let r = self.alloc();
                    self.add_object(
                        r,
                        Object::Stream {
                            dict,
                            data: samples.clone(),
                        },
                    );
                    Some(r)
                },
                _ => None,
            };
            let image_ref = self.alloc();
            self.add_object(
                image_ref,
                Object::Stream {
                    dict: pending.image.build_xobject_dict(soft_mask_ref),
                    data: pending.image.data.clone(),
                },
            );
            xobjects.insert(pending.resource_id, Object::Reference(image_ref));
        }

        let font_dict: HashMap<String, Object> = self
            .fonts
            .iter()
            .map(|(font, r)| (font.resource_name().to_string(), Object::Reference(*r)))
            .collect();
        let mut resources = vec![("Font", Object::Dictionary(font_dict))];
        if !xobjects.is_empty() {
            resources.push(("XObject", Object::Dictionary(xobjects)));
        }

        let page_ref = self.alloc();
        self.add_object(
            page_ref,
            Object::dict(vec![
                ("Type", Object::name("Page")),
                ("Parent", Object::Reference(self.pages_ref)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(width),
                        Object::Real(height),
                    ]),
                ),
                ("Contents", Object::Reference(content_ref)),
                ("Resources", Object::dict(resources)),
            ]),
        );
        self.page_refs.push(page_ref);
        Ok(())
    }

    /// Serialize the complete document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_refs.iter().map(|r| Object::Reference(*r)).collect();
        let count = kids.len() as i64;
        let pages_ref = self.pages_ref;
        self.add_object(
            pages_ref,
            Object::dict(vec![
                ("Type", Object::name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(count)),
            ]),
        );

        let catalog_ref = self.alloc();
        self.add_object(
            catalog_ref,
            Object::dict(vec![
                ("Type", Object::name("Catalog")),
                ("Pages", Object::Reference(pages_ref)),
            ]),
        );

        let mut info = vec![("Producer", Object::string("folio-statement"))];
        if let Some(title) = &self.config.title {
            info.push(("Title", Object::string(title)));
        }
        let info_ref = self.alloc();
        self.add_object(info_ref, Object::dict(info));

        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.7\n");
        out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        self.objects.sort_by_key(|(r, _)| r.id);
        let serializer = ObjectSerializer::new();
        let mut offsets: Vec<(u32, usize)> = Vec::with_capacity(self.objects.len());
        for (r, object) in &self.objects {
            offsets.push((r.id, out.len()));
            serializer.serialize_indirect(object, *r, &mut out);
        }

        let xref_offset = out.len();
        let size = self.next_id;
        out.extend_from_slice(format!("xref\n0 {}\n", size).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for id in 1..size {
            let offset = offsets
                .iter()
                .find(|(object_id, _)| *object_id == id)
                .map(|(_, offset)| *offset)
                .unwrap_or(0);
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        let mut trailer = Vec::new();
        serializer.serialize(
            &Object::dict(vec![
                ("Size", Object::Integer(size as i64)),
                ("Root", Object::Reference(catalog_ref)),
                ("Info", Object::Reference(info_ref)),
            ]),
            &mut trailer,
        );
        out.extend_from_slice(b"trailer\n");
        out.extend_from_slice(&trailer);
        out.extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", xref_offset).as_bytes());
        Ok(out)
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::TextElement;

    fn one_page_document(compress: bool) -> Vec<u8> {
        let mut writer = PdfWriter::new(PdfWriterConfig {
            compress,
            title: Some("Statement".to_string()),
        });
        let elements = vec![Element::Text(TextElement::new("Hello", 72.0, 720.0, 12.0))];
        writer.add_page(612.0, 792.0, &elements).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_document_framing() {
        let bytes = one_page_document(false);
        assert!(bytes.starts_with(b"%PDF-1.7\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type/Catalog"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("(Statement)"));
        assert!(text.contains("xref"));
        assert!(text.contains("startxref"));
    }

    #[test]
    fn test_uncompressed_content_visible() {
        let text = String::from_utf8_lossy(&one_page_document(false)).to_string();
        assert!(text.contains("(Hello) Tj"));
        assert!(!text.contains("/Filter/FlateDecode"));
    }

    #[test]
    fn test_compressed_content_hidden() {
        let text = String::from_utf8_lossy(&one_page_document(true)).to_string();
        assert!(!text.contains("(Hello) Tj"));
        assert!(text.contains("/Filter/FlateDecode"));
    }

    #[test]
    fn test_all_fonts_registered() {
        let text = String::from_utf8_lossy(&one_page_document(false)).to_string();
        assert!(text.contains("/BaseFont/Helvetica"));
        assert!(text.contains("/BaseFont/Helvetica-Bold"));
        assert!(text.contains("/BaseFont/Helvetica-Oblique"));
    }

    #[test]
    fn test_xref_entry_count_matches_size() {
        let bytes = one_page_document(false);
        let text = String::from_utf8_lossy(&bytes);
        let xref_at = text.rfind("xref\n0 ").unwrap();
        let rest = &text[xref_at..];
        let size: usize = rest
            .lines()
            .nth(1)
            .unwrap()
            .split_whitespace()
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        let entries = rest
            .lines()
            .skip(2)
            .take_while(|l| l.ends_with("f ") || l.ends_with("n "))
            .count();
        assert_eq!(entries, size);
    }
}
