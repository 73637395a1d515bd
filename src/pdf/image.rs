//! Image XObject preparation.
//!
//! PNGs are decoded and re-encoded as zlib-compressed raw samples, with
//! the alpha channel split out into a soft mask. JPEGs pass through
//! untouched under `DCTDecode`; only the frame header is parsed for
//! dimensions.

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::pdf::object::{Object, ObjectRef};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Decoded image ready to embed as an XObject.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// `DeviceRGB` or `DeviceGray`
    pub color_space: &'static str,
    pub bits_per_component: u8,
    /// `FlateDecode` or `DCTDecode`
    pub filter: &'static str,
    /// Encoded sample data
    pub data: Vec<u8>,
    /// Zlib-compressed 8-bit alpha samples, when the source had alpha
    pub soft_mask: Option<Vec<u8>>,
}

impl ImageData {
    /// Load an image file, dispatching on the magic bytes.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Decode from raw bytes, dispatching on the magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Self::from_png(bytes)
        } else if bytes.starts_with(&[0xFF, 0xD8]) {
            Self::from_jpeg(bytes)
        } else {
            Err(Error::Image("unrecognized image format".to_string()))
        }
    }

    /// Decode a PNG into flate-compressed RGB samples plus a soft mask
    /// when an alpha channel is present.
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| Error::Image(format!("PNG decode failed: {}", e)))?;
        let width = decoded.width();
        let height = decoded.height();

        let (rgb, alpha) = if decoded.color().has_alpha() {
            let rgba = decoded.to_rgba8().into_raw();
            let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for px in rgba.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
                alpha.push(px[3]);
            }
            (rgb, Some(alpha))
        } else {
            (decoded.to_rgb8().into_raw(), None)
        };

        let soft_mask = match alpha {
            Some(samples) => Some(compress(&samples)?),
            None => None,
        };

        Ok(Self {
            width,
            height,
            color_space: "DeviceRGB",
            bits_per_component: 8,
            filter: "FlateDecode",
            data: compress(&rgb)?,
            soft_mask,
        })
    }

    /// Wrap a JPEG for pass-through embedding.
    pub fn from_jpeg(bytes: &[u8]) -> Result<Self> {
        let (width, height, components) = jpeg_frame_header(bytes)?;
        Ok(Self {
            width,
            height,
            color_space: if components == 1 { "DeviceGray" } else { "DeviceRGB" },
            bits_per_component: 8,
            filter: "DCTDecode",
            data: bytes.to_vec(),
            soft_mask: None,
        })
    }

    /// Image XObject stream dictionary, referencing the soft mask object
    /// when one was registered.
    pub fn build_xobject_dict(&self, soft_mask: Option<ObjectRef>) -> HashMap<String, Object> {
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Image"));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert("ColorSpace".to_string(), Object::name(self.color_space));
        dict.insert(
            "BitsPerComponent".to_string(),
            Object::Integer(self.bits_per_component as i64),
        );
        dict.insert("Filter".to_string(), Object::name(self.filter));
        if let Some(mask) = soft_mask {
            dict.insert("SMask".to_string(), Object::Reference(mask));
        }
        dict
    }

    /// Stream dictionary for the soft-mask XObject, if the image has one.
    pub fn build_soft_mask_dict(&self) -> Option<HashMap<String, Object>> {
        self.soft_mask.as_ref()?;
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Image"));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert("ColorSpace".to_string(), Object::name("DeviceGray"));
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
        dict.insert("Filter".to_string(), Object::name("FlateDecode"));
        Some(dict)
    }

    /// Largest aspect-preserving placement centered inside `rect`.
    pub fn fit_to_box(&self, rect: Rect) -> Rect {
        if self.width == 0 || self.height == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
            return Rect::new(rect.x, rect.y, 0.0, 0.0);
        }
        let scale = (rect.width / self.width as f64).min(rect.height / self.height as f64);
        let width = self.width as f64 * scale;
        let height = self.height as f64 * scale;
        Rect::new(
            rect.x + (rect.width - width) / 2.0,
            rect.y + (rect.height - height) / 2.0,
            width,
            height,
        )
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Walk the JPEG marker stream to the first SOF frame header and return
/// (width, height, component count).
fn jpeg_frame_header(bytes: &[u8]) -> Result<(u32, u32, u8)> {
    let err = || Error::Image("truncated JPEG".to_string());
    let mut pos = 2; // past SOI
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = bytes[pos + 1];
        // SOF0..SOF15 except DHT/JPG/DAC carry the frame header
        let is_sof = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if is_sof {
            let body = pos + 4;
            if body + 6 > bytes.len() {
                return Err(err());
            }
            let height = u16::from_be_bytes([bytes[body + 1], bytes[body + 2]]) as u32;
            let width = u16::from_be_bytes([bytes[body + 3], bytes[body + 4]]) as u32;
            let components = bytes[body + 5];
            return Ok((width, height, components));
        }
        pos += 2 + length;
    }
    Err(err())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32, with_alpha: bool) -> Vec<u8> {
        let mut out = Vec::new();
        if with_alpha {
            let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 128]));
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
                .unwrap();
        } else {
            let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
                .unwrap();
        }
        out
    }

    #[test]
    fn test_png_without_alpha() {
        let data = ImageData::from_bytes(&png_bytes(4, 3, false)).unwrap();
        assert_eq!((data.width, data.height), (4, 3));
        assert_eq!(data.filter, "FlateDecode");
        assert!(data.soft_mask.is_none());
    }

    #[test]
    fn test_png_with_alpha_gets_soft_mask() {
        let data = ImageData::from_bytes(&png_bytes(2, 2, true)).unwrap();
        assert!(data.soft_mask.is_some());
        assert!(data.build_soft_mask_dict().is_some());
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        assert!(matches!(
            ImageData::from_bytes(b"not an image"),
            Err(Error::Image(_))
        ));
    }

    #[test]
    fn test_jpeg_frame_header() {
        // Minimal stream: SOI, APP0 (empty), SOF0 with 8x5, 3 components.
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x02];
        jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x05, 0x00, 0x08, 0x03]);
        let (width, height, components) = jpeg_frame_header(&jpeg).unwrap();
        assert_eq!((width, height, components), (8, 5, 3));
    }

    #[test]
    fn test_xobject_dict_has_no_decode_parms() {
        let data = ImageData::from_bytes(&png_bytes(2, 2, false)).unwrap();
        let dict = data.build_xobject_dict(None);
        assert!(!dict.contains_key("DecodeParms"));
        assert_eq!(dict["Filter"], Object::name("FlateDecode"));
    }

    #[test]
    fn test_fit_to_box_preserves_aspect() {
        let data = ImageData::from_bytes(&png_bytes(100, 50, false)).unwrap();
        let placed = data.fit_to_box(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(placed.width, 50.0);
        assert_eq!(placed.height, 25.0);
        assert_eq!(placed.y, 12.5);
    }
}
