//! Minimal PDF writer.
//!
//! Self-contained generation path: object model, content stream
//! operators, image XObjects, and document assembly with a classic
//! cross-reference table. Only the features the statement needs are
//! implemented; there is no reading side.

pub mod content;
pub mod image;
pub mod object;
pub mod writer;

pub use content::{ContentStreamBuilder, PendingImage};
pub use image::ImageData;
pub use object::{Object, ObjectRef, ObjectSerializer};
pub use writer::{PdfWriter, PdfWriterConfig};
