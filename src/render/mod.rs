//! Serialization of the document model to a `.docx` package.

mod docx;
mod escape;
mod package;
mod splice;

use crate::core::document::Document;
use crate::Result;

pub use docx::{DocxRenderer, CONTENT_WIDTH_TWIPS};
pub use escape::escape_xml;

pub trait Renderer {
    fn render(&self, document: &Document) -> Result<Vec<u8>>;
}
