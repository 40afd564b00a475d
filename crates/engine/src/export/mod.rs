//! Exporters for the currently filtered subset.
//!
//! Both produce an [`Artifact`]: the bytes of a downloadable file together with
//! its fixed name. Nothing is produced when a precondition fails.

mod document;
#[cfg(feature = "pdf")]
mod pdf;
mod tabular;

pub use document::{
    Align, Document, DocumentRenderer, PAGE_HEIGHT, PAGE_WIDTH, PRODUCT_LABEL, Page, Text,
    export_document, layout_document,
};
#[cfg(feature = "pdf")]
pub use pdf::PdfRenderer;
pub use tabular::{HEADER, export_tabular};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
