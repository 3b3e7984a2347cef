pub mod lopdf;

use crate::error::MarginaliaError;

/// Content text of an annotation as the backend hands it over.
///
/// PDF string objects are raw bytes until decoded; a backend that has
/// already-decoded text available can pass it through directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentText {
    Text(String),
    Bytes(Vec<u8>),
}

/// A single annotation object as found on a page.
#[derive(Debug, Clone)]
pub struct RawAnnotation {
    /// /Subtype name, empty if the annotation carries none.
    pub subtype: String,
    /// /Contents field, if present.
    pub contents: Option<ContentText>,
}

/// Annotations of a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageAnnotations {
    pub page_number: usize,
    pub annotations: Vec<RawAnnotation>,
}

/// Trait for PDF annotation access backends.
pub trait AnnotationSource: Send + Sync {
    /// Walk the document and return each page's annotations in
    /// document order, page numbers 1-based.
    fn annotations(&self, pdf_bytes: &[u8]) -> Result<Vec<PageAnnotations>, MarginaliaError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
