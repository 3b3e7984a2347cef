pub mod accessor;
pub mod collect;
pub mod error;
pub mod model;
pub mod report;

use accessor::AnnotationSource;
use error::MarginaliaError;
use model::Extraction;

/// Main API entry point: pull severity-grouped review comments out of
/// a PDF.
///
/// The accessor walks pages and annotations; the collector filters,
/// decodes and classifies. Per-annotation problems are recorded on the
/// returned [`Extraction`], never raised — only document-level
/// failures (unparsable or encrypted files) error out.
pub fn load_comments(
    pdf_bytes: &[u8],
    source: &dyn AnnotationSource,
) -> Result<Extraction, MarginaliaError> {
    let pages = source.annotations(pdf_bytes)?;
    Ok(collect::collect_comments(&pages))
}
