use crate::accessor::{AnnotationSource, ContentText, PageAnnotations, RawAnnotation};
use crate::error::MarginaliaError;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// PDF annotation access backend using lopdf.
///
/// lopdf parses the whole document in memory, so no temp files or
/// external tools are involved.
pub struct LopdfSource;

impl LopdfSource {
    pub fn new() -> Self {
        LopdfSource
    }
}

impl Default for LopdfSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSource for LopdfSource {
    fn annotations(&self, pdf_bytes: &[u8]) -> Result<Vec<PageAnnotations>, MarginaliaError> {
        let doc = Document::load_mem(pdf_bytes).map_err(|e| {
            // lopdf reports password-protected files as load errors
            let msg = e.to_string();
            let lower = msg.to_lowercase();
            if lower.contains("encrypt") || lower.contains("decrypt") || lower.contains("password")
            {
                MarginaliaError::Encrypted
            } else {
                MarginaliaError::Parse(msg)
            }
        })?;

        if doc.is_encrypted() {
            return Err(MarginaliaError::Encrypted);
        }

        // get_pages keys are 1-based page numbers in document order
        let mut pages = Vec::new();
        for (page_number, page_id) in doc.get_pages() {
            pages.push(PageAnnotations {
                page_number: page_number as usize,
                annotations: page_annotations(&doc, page_id),
            });
        }

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "lopdf"
    }
}

/// Read the /Annots array of one page.
///
/// Entries that cannot be resolved to a dictionary are skipped rather
/// than failing the whole document.
fn page_annotations(doc: &Document, page_id: ObjectId) -> Vec<RawAnnotation> {
    let page_dict = match doc.get_object(page_id).and_then(Object::as_dict) {
        Ok(dict) => dict,
        Err(_) => return Vec::new(),
    };

    // /Annots may be a direct array or an indirect reference
    let annots_obj = match page_dict.get(b"Annots") {
        Ok(obj) => obj,
        Err(_) => return Vec::new(),
    };
    let annots = match resolve(doc, annots_obj).and_then(|o| o.as_array().ok()) {
        Some(array) => array,
        None => return Vec::new(),
    };

    let mut out = Vec::new();
    for entry in annots {
        let dict = match resolve(doc, entry).and_then(|o| o.as_dict().ok()) {
            Some(dict) => dict,
            None => continue,
        };
        out.push(RawAnnotation {
            subtype: subtype_of(dict),
            contents: contents_of(doc, dict),
        });
    }
    out
}

/// Follow an indirect reference, if any.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// /Subtype name, or empty if missing or not a name.
fn subtype_of(dict: &Dictionary) -> String {
    match dict.get(b"Subtype") {
        Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
        _ => String::new(),
    }
}

/// Raw /Contents bytes. Decoding is the collector's job.
fn contents_of(doc: &Document, dict: &Dictionary) -> Option<ContentText> {
    let obj = resolve(doc, dict.get(b"Contents").ok()?)?;
    match obj {
        Object::String(bytes, _) => Some(ContentText::Bytes(bytes.clone())),
        _ => None,
    }
}
