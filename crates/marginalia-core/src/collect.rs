use crate::accessor::{ContentText, PageAnnotations, RawAnnotation};
use crate::model::{Comment, Extraction, SkipReason, SkippedAnnotation};

/// Walk every page's annotations and group the usable comments by
/// severity.
///
/// Annotations are visited in page order, then annotation order within
/// the page, and the groups preserve that encounter order. Annotations
/// that carry no usable text are recorded as skipped, never as errors.
pub fn collect_comments(pages: &[PageAnnotations]) -> Extraction {
    let mut extraction = Extraction::default();

    for page in pages {
        for annot in &page.annotations {
            match qualify(annot) {
                Ok(text) => {
                    let (severity, body) = split_severity(&text);
                    extraction.groups.push(&Comment {
                        page_number: page.page_number,
                        severity,
                        text: body.to_string(),
                    });
                }
                Err(reason) => extraction.skipped.push(SkippedAnnotation {
                    page_number: page.page_number,
                    reason,
                }),
            }
        }
    }

    extraction
}

/// Decide whether an annotation contributes a comment, and with what
/// text.
fn qualify(annot: &RawAnnotation) -> Result<String, SkipReason> {
    // Popups duplicate the sticky-note body and must not double-count
    if annot.subtype.to_lowercase().contains("popup") {
        return Err(SkipReason::Popup);
    }

    let contents = annot.contents.as_ref().ok_or(SkipReason::NoContents)?;
    let text = match contents {
        ContentText::Text(text) => text.clone(),
        ContentText::Bytes(bytes) => decode_bytes(bytes).ok_or(SkipReason::Undecodable)?,
    };

    if text.is_empty() {
        return Err(SkipReason::EmptyContents);
    }
    Ok(text)
}

/// Decode a PDF string: UTF-8 first, UTF-16BE on failure.
///
/// Tab, line feed and carriage return pass through both decodings
/// unchanged.
fn decode_bytes(bytes: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(text.to_string());
    }
    decode_utf16_be(bytes)
}

/// UTF-16 big-endian with an optional FE FF byte-order mark.
fn decode_utf16_be(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Split the severity marker off a comment's raw text.
///
/// The severity is the count of leading '*' characters; the body is
/// whatever follows the marker and the whitespace run immediately
/// after it. Total over all inputs, the empty string included.
fn split_severity(raw: &str) -> (u32, &str) {
    let rest = raw.trim_start_matches('*');
    let severity = (raw.len() - rest.len()) as u32;
    (severity, rest.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_number: usize, annotations: Vec<RawAnnotation>) -> PageAnnotations {
        PageAnnotations {
            page_number,
            annotations,
        }
    }

    fn text_annot(subtype: &str, contents: &str) -> RawAnnotation {
        RawAnnotation {
            subtype: subtype.to_string(),
            contents: Some(ContentText::Text(contents.to_string())),
        }
    }

    #[test]
    fn severity_is_the_leading_asterisk_run() {
        assert_eq!(split_severity("no marker"), (0, "no marker"));
        assert_eq!(split_severity("* one"), (1, "one"));
        assert_eq!(split_severity("**Fix the header"), (2, "Fix the header"));
        assert_eq!(split_severity("*** \t spaced"), (3, "spaced"));
        assert_eq!(split_severity(""), (0, ""));
        assert_eq!(split_severity("** "), (2, ""));
    }

    #[test]
    fn marker_whitespace_run_may_span_lines() {
        let (severity, body) = split_severity("*\n\nfirst line\nsecond line");
        assert_eq!(severity, 1);
        assert_eq!(body, "first line\nsecond line");
    }

    #[test]
    fn asterisks_inside_the_body_are_kept() {
        assert_eq!(split_severity("* a *starred* word"), (1, "a *starred* word"));
    }

    #[test]
    fn decodes_utf8_bytes() {
        assert_eq!(
            decode_bytes("räksmörgås".as_bytes()),
            Some("räksmörgås".to_string())
        );
    }

    #[test]
    fn decodes_utf16be_with_bom() {
        let bytes = vec![0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_bytes(&bytes), Some("Hi".to_string()));
    }

    #[test]
    fn decodes_utf16be_without_bom() {
        // 'é' as a single UTF-16BE unit; 0xE9 makes the bytes invalid
        // UTF-8, so the fallback path is taken
        let bytes = vec![0x00, 0xE9];
        assert_eq!(decode_bytes(&bytes), Some("é".to_string()));
    }

    #[test]
    fn control_characters_survive_decoding() {
        let text = "line one\r\n\tline two";
        assert_eq!(decode_bytes(text.as_bytes()), Some(text.to_string()));

        let mut utf16 = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            utf16.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_bytes(&utf16), Some(text.to_string()));
    }

    #[test]
    fn undecodable_bytes_skip_the_annotation() {
        // Invalid UTF-8 and odd length, so UTF-16BE fails too
        let annot = RawAnnotation {
            subtype: "Text".to_string(),
            contents: Some(ContentText::Bytes(vec![0xFF, 0xFE, 0x00])),
        };
        let extraction = collect_comments(&[page(1, vec![annot])]);

        assert!(extraction.groups.is_empty());
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].reason, SkipReason::Undecodable);
        assert_eq!(extraction.undecodable_count(), 1);
    }

    #[test]
    fn popups_never_contribute_even_with_contents() {
        let extraction = collect_comments(&[page(
            1,
            vec![
                text_annot("Text", "the real note"),
                text_annot("Popup", "the real note"),
            ],
        )]);

        assert_eq!(extraction.groups.comment_count(), 1);
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].reason, SkipReason::Popup);
    }

    #[test]
    fn popup_match_is_case_insensitive_substring() {
        let extraction = collect_comments(&[page(
            1,
            vec![text_annot("POPUP", "x"), text_annot("popup", "y")],
        )]);
        assert!(extraction.groups.is_empty());
        assert_eq!(extraction.skipped.len(), 2);
    }

    #[test]
    fn missing_and_empty_contents_are_skipped() {
        let no_contents = RawAnnotation {
            subtype: "Highlight".to_string(),
            contents: None,
        };
        let extraction = collect_comments(&[page(
            3,
            vec![no_contents, text_annot("Text", "")],
        )]);

        assert!(extraction.groups.is_empty());
        let reasons: Vec<_> = extraction.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SkipReason::NoContents, SkipReason::EmptyContents]);
    }

    #[test]
    fn comments_keep_page_then_annotation_order() {
        let extraction = collect_comments(&[
            page(1, vec![text_annot("Text", "first"), text_annot("Text", "second")]),
            page(2, vec![text_annot("FreeText", "third")]),
        ]);

        let groups: Vec<_> = extraction.groups.iter_descending().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, 0);
        assert_eq!(groups[0].1, ["p1: first", "p1: second", "p2: third"]);
    }

    #[test]
    fn severities_group_independently() {
        let extraction = collect_comments(&[page(
            1,
            vec![
                text_annot("Text", "minor"),
                text_annot("Text", "* major"),
                text_annot("Text", "*** custom"),
            ],
        )]);

        let groups: Vec<_> = extraction.groups.iter_descending().collect();
        assert_eq!(groups[0], (3, ["p1: custom".to_string()].as_slice()));
        assert_eq!(groups[1], (1, ["p1: major".to_string()].as_slice()));
        assert_eq!(groups[2], (0, ["p1: minor".to_string()].as_slice()));
    }
}
