use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single review comment pulled from a PDF annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// 1-based page the annotation sits on.
    pub page_number: usize,
    /// Count of leading '*' characters in the raw contents.
    pub severity: u32,
    /// Comment body with the severity marker stripped.
    pub text: String,
}

impl Comment {
    /// Display form used in the report.
    pub fn display_line(&self) -> String {
        format!("p{}: {}", self.page_number, self.text)
    }
}

/// Display name for a severity level.
///
/// Severities beyond the named ones get a generated fallback so longer
/// marker runs still produce a readable header.
pub fn severity_name(severity: u32) -> String {
    match severity {
        0 => "Minor comments".to_string(),
        1 => "Major comments".to_string(),
        n => format!("Comments, severity {n}"),
    }
}

/// Comments grouped by severity, each group in document order.
///
/// A group exists only once a first comment is pushed into it, so a
/// severity with no comments never shows up in the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentGroups {
    groups: BTreeMap<u32, Vec<String>>,
}

impl CommentGroups {
    pub fn push(&mut self, comment: &Comment) {
        self.groups
            .entry(comment.severity)
            .or_default()
            .push(comment.display_line());
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of collected comments across all severities.
    pub fn comment_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Groups in descending severity order (highest first).
    pub fn iter_descending(&self) -> impl Iterator<Item = (u32, &[String])> {
        self.groups
            .iter()
            .rev()
            .map(|(severity, lines)| (*severity, lines.as_slice()))
    }
}

/// Why a visited annotation contributed no comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Popup annotations duplicate their parent's contents.
    Popup,
    /// No /Contents entry at all.
    NoContents,
    /// Contents decoded to an empty string.
    EmptyContents,
    /// Contents bytes were neither UTF-8 nor UTF-16BE.
    Undecodable,
}

/// An annotation that was visited but contributed no comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAnnotation {
    pub page_number: usize,
    pub reason: SkipReason,
}

/// Outcome of a collection pass: the report groups plus skip
/// diagnostics. The diagnostics are never part of the report itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub groups: CommentGroups,
    pub skipped: Vec<SkippedAnnotation>,
}

impl Extraction {
    /// Number of annotations skipped because their contents could not
    /// be decoded.
    pub fn undecodable_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| s.reason == SkipReason::Undecodable)
            .count()
    }
}
