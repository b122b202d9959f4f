// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure validation engine for vocabulary collections.
//!
//! Every applicable issue for an entry is reported in one pass — no
//! short-circuiting — so a caller can summarize everything wrong with one
//! entry at once. `DEPRECATED_BOOLEAN` is only producible by the loose-data
//! normalizers (store load, import parse); the typed [`TagEntry`] cannot
//! represent a non-boolean `deprecated` field.

use crate::entry::{tag_is_well_formed, TagEntry, FACETS, MAX_TAG_LEN};
use serde::Serialize;
use std::fmt;

/// Machine-readable issue codes, rendered as their wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueCode {
    /// Facet is not in the controlled set.
    #[serde(rename = "INVALID_FACET")]
    InvalidFacet,
    /// Tag is empty, too long, or fails the `facet:value` pattern.
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat,
    /// Tag prefix does not match the declared facet.
    #[serde(rename = "FACET_FIELD_MATCH")]
    FacetFieldMatch,
    /// Exact-case duplicate of an earlier entry.
    #[serde(rename = "DUPLICATE")]
    Duplicate,
    /// Case-insensitive duplicate of an earlier entry.
    #[serde(rename = "CASE_DUPLICATE")]
    CaseDuplicate,
    /// `deprecated` scalar was not a boolean.
    #[serde(rename = "DEPRECATED_BOOLEAN")]
    DeprecatedBoolean,
    /// Structural failure while parsing import text or a persisted blob.
    #[serde(rename = "PARSE_ERROR")]
    ParseError,
    /// Import text parsed to an empty entry list.
    #[serde(rename = "EMPTY_INPUT")]
    EmptyInput,
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidFacet => "INVALID_FACET",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::FacetFieldMatch => "FACET_FIELD_MATCH",
            Self::Duplicate => "DUPLICATE",
            Self::CaseDuplicate => "CASE_DUPLICATE",
            Self::DeprecatedBoolean => "DEPRECATED_BOOLEAN",
            Self::ParseError => "PARSE_ERROR",
            Self::EmptyInput => "EMPTY_INPUT",
        };
        f.write_str(s)
    }
}

/// One validation finding, tied to the entry index it was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Index of the offending entry within the validated slice.
    pub index: usize,
    /// Tag of the offending entry (possibly empty for structural issues).
    pub tag: String,
    /// Machine-readable code.
    pub code: IssueCode,
    /// Human-readable explanation.
    pub message: String,
}

impl Issue {
    pub(crate) fn new(index: usize, tag: &str, code: IssueCode, message: String) -> Self {
        Self {
            index,
            tag: tag.to_owned(),
            code,
            message,
        }
    }
}

/// Check a collection against the vocabulary invariants. Pure; no side
/// effects. Duplicate checks flag every occurrence after the first.
pub fn validate(entries: &[TagEntry]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        check_facet(i, entry, &mut issues);
        check_tag_format(i, entry, &mut issues);
        check_facet_prefix(i, entry, &mut issues);
        check_duplicates(i, entry, &entries[..i], &mut issues);
    }
    issues
}

fn check_facet(i: usize, entry: &TagEntry, issues: &mut Vec<Issue>) {
    if !FACETS.contains(&entry.facet.as_str()) {
        issues.push(Issue::new(
            i,
            &entry.tag,
            IssueCode::InvalidFacet,
            format!("facet '{}' is not in the controlled set", entry.facet),
        ));
    }
}

fn check_tag_format(i: usize, entry: &TagEntry, issues: &mut Vec<Issue>) {
    if entry.tag.is_empty() {
        issues.push(Issue::new(
            i,
            &entry.tag,
            IssueCode::InvalidFormat,
            "tag is empty".to_owned(),
        ));
        return;
    }
    if entry.tag.len() > MAX_TAG_LEN {
        issues.push(Issue::new(
            i,
            &entry.tag,
            IssueCode::InvalidFormat,
            format!("tag exceeds {MAX_TAG_LEN} bytes"),
        ));
    }
    if !tag_is_well_formed(&entry.tag) {
        issues.push(Issue::new(
            i,
            &entry.tag,
            IssueCode::InvalidFormat,
            format!("tag '{}' does not match facet:value shape", entry.tag),
        ));
    }
}

fn check_facet_prefix(i: usize, entry: &TagEntry, issues: &mut Vec<Issue>) {
    // Only meaningful when the tag carries a prefix at all; a missing `:`
    // is already flagged as INVALID_FORMAT.
    if let Some(prefix) = entry.tag_prefix() {
        if prefix != entry.facet {
            issues.push(Issue::new(
                i,
                &entry.tag,
                IssueCode::FacetFieldMatch,
                format!(
                    "tag prefix '{}' does not match facet '{}'",
                    prefix, entry.facet
                ),
            ));
        }
    }
}

fn check_duplicates(i: usize, entry: &TagEntry, earlier: &[TagEntry], issues: &mut Vec<Issue>) {
    if earlier.iter().any(|e| e.tag == entry.tag) {
        issues.push(Issue::new(
            i,
            &entry.tag,
            IssueCode::Duplicate,
            format!("tag '{}' duplicates an earlier entry", entry.tag),
        ));
    } else if earlier
        .iter()
        .any(|e| e.tag.eq_ignore_ascii_case(&entry.tag))
    {
        issues.push(Issue::new(
            i,
            &entry.tag,
            IssueCode::CaseDuplicate,
            format!(
                "tag '{}' duplicates an earlier entry ignoring case",
                entry.tag
            ),
        ));
    }
}
