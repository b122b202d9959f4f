// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The controlled-vocabulary entry model.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The closed set of facets a tag may belong to.
pub const FACETS: [&str; 8] = [
    "topic", "field", "method", "region", "period", "genre", "lang", "status",
];

/// Fallback facet assigned when normalization cannot derive one.
pub const DEFAULT_FACET: &str = "topic";

/// Maximum accepted tag length, in bytes.
pub const MAX_TAG_LEN: usize = 120;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // fixed pattern, exercised by tests
    let pattern = Regex::new(r"^[a-z_]+:[A-Za-z0-9/_.-]+$").unwrap();
    pattern
});

/// One controlled-vocabulary record.
///
/// Invariants (enforced by [`crate::validate::validate`], not the type):
/// the tag matches `^[a-z_]+:[A-Za-z0-9/_.-]+$` and is at most
/// [`MAX_TAG_LEN`] bytes, the facet is one of [`FACETS`], the tag's prefix
/// before `:` equals the facet, and the tag is unique in its collection both
/// case-sensitively and case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    /// Full tag in `facet:value` shape.
    pub tag: String,
    /// Facet the tag is filed under; must equal the tag's prefix.
    pub facet: String,
    /// Provenance label (who or what introduced the entry).
    pub source: String,
    /// Free-form annotation.
    pub note: String,
    /// Deprecated entries are kept in storage but excluded from export.
    pub deprecated: bool,
}

impl TagEntry {
    /// Construct an entry from its five canonical fields.
    pub fn new(
        tag: impl Into<String>,
        facet: impl Into<String>,
        source: impl Into<String>,
        note: impl Into<String>,
        deprecated: bool,
    ) -> Self {
        Self {
            tag: tag.into(),
            facet: facet.into(),
            source: source.into(),
            note: note.into(),
            deprecated,
        }
    }

    /// The tag's facet prefix (text before the first `:`), if any.
    pub fn tag_prefix(&self) -> Option<&str> {
        self.tag.split_once(':').map(|(prefix, _)| prefix)
    }
}

/// Whether `tag` matches the canonical `facet:value` shape and length cap.
pub fn tag_is_well_formed(tag: &str) -> bool {
    !tag.is_empty() && tag.len() <= MAX_TAG_LEN && TAG_PATTERN.is_match(tag)
}

/// Sort entries by `(facet, tag)` ascending, case-insensitively, so
/// persistence and diffing are deterministic.
pub fn sort_entries(entries: &mut [TagEntry]) {
    entries.sort_by(|a, b| {
        let ka = (a.facet.to_lowercase(), a.tag.to_lowercase());
        let kb = (b.facet.to_lowercase(), b.tag.to_lowercase());
        ka.cmp(&kb)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_tags_pass_the_pattern() {
        assert!(tag_is_well_formed("topic:existing"));
        assert!(tag_is_well_formed("field:ce/ug"));
        assert!(tag_is_well_formed("lang:pt-BR"));
        assert!(tag_is_well_formed("status:v1.2_draft"));
    }

    #[test]
    fn malformed_tags_fail_the_pattern() {
        assert!(!tag_is_well_formed(""));
        assert!(!tag_is_well_formed("topic"));
        assert!(!tag_is_well_formed("Topic:caps-prefix"));
        assert!(!tag_is_well_formed("topic:"));
        assert!(!tag_is_well_formed("topic:spa ce"));
        assert!(!tag_is_well_formed(&format!("topic:{}", "x".repeat(MAX_TAG_LEN))));
    }

    #[test]
    fn sort_is_by_facet_then_tag_case_insensitive() {
        let mut entries = vec![
            TagEntry::new("topic:b", "topic", "", "", false),
            TagEntry::new("field:z", "field", "", "", false),
            TagEntry::new("topic:A", "topic", "", "", false),
        ];
        sort_entries(&mut entries);
        let tags: Vec<_> = entries.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["field:z", "topic:A", "topic:b"]);
    }
}
