// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vocabulary persistence: one versioned JSON blob under one config key.
//!
//! Reads fail safe: a blob that is structurally malformed or that fails
//! full re-validation after normalization loads as an empty vocabulary
//! flagged `corrupted`, never as partially-valid data and never as an
//! error. Writes are whole-collection replacements gated on validation.

use crate::entry::{sort_entries, TagEntry, DEFAULT_FACET};
use crate::validate::{validate, Issue, IssueCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taxon_app_core::config::{ConfigError, ConfigStore};
use thiserror::Error;
use tracing::{info, warn};

/// Config key the vocabulary blob lives under.
pub const VOCABULARY_KEY: &str = "vocabulary";

/// Current blob schema version.
pub const VOCABULARY_VERSION: u32 = 1;

/// The persisted blob shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyState {
    /// Blob schema version; always [`VOCABULARY_VERSION`] on write.
    pub version: u32,
    /// Sorted, validated entries.
    pub entries: Vec<TagEntry>,
}

/// Result of loading the persisted vocabulary.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    /// True when the stored blob was unusable and `entries` is empty.
    pub corrupted: bool,
    /// The loaded collection (empty when corrupted or absent).
    pub entries: Vec<TagEntry>,
    /// What was wrong, when `corrupted` is set.
    pub issues: Vec<Issue>,
}

/// Error type for vocabulary persistence.
#[derive(Debug, Error)]
pub enum VocabError {
    /// The collection failed validation; nothing was written.
    #[error("vocabulary failed validation with {} issue(s)", .issues.len())]
    Invalid {
        /// Everything wrong with the rejected collection.
        issues: Vec<Issue>,
    },
    /// Underlying storage failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Vocabulary store over any raw [`ConfigStore`].
pub struct VocabStore<S> {
    store: S,
    key: String,
}

impl<S> VocabStore<S> {
    /// Create a store using the default [`VOCABULARY_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, VOCABULARY_KEY)
    }

    /// Create a store under an explicit key (tests, side-by-side vocabularies).
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The config key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S> VocabStore<S>
where
    S: ConfigStore,
{
    /// Load the persisted vocabulary. Absent or empty blobs load as a clean
    /// empty collection; anything unusable loads as `corrupted` (see module
    /// docs). Only genuine storage failures surface as `Err`.
    pub fn load(&self) -> Result<LoadResult, VocabError> {
        let bytes = match self.store.load_raw(&self.key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(LoadResult::default()),
            Err(err) => return Err(err.into()),
        };
        if bytes.is_empty() {
            return Ok(LoadResult::default());
        }

        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %self.key, %err, "stored vocabulary is not valid JSON");
                return Ok(corrupted_result(vec![Issue::new(
                    0,
                    "",
                    IssueCode::ParseError,
                    format!("stored blob is not valid JSON: {err}"),
                )]));
            }
        };

        let Some(raw_entries) = entry_list(&value) else {
            warn!(key = %self.key, "stored vocabulary has no entry list");
            return Ok(corrupted_result(vec![Issue::new(
                0,
                "",
                IssueCode::ParseError,
                "stored blob is neither a list nor an object carrying one".to_owned(),
            )]));
        };

        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut issues = Vec::new();
        for (index, raw) in raw_entries.iter().enumerate() {
            match normalize_value_entry(index, raw) {
                Ok(entry) => entries.push(entry),
                Err(issue) => issues.push(issue),
            }
        }
        if !issues.is_empty() {
            warn!(key = %self.key, issues = issues.len(), "stored entries failed normalization");
            return Ok(corrupted_result(issues));
        }

        sort_entries(&mut entries);
        let issues = validate(&entries);
        if !issues.is_empty() {
            warn!(key = %self.key, issues = issues.len(), "stored vocabulary failed re-validation");
            return Ok(corrupted_result(issues));
        }

        Ok(LoadResult {
            corrupted: false,
            entries,
            issues: Vec::new(),
        })
    }

    /// Normalize, sort, re-validate, and persist the whole collection.
    /// Returns the entries exactly as written. No partial writes: a
    /// validation failure leaves the stored blob untouched.
    pub fn persist(&self, entries: &[TagEntry]) -> Result<Vec<TagEntry>, VocabError> {
        let mut normalized: Vec<TagEntry> = entries.iter().map(normalize_entry).collect();
        sort_entries(&mut normalized);
        let issues = validate(&normalized);
        if !issues.is_empty() {
            return Err(VocabError::Invalid { issues });
        }
        let state = VocabularyState {
            version: VOCABULARY_VERSION,
            entries: normalized.clone(),
        };
        let data = serde_json::to_vec_pretty(&state).map_err(ConfigError::from)?;
        self.store.save_raw(&self.key, &data)?;
        info!(key = %self.key, entries = normalized.len(), "vocabulary persisted");
        Ok(normalized)
    }
}

fn corrupted_result(issues: Vec<Issue>) -> LoadResult {
    LoadResult {
        corrupted: true,
        entries: Vec::new(),
        issues,
    }
}

/// Accept either a bare list or an object carrying an `entries` list.
fn entry_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(list) => Some(list),
        Value::Object(map) => map.get("entries").and_then(Value::as_array),
        _ => None,
    }
}

/// Normalize one loosely-typed stored entry into a [`TagEntry`].
fn normalize_value_entry(index: usize, raw: &Value) -> Result<TagEntry, Issue> {
    let Value::Object(map) = raw else {
        return Err(Issue::new(
            index,
            "",
            IssueCode::InvalidFormat,
            "stored entry is not a map".to_owned(),
        ));
    };

    let tag = match map.get("tag") {
        Some(Value::String(s)) => s.clone(),
        Some(_) | None => {
            return Err(Issue::new(
                index,
                "",
                IssueCode::InvalidFormat,
                "stored entry has no string 'tag'".to_owned(),
            ));
        }
    };

    let facet = match map.get("facet") {
        Some(Value::String(s)) => s.clone(),
        None => String::new(),
        Some(_) => {
            return Err(Issue::new(
                index,
                &tag,
                IssueCode::InvalidFormat,
                "stored entry 'facet' is not a string".to_owned(),
            ));
        }
    };

    let string_or_empty = |name: &str| -> Result<String, Issue> {
        match map.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            None => Ok(String::new()),
            Some(_) => Err(Issue::new(
                index,
                &tag,
                IssueCode::InvalidFormat,
                format!("stored entry '{name}' is not a string"),
            )),
        }
    };
    let source = string_or_empty("source")?;
    let note = string_or_empty("note")?;

    let deprecated = match map.get("deprecated") {
        Some(Value::Bool(b)) => *b,
        None => false,
        Some(_) => {
            return Err(Issue::new(
                index,
                &tag,
                IssueCode::DeprecatedBoolean,
                "stored entry 'deprecated' is not a boolean".to_owned(),
            ));
        }
    };

    Ok(normalize_entry(&TagEntry {
        tag,
        facet,
        source,
        note,
        deprecated,
    }))
}

/// Persist-time normalization: derive a missing facet from the tag prefix,
/// fall back to [`DEFAULT_FACET`], and coerce a prefix-less tag into
/// `facet:value` shape.
fn normalize_entry(entry: &TagEntry) -> TagEntry {
    let mut normalized = entry.clone();
    if normalized.facet.is_empty() {
        normalized.facet = normalized
            .tag_prefix()
            .map_or_else(|| DEFAULT_FACET.to_owned(), str::to_owned);
    }
    if !normalized.tag.is_empty() && !normalized.tag.contains(':') {
        normalized.tag = format!("{}:{}", normalized.facet, normalized.tag);
    }
    normalized
}
