// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transactional bulk-import merge engine.
//!
//! Folds a parsed batch of entries into an existing collection under a
//! duplicate-resolution policy. Atomic: any abort returns the original
//! entries untouched, and `dry_run` never exposes a mutation regardless of
//! what the report says would have happened.

use crate::entry::{sort_entries, TagEntry};
use crate::parse::{parse_entries, RawRecord};
use crate::store::VOCABULARY_KEY;
use crate::validate::{validate, IssueCode};
use serde::Serialize;
use tracing::{debug, info, warn};

/// How to resolve an imported tag that already exists in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the existing entry; record the incoming one as skipped.
    #[default]
    Skip,
    /// Replace the existing entry in place.
    Overwrite,
    /// Abort the entire import on first conflict.
    Error,
}

/// Options controlling one import call.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Duplicate-resolution policy.
    pub on_duplicate: DuplicatePolicy,
    /// Compute the full report but never expose a mutated collection.
    pub dry_run: bool,
    /// Provenance label for the batch (e.g., the file it was read from).
    pub source: String,
}

/// One import failure, tied to the offending tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    /// Tag of the offending entry (empty for structural failures).
    pub tag: String,
    /// Machine-readable code.
    pub code: IssueCode,
    /// Human-readable explanation.
    pub message: String,
}

/// Structured outcome report; created fresh per import call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    /// Tags appended with no conflict.
    pub imported: Vec<String>,
    /// Tags dropped under the `Skip` policy.
    pub skipped: Vec<String>,
    /// Tags that replaced an existing entry under `Overwrite`.
    pub overwritten: Vec<String>,
    /// Per-entry and structural failures.
    pub errors: Vec<ImportError>,
    /// Store keys that a non-dry-run commit would rewrite.
    pub files_written: Vec<String>,
    /// Whether the import was abandoned with the input left untouched.
    pub aborted: bool,
    /// Provenance label from [`ImportOptions::source`].
    pub source: String,
}

/// Result of an import: the collection to adopt plus the report.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The merged collection, or a copy of the input if aborted/dry-run.
    pub next_entries: Vec<TagEntry>,
    /// What happened.
    pub report: ImportReport,
}

const REQUIRED_FIELDS: [&str; 5] = ["tag", "facet", "source", "note", "deprecated"];

/// Parse `text` and merge it into `existing` under `options`.
///
/// See the crate docs for the abort conditions; in every abort case
/// `next_entries` is a verbatim copy of `existing`.
pub fn import_from_text(
    existing: &[TagEntry],
    text: &str,
    options: &ImportOptions,
) -> ImportOutcome {
    let mut report = ImportReport {
        source: options.source.clone(),
        ..ImportReport::default()
    };

    let records = match parse_entries(text) {
        Ok(records) => records,
        Err(err) => {
            warn!(source = %options.source, %err, "import text failed to parse");
            report.aborted = true;
            report.errors.push(ImportError {
                tag: String::new(),
                code: IssueCode::ParseError,
                message: err.to_string(),
            });
            return aborted(existing, report);
        }
    };

    if records.is_empty() {
        report.aborted = true;
        report.errors.push(ImportError {
            tag: String::new(),
            code: IssueCode::EmptyInput,
            message: "import text contains no entries".to_owned(),
        });
        return aborted(existing, report);
    }

    let mut working = existing.to_vec();
    for record in &records {
        let Some(candidate) = extract_entry(record, &mut report) else {
            continue;
        };
        if !validate_candidate(&candidate, &mut report) {
            continue;
        }
        match find_conflict(&working, &candidate.tag) {
            Some(pos) => match options.on_duplicate {
                DuplicatePolicy::Skip => {
                    debug!(tag = %candidate.tag, "duplicate skipped");
                    report.skipped.push(candidate.tag);
                }
                DuplicatePolicy::Overwrite => {
                    debug!(tag = %candidate.tag, "duplicate overwritten");
                    report.overwritten.push(candidate.tag.clone());
                    working[pos] = candidate;
                }
                DuplicatePolicy::Error => {
                    report.aborted = true;
                    report.errors.push(ImportError {
                        tag: candidate.tag.clone(),
                        code: IssueCode::Duplicate,
                        message: format!("tag '{}' already exists", candidate.tag),
                    });
                    return aborted(existing, report);
                }
            },
            None => {
                report.imported.push(candidate.tag.clone());
                working.push(candidate);
            }
        }
    }

    // Nothing actionable in the whole batch: treat as a failed import
    // rather than silently succeeding with an unchanged collection.
    if report.imported.is_empty() && report.overwritten.is_empty() && report.skipped.is_empty() {
        report.aborted = true;
        return aborted(existing, report);
    }

    sort_entries(&mut working);
    let residual = validate(&working);
    if !residual.is_empty() {
        warn!(
            source = %options.source,
            issues = residual.len(),
            "merged vocabulary failed re-validation; import rolled back"
        );
        report.aborted = true;
        report.errors.extend(residual.into_iter().map(|issue| ImportError {
            tag: issue.tag,
            code: issue.code,
            message: issue.message,
        }));
        return aborted(existing, report);
    }

    info!(
        source = %options.source,
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        overwritten = report.overwritten.len(),
        dry_run = options.dry_run,
        "import merged"
    );

    if options.dry_run {
        return ImportOutcome {
            next_entries: existing.to_vec(),
            report,
        };
    }
    report.files_written.push(VOCABULARY_KEY.to_owned());
    ImportOutcome {
        next_entries: working,
        report,
    }
}

fn aborted(existing: &[TagEntry], report: ImportReport) -> ImportOutcome {
    ImportOutcome {
        next_entries: existing.to_vec(),
        report,
    }
}

/// Pull the five canonical fields out of a raw record. Field problems are
/// recorded on the report and skip the entry without aborting the batch.
fn extract_entry(record: &RawRecord, report: &mut ImportReport) -> Option<TagEntry> {
    let tag_label = record
        .get("tag")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_owned();

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !record.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        report.errors.push(ImportError {
            tag: tag_label.clone(),
            code: IssueCode::ParseError,
            message: format!("entry is missing required field(s): {}", missing.join(", ")),
        });
        return None;
    }

    let mut text = [const { String::new() }; 4];
    for (slot, name) in text.iter_mut().zip(["tag", "facet", "source", "note"]) {
        match record.get(name).and_then(crate::parse::Scalar::as_str) {
            Some(value) => *slot = value.to_owned(),
            None => {
                report.errors.push(ImportError {
                    tag: tag_label.clone(),
                    code: IssueCode::ParseError,
                    message: format!("field '{name}' must be a string"),
                });
                return None;
            }
        }
    }
    let [tag, facet, source, note] = text;

    let deprecated = match record.get("deprecated").and_then(crate::parse::Scalar::as_bool) {
        Some(b) => b,
        None => {
            report.errors.push(ImportError {
                tag: tag_label,
                code: IssueCode::DeprecatedBoolean,
                message: "field 'deprecated' must be a boolean".to_owned(),
            });
            return None;
        }
    };

    Some(TagEntry {
        tag,
        facet,
        source,
        note,
        deprecated,
    })
}

/// Validate a single candidate in isolation; all applicable issues are
/// recorded before the entry is dropped.
fn validate_candidate(candidate: &TagEntry, report: &mut ImportReport) -> bool {
    let issues = validate(std::slice::from_ref(candidate));
    if issues.is_empty() {
        return true;
    }
    report
        .errors
        .extend(issues.into_iter().map(|issue| ImportError {
            tag: issue.tag,
            code: issue.code,
            message: issue.message,
        }));
    false
}

/// Locate the conflict target for `tag`: an exact-case match always wins
/// over a case-insensitive one, so overwrite selection is deterministic.
fn find_conflict(entries: &[TagEntry], tag: &str) -> Option<usize> {
    entries
        .iter()
        .position(|e| e.tag == tag)
        .or_else(|| entries.iter().position(|e| e.tag.eq_ignore_ascii_case(tag)))
}
