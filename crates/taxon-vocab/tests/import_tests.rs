// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

mod common;

use common::entry;
use taxon_vocab::{
    import_from_text, DuplicatePolicy, ImportOptions, IssueCode, TagEntry, VOCABULARY_KEY,
};

fn options(on_duplicate: DuplicatePolicy) -> ImportOptions {
    ImportOptions {
        on_duplicate,
        dry_run: false,
        source: "test-batch".to_owned(),
    }
}

const CONFLICT_AND_NEW: &str = "\
- tag: topic:existing
  facet: topic
  source: import
  note:
  deprecated: false
- tag: field:ce/ug
  facet: field
  source: import
  note:
  deprecated: false
";

#[test]
fn skip_policy_keeps_existing_and_appends_new() {
    let existing = vec![entry("topic:existing", "topic")];
    let outcome = import_from_text(&existing, CONFLICT_AND_NEW, &options(DuplicatePolicy::Skip));

    assert!(!outcome.report.aborted);
    assert_eq!(outcome.report.skipped, ["topic:existing"]);
    assert_eq!(outcome.report.imported, ["field:ce/ug"]);
    assert_eq!(outcome.next_entries.len(), 2);
    // Sorted by (facet, tag): field before topic.
    assert_eq!(outcome.next_entries[0].tag, "field:ce/ug");
    assert_eq!(outcome.next_entries[1].tag, "topic:existing");
    // Existing entry survives untouched.
    assert_eq!(outcome.next_entries[1].source, "test");
    assert_eq!(outcome.report.files_written, [VOCABULARY_KEY]);
}

#[test]
fn error_policy_aborts_on_first_conflict() {
    let existing = vec![entry("topic:existing", "topic")];
    let outcome = import_from_text(&existing, CONFLICT_AND_NEW, &options(DuplicatePolicy::Error));

    assert!(outcome.report.aborted);
    assert_eq!(outcome.report.errors[0].code, IssueCode::Duplicate);
    assert_eq!(outcome.report.errors[0].tag, "topic:existing");
    assert_eq!(outcome.next_entries, existing);
    assert!(outcome.report.files_written.is_empty());
}

#[test]
fn overwrite_policy_replaces_in_place() {
    let existing = vec![entry("topic:existing", "topic")];
    let outcome = import_from_text(
        &existing,
        CONFLICT_AND_NEW,
        &options(DuplicatePolicy::Overwrite),
    );

    assert!(!outcome.report.aborted);
    assert_eq!(outcome.report.overwritten, ["topic:existing"]);
    assert_eq!(outcome.report.imported, ["field:ce/ug"]);
    assert_eq!(outcome.next_entries.len(), 2);
    let replaced = outcome
        .next_entries
        .iter()
        .find(|e| e.tag == "topic:existing")
        .unwrap();
    // The incoming entry's fields won.
    assert_eq!(replaced.source, "import");
}

#[test]
fn exact_case_match_wins_over_case_insensitive_for_overwrite() {
    let existing = vec![entry("topic:Mixed", "topic"), entry("topic:mixed", "topic")];
    // Existing collection is already case-conflicted; import targets the
    // exact-case entry and the residual check still sees the old conflict.
    let text = "\
- tag: topic:mixed
  facet: topic
  source: import
  note: replaced
  deprecated: false
";
    let outcome = import_from_text(&existing, text, &options(DuplicatePolicy::Overwrite));
    // Residual case-duplicate between the two existing tags aborts the lot.
    assert!(outcome.report.aborted);
    assert_eq!(outcome.next_entries, existing);
    assert!(outcome
        .report
        .errors
        .iter()
        .any(|e| e.code == IssueCode::CaseDuplicate));
    // But the overwrite did pick the exact-case target first.
    assert_eq!(outcome.report.overwritten, ["topic:mixed"]);
}

#[test]
fn case_insensitive_conflict_is_found_when_no_exact_match() {
    let existing = vec![entry("topic:Mixed", "topic")];
    let text = "\
- tag: topic:mixed
  facet: topic
  source: import
  note:
  deprecated: false
";
    let outcome = import_from_text(&existing, text, &options(DuplicatePolicy::Skip));
    assert!(!outcome.report.aborted);
    assert_eq!(outcome.report.skipped, ["topic:mixed"]);
    assert_eq!(outcome.next_entries, existing);
}

#[test]
fn dry_run_reports_fully_but_never_mutates() {
    let existing = vec![entry("topic:existing", "topic")];
    let mut opts = options(DuplicatePolicy::Skip);
    opts.dry_run = true;
    let outcome = import_from_text(&existing, CONFLICT_AND_NEW, &opts);

    assert!(!outcome.report.aborted);
    assert_eq!(outcome.report.imported, ["field:ce/ug"]);
    assert_eq!(outcome.report.skipped, ["topic:existing"]);
    assert_eq!(outcome.next_entries, existing);
    assert!(outcome.report.files_written.is_empty());
}

#[test]
fn structural_parse_failure_aborts_with_parse_error() {
    let existing = vec![entry("topic:existing", "topic")];
    let outcome = import_from_text(
        &existing,
        "this is not a list\n",
        &options(DuplicatePolicy::Skip),
    );
    assert!(outcome.report.aborted);
    assert_eq!(outcome.report.errors.len(), 1);
    assert_eq!(outcome.report.errors[0].code, IssueCode::ParseError);
    assert_eq!(outcome.next_entries, existing);
}

#[test]
fn empty_input_aborts_with_empty_input() {
    let outcome = import_from_text(&[], "# just a comment\n", &options(DuplicatePolicy::Skip));
    assert!(outcome.report.aborted);
    assert_eq!(outcome.report.errors[0].code, IssueCode::EmptyInput);
    assert!(outcome.next_entries.is_empty());
}

#[test]
fn missing_required_fields_abort_when_nothing_else_imports() {
    let outcome = import_from_text(
        &[],
        "- tag: topic:lonely\n",
        &options(DuplicatePolicy::Skip),
    );
    assert!(outcome.report.aborted);
    assert_eq!(outcome.report.errors[0].code, IssueCode::ParseError);
    assert!(outcome
        .report
        .errors[0]
        .message
        .contains("missing required field"));
    assert!(outcome.next_entries.is_empty());
}

#[test]
fn entry_level_failures_do_not_sink_the_rest_of_the_batch() {
    let text = "\
- tag: topic:good
  facet: topic
  source: import
  note:
  deprecated: false
- tag: bogus!!
  facet: topic
  source: import
  note:
  deprecated: false
";
    let outcome = import_from_text(&[], text, &options(DuplicatePolicy::Skip));
    assert!(!outcome.report.aborted);
    assert_eq!(outcome.report.imported, ["topic:good"]);
    assert!(outcome
        .report
        .errors
        .iter()
        .any(|e| e.code == IssueCode::InvalidFormat && e.tag == "bogus!!"));
    assert_eq!(outcome.next_entries.len(), 1);
}

#[test]
fn quoted_true_for_deprecated_is_rejected_as_non_boolean() {
    let text = "\
- tag: topic:q
  facet: topic
  source: import
  note:
  deprecated: \"true\"
";
    let outcome = import_from_text(&[], text, &options(DuplicatePolicy::Skip));
    assert!(outcome.report.aborted);
    assert!(outcome
        .report
        .errors
        .iter()
        .any(|e| e.code == IssueCode::DeprecatedBoolean));
}

#[test]
fn all_issues_for_one_entry_are_reported_together() {
    let text = "\
- tag: Topic:Caps
  facet: bogus
  source: import
  note:
  deprecated: false
- tag: topic:fine
  facet: topic
  source: import
  note:
  deprecated: false
";
    let outcome = import_from_text(&[], text, &options(DuplicatePolicy::Skip));
    assert!(!outcome.report.aborted);
    let codes: Vec<IssueCode> = outcome
        .report
        .errors
        .iter()
        .filter(|e| e.tag == "Topic:Caps")
        .map(|e| e.code)
        .collect();
    assert!(codes.contains(&IssueCode::InvalidFacet));
    assert!(codes.contains(&IssueCode::InvalidFormat));
    assert!(codes.contains(&IssueCode::FacetFieldMatch));
}

#[test]
fn residual_violation_in_preexisting_data_rolls_back_the_import() {
    // The existing collection already carries an invalid facet; the merge
    // must refuse to persist an inconsistent whole.
    let existing = vec![TagEntry::new("weird:x", "weird", "old", "", false)];
    let text = "\
- tag: topic:new
  facet: topic
  source: import
  note:
  deprecated: false
";
    let outcome = import_from_text(&existing, text, &options(DuplicatePolicy::Skip));
    assert!(outcome.report.aborted);
    assert_eq!(outcome.next_entries, existing);
    assert!(outcome
        .report
        .errors
        .iter()
        .any(|e| e.code == IssueCode::InvalidFacet));
}
