// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! taxon-vocab: the controlled-vocabulary domain for Taxon tools.
//!
//! A vocabulary is a sorted, deduplicated set of [`TagEntry`] records
//! persisted as one versioned blob under a single config key. This crate
//! carries the entry model, the pure validation engine, the store
//! (load with corruption detection, persist with full re-validation),
//! the bulk-import merge engine, and text export.

pub mod entry;
pub mod export;
pub mod import;
pub mod parse;
pub mod store;
pub mod validate;

pub use entry::{sort_entries, TagEntry, DEFAULT_FACET, FACETS, MAX_TAG_LEN};
pub use export::{export_to_clipboard, export_to_text};
pub use import::{
    import_from_text, DuplicatePolicy, ImportError, ImportOptions, ImportOutcome, ImportReport,
};
pub use parse::{parse_entries, ParseError, Scalar};
pub use store::{LoadResult, VocabError, VocabStore, VOCABULARY_KEY, VOCABULARY_VERSION};
pub use validate::{validate, Issue, IssueCode};
