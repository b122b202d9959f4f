// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text export of a vocabulary in the bulk-import grammar.
//!
//! Deprecated entries stay in storage but are excluded here; the output
//! round-trips through [`crate::parse::parse_entries`].

use crate::entry::{sort_entries, TagEntry};
use std::fmt::Write as _;
use taxon_app_core::clipboard::ClipboardPort;
use taxon_app_core::config::ConfigError;

/// Render the non-deprecated entries, sorted, in the import grammar.
pub fn export_to_text(entries: &[TagEntry]) -> String {
    let mut live: Vec<TagEntry> = entries.iter().filter(|e| !e.deprecated).cloned().collect();
    sort_entries(&mut live);

    let mut out = String::from("# taxon vocabulary export\n");
    for entry in &live {
        let _ = writeln!(out, "- tag: {}", scalar(&entry.tag));
        let _ = writeln!(out, "  facet: {}", scalar(&entry.facet));
        let _ = writeln!(out, "  source: {}", scalar(&entry.source));
        let _ = writeln!(out, "  note: {}", scalar(&entry.note));
        let _ = writeln!(out, "  deprecated: false");
    }
    out
}

/// Export and push the text through a clipboard port. Returns how many
/// entries were written.
pub fn export_to_clipboard(
    entries: &[TagEntry],
    clipboard: &dyn ClipboardPort,
) -> Result<usize, ConfigError> {
    let count = entries.iter().filter(|e| !e.deprecated).count();
    clipboard.write_text(&export_to_text(entries))?;
    Ok(count)
}

/// Quote a scalar when the parser would otherwise mangle it.
fn scalar(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value != value.trim()
        || value == "true"
        || value == "false"
        || value.starts_with(['"', '\'', '#', '-']);
    if needs_quotes {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}
