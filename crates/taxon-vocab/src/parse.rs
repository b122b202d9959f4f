// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Minimal parser for the bulk-import text format: a list of maps, one
//! `- ` marker line per entry, indented `key: value` lines binding fields.
//!
//! Blank lines and `#` comments are ignored. Unquoted `true`/`false`
//! scalars coerce to booleans; single- or double-quoted scalars are
//! unquoted verbatim (a quoted `"true"` stays a string). Anything that
//! breaks the list-of-maps structure is a hard [`ParseError`].

use std::collections::BTreeMap;
use thiserror::Error;

/// A parsed scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Literal `true` / `false`.
    Bool(bool),
    /// Everything else, with surrounding quotes stripped.
    Str(String),
}

impl Scalar {
    /// The string payload, if this scalar is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            Self::Bool(_) => None,
        }
    }

    /// The boolean payload, if this scalar is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(_) => None,
        }
    }
}

/// Structural parse failure; aborts the whole import.
#[derive(Debug, Error)]
#[error("parse error at line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number of the offending line.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

/// One raw imported record: field name to scalar. Later bindings of the
/// same key win.
pub type RawRecord = BTreeMap<String, Scalar>;

/// Parse import text into raw records. Returns an empty list for input
/// that holds only comments and blank lines.
pub fn parse_entries(text: &str) -> Result<Vec<RawRecord>, ParseError> {
    let mut records: Vec<RawRecord> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = list_item_body(trimmed) {
            let mut record = RawRecord::new();
            if !rest.is_empty() {
                bind_field(&mut record, rest, line_no)?;
            }
            records.push(record);
            continue;
        }

        // A field line must be indented and belong to an open record.
        if !raw_line.starts_with(|c: char| c.is_whitespace()) {
            return Err(ParseError {
                line: line_no,
                message: format!("expected a list item or comment, got '{trimmed}'"),
            });
        }
        let Some(current) = records.last_mut() else {
            return Err(ParseError {
                line: line_no,
                message: "field line before any list item".to_owned(),
            });
        };
        bind_field(current, trimmed, line_no)?;
    }

    Ok(records)
}

/// Body of a `- ` list-item line, or `None` if the line is not one.
fn list_item_body(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        Some("")
    } else {
        trimmed.strip_prefix("- ").map(str::trim)
    }
}

fn bind_field(record: &mut RawRecord, text: &str, line_no: usize) -> Result<(), ParseError> {
    let Some((key, value)) = text.split_once(':') else {
        return Err(ParseError {
            line: line_no,
            message: format!("expected 'key: value', got '{text}'"),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError {
            line: line_no,
            message: "empty key in 'key: value' line".to_owned(),
        });
    }
    record.insert(key.to_owned(), parse_scalar(value.trim()));
    Ok(())
}

fn parse_scalar(value: &str) -> Scalar {
    if let Some(unquoted) = strip_quotes(value) {
        return Scalar::Str(unquoted.to_owned());
    }
    match value {
        "true" => Scalar::Bool(true),
        "false" => Scalar::Bool(false),
        other => Scalar::Str(other.to_owned()),
    }
}

fn strip_quotes(value: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return Some(&value[1..value.len() - 1]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_with_comments_and_blanks() {
        let text = "\
# vocabulary import
- tag: topic:existing
  facet: topic
  source: manual
  note: \"kept for tests\"
  deprecated: false

- tag: field:ce/ug
  facet: field
  source: 'import'
  note:
  deprecated: true
";
        let records = parse_entries(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("tag"),
            Some(&Scalar::Str("topic:existing".to_owned()))
        );
        assert_eq!(
            records[0].get("note"),
            Some(&Scalar::Str("kept for tests".to_owned()))
        );
        assert_eq!(records[0].get("deprecated"), Some(&Scalar::Bool(false)));
        assert_eq!(records[1].get("deprecated"), Some(&Scalar::Bool(true)));
        assert_eq!(records[1].get("note"), Some(&Scalar::Str(String::new())));
    }

    #[test]
    fn tag_values_keep_their_colon() {
        let records = parse_entries("- tag: topic:a/b.c\n").unwrap();
        assert_eq!(
            records[0].get("tag"),
            Some(&Scalar::Str("topic:a/b.c".to_owned()))
        );
    }

    #[test]
    fn quoted_true_stays_a_string() {
        let records = parse_entries("- deprecated: \"true\"\n").unwrap();
        assert_eq!(
            records[0].get("deprecated"),
            Some(&Scalar::Str("true".to_owned()))
        );
    }

    #[test]
    fn field_line_before_any_item_is_structural() {
        let err = parse_entries("  tag: topic:a\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn unindented_garbage_is_structural() {
        let err = parse_entries("- tag: topic:a\nnot a field\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn line_without_separator_is_structural() {
        assert!(parse_entries("- tag topic\n").is_err());
    }

    #[test]
    fn comment_only_input_parses_to_empty() {
        assert!(parse_entries("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn later_duplicate_key_wins() {
        let records = parse_entries("- tag: topic:a\n  tag: topic:b\n").unwrap();
        assert_eq!(
            records[0].get("tag"),
            Some(&Scalar::Str("topic:b".to_owned()))
        );
    }
}
