//! BibTeX reader built on winnow

pub mod entry;
pub mod lexer;
pub mod utils;

use crate::error::{Error, Result};
use crate::schema::ReferenceType;

pub use entry::parse_item;

/// Internal parser result type
pub type PResult<O> = winnow::PResult<O, winnow::error::ContextError>;

/// A raw field value as it appears in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    /// `{braced}` or `"quoted"` text
    Text(&'a str),
    /// Bare integer
    Number(i64),
}

/// One parsed `@type{key, ...}` entry, still borrowing the source text
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry<'a> {
    /// Resolved reference type
    pub ty: ReferenceType,
    /// Citation key
    pub key: &'a str,
    /// Fields in source order
    pub fields: Vec<(&'a str, RawValue<'a>)>,
}

impl RawEntry<'_> {
    /// Copy the raw fields into an owned field map.
    ///
    /// A field name repeated within one entry keeps its last value.
    #[must_use]
    pub fn field_map(&self) -> ahash::AHashMap<String, crate::model::Value> {
        self.fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    RawValue::Text(s) => crate::model::Value::Text((*s).to_string()),
                    RawValue::Number(n) => crate::model::Value::Number(*n),
                };
                ((*name).to_string(), value)
            })
            .collect()
    }
}

/// Parse BibTeX text into raw entries.
///
/// Text outside entries (including `%` line comments) is skipped, as is
/// any whole entry whose type literal is not a supported reference type.
/// A malformed entry of a supported type is a parse error carrying the
/// source location.
pub fn parse_bib(input: &str) -> Result<Vec<RawEntry<'_>>> {
    let mut entries = Vec::new();
    let mut remaining = input;

    loop {
        lexer::skip_whitespace(&mut remaining);
        if remaining.is_empty() {
            break;
        }

        if remaining.starts_with('%') {
            match remaining.find('\n') {
                Some(eol) => remaining = &remaining[eol + 1..],
                None => break,
            }
            continue;
        }

        if !remaining.starts_with('@') {
            match remaining.find('@') {
                Some(at) => remaining = &remaining[at..],
                None => break,
            }
            continue;
        }

        match parse_item(&mut remaining) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {
                // unsupported entry type, already consumed
            }
            Err(e) => {
                let consumed = input.len() - remaining.len();
                let (line, column) = calculate_position(input, consumed);

                return Err(Error::Parse {
                    line,
                    column,
                    message: format!("Failed to parse entry: {e}"),
                    snippet: Some(get_snippet(remaining, 40)),
                });
            }
        }
    }

    Ok(entries)
}

/// Calculate line and column from position
fn calculate_position(input: &str, pos: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in input.char_indices() {
        if i >= pos {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

/// Get a snippet of input for error messages
fn get_snippet(input: &str, max_len: usize) -> String {
    let snippet: String = input.chars().take(max_len).collect();
    if input.len() > max_len {
        format!("{snippet}...")
    } else {
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_junk_and_comments() {
        let input = r#"
            % exported references
            This line is free text and is ignored.
            @inproceedings{reed72,
                author = {Reed, Lou},
                title = {Walk on the Wild Side},
                booktitle = {Transformer},
                year = 1972
            }
        "#;

        let entries = parse_bib(input).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "reed72");
        assert_eq!(entries[0].ty, ReferenceType::InProceedings);
    }

    #[test]
    fn test_unsupported_type_skipped_silently() {
        let input = r#"
            @misc{skipme, note = {not a supported type}}
            @article{keep23,
                author = {Doe, Jane},
                title = {Kept},
                journal = {Letters},
                year = 2023
            }
        "#;

        let entries = parse_bib(input).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "keep23");
    }

    #[test]
    fn test_malformed_entry_reports_location() {
        let input = "@article{broken\n    author = {Doe}\n";
        let err = parse_bib(input).unwrap_err();
        match err {
            Error::Parse { line, snippet, .. } => {
                assert!(line >= 1);
                assert!(snippet.is_some());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
