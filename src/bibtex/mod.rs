//! BibTeX format parser implementation.
//!
//! Splits raw file text into individual `@type{key, ...}` records and
//! extracts the normalized header fields used by the consistency checker.
//! The verbatim record text is always carried along untouched; parsing never
//! rewrites what will eventually be serialized.
//!
//! Records that do not decompose into a recognizable type/key header are
//! skipped and reported, not silently merged: each one surfaces as a
//! [`SkippedRecord`] on the returned [`ParsedSource`].
//!
//! # Example
//!
//! ```
//! use bibmerge::BibtexParser;
//!
//! let input = "@article{smith2020,\n  title = {Deep Learning},\n}";
//!
//! let parser = BibtexParser::new();
//! let parsed = parser.parse("refs.bib", input);
//!
//! assert_eq!(parsed.entries.len(), 1);
//! assert_eq!(parsed.entries[0].key, "smith2020");
//! assert_eq!(parsed.entries[0].title.as_deref(), Some("Deep Learning"));
//! ```

mod parse;
mod structure;
mod types;

pub use types::EntryType;

use crate::Entry;
use parse::scan_records;
use thiserror::Error;

/// Reasons a candidate record could not be decomposed into an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized entry type `{name}` at line {line}")]
    UnknownType { name: String, line: usize },

    #[error("malformed record header at line {line}")]
    MalformedRecord { line: usize },
}

impl ParseError {
    /// 1-based line number of the offending record header.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownType { line, .. } => *line,
            ParseError::MalformedRecord { line } => *line,
        }
    }
}

/// A record that was skipped during parsing, with its originating file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Path of the source file the record came from.
    pub source: String,
    /// Why the record was skipped.
    pub error: ParseError,
}

impl std::fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// The outcome of parsing one bibliography source.
///
/// Entries appear in source order. Skipped records are diagnostics, not
/// failures: a source with nothing recognizable in it parses to an empty
/// entry list.
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    /// Entries in the order they appear in the source text.
    pub entries: Vec<Entry>,
    /// Records that could not be decomposed, in source order.
    pub skipped: Vec<SkippedRecord>,
}

/// Parser for BibTeX bibliography files.
#[derive(Debug, Clone, Default)]
pub struct BibtexParser;

impl BibtexParser {
    /// Creates a new BibTeX parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of one bibliography file.
    ///
    /// `source` is the originating file path, kept on every entry for
    /// provenance; the caller is responsible for having read the file.
    pub fn parse(&self, source: &str, text: &str) -> ParsedSource {
        let (records, errors) = scan_records(text);

        let entries: Vec<Entry> = records
            .into_iter()
            .map(|record| record.into_entry(source))
            .collect();

        let skipped: Vec<SkippedRecord> = errors
            .into_iter()
            .map(|error| {
                tracing::warn!(source, line = error.line(), %error, "skipped record");
                SkippedRecord {
                    source: source.to_string(),
                    error,
                }
            })
            .collect();

        tracing::debug!(source, entries = entries.len(), "parsed bibliography source");

        ParsedSource { entries, skipped }
    }
}
