//! Intermediate data structures used during BibTeX parsing.

use crate::Entry;
use crate::bibtex::types::EntryType;
use crate::utils::extract_title;
use nanoid::nanoid;

/// One raw record decomposed from a BibTeX source.
///
/// Holds the verbatim matched text alongside the decomposed header fields.
/// The body is only inspected for the title field; everything else passes
/// through untouched inside `raw`.
#[derive(Debug, Clone)]
pub(crate) struct RawBibRecord {
    /// Entry type from the `@type{` header.
    pub(crate) kind: EntryType,
    /// Citation key from the header, whitespace-trimmed.
    pub(crate) key: String,
    /// Field text between the header and the closing brace.
    pub(crate) body: String,
    /// The complete record text, exactly as it appeared in the source.
    pub(crate) raw: String,
    /// 1-based line number of the record header.
    pub(crate) line: usize,
}

impl RawBibRecord {
    /// Finalize the record into an [`Entry`], tagging it with its source
    /// file for provenance.
    pub(crate) fn into_entry(self, source: &str) -> Entry {
        let title = extract_title(&self.body);
        Entry {
            id: nanoid!(),
            kind: self.kind,
            key: self.key,
            title,
            raw: self.raw,
            source: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(body: &str) -> RawBibRecord {
        RawBibRecord {
            kind: EntryType::Article,
            key: "smith2020".to_string(),
            body: body.to_string(),
            raw: format!("@article{{smith2020,{body}\n}}"),
            line: 1,
        }
    }

    #[test]
    fn test_into_entry() {
        let entry = record("\n  title = {Deep Learning},").into_entry("refs.bib");
        assert_eq!(entry.kind, EntryType::Article);
        assert_eq!(entry.key, "smith2020");
        assert_eq!(entry.title.as_deref(), Some("Deep Learning"));
        assert_eq!(entry.source, "refs.bib");
        assert!(entry.raw.starts_with("@article{smith2020,"));
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_into_entry_without_title() {
        let entry = record("\n  author = {Smith, John},").into_entry("refs.bib");
        assert_eq!(entry.title, None);
    }

    #[test]
    fn test_entry_ids_are_distinct() {
        let a = record("").into_entry("a.bib");
        let b = record("").into_entry("a.bib");
        assert_ne!(a.id, b.id);
    }
}
