//! BibTeX entry types and their definitions.
//!
//! Only the standard entry types are recognized; a record whose type is not
//! in this list does not parse as an entry at all.

use serde::{Deserialize, Serialize};

/// The standard BibTeX entry types.
///
/// The type is part of a work's identity during consistency checking: two
/// entries with the same title but different types are always distinct works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// @article - Journal or magazine article
    Article,
    /// @book - Book with an explicit publisher
    Book,
    /// @booklet - Printed work without a publisher
    Booklet,
    /// @conference - Conference paper (alias of inproceedings)
    Conference,
    /// @inbook - Part of a book (chapter, section, page range)
    Inbook,
    /// @incollection - Part of a book with its own title
    Incollection,
    /// @inproceedings - Paper in conference proceedings
    Inproceedings,
    /// @manual - Technical documentation
    Manual,
    /// @mastersthesis - Master's thesis
    Mastersthesis,
    /// @misc - Anything that does not fit the other types (e.g. preprints)
    Misc,
    /// @phdthesis - PhD thesis
    Phdthesis,
    /// @proceedings - The proceedings of a conference
    Proceedings,
    /// @techreport - Report published by a school or institution
    Techreport,
    /// @unpublished - Unpublished work with an author and title
    Unpublished,
}

impl EntryType {
    /// All recognized type names, lowercase.
    pub(crate) const NAMES: [&'static str; 14] = [
        "article",
        "book",
        "booklet",
        "conference",
        "inbook",
        "incollection",
        "inproceedings",
        "manual",
        "mastersthesis",
        "misc",
        "phdthesis",
        "proceedings",
        "techreport",
        "unpublished",
    ];

    /// Look up an entry type by name, case-insensitively.
    ///
    /// Returns `None` for anything that is not a standard BibTeX type.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "article" => Some(EntryType::Article),
            "book" => Some(EntryType::Book),
            "booklet" => Some(EntryType::Booklet),
            "conference" => Some(EntryType::Conference),
            "inbook" => Some(EntryType::Inbook),
            "incollection" => Some(EntryType::Incollection),
            "inproceedings" => Some(EntryType::Inproceedings),
            "manual" => Some(EntryType::Manual),
            "mastersthesis" => Some(EntryType::Mastersthesis),
            "misc" => Some(EntryType::Misc),
            "phdthesis" => Some(EntryType::Phdthesis),
            "proceedings" => Some(EntryType::Proceedings),
            "techreport" => Some(EntryType::Techreport),
            "unpublished" => Some(EntryType::Unpublished),
            _ => None,
        }
    }

    /// The lowercase name used in `@name{...}` headers.
    pub fn as_name(&self) -> &'static str {
        match self {
            EntryType::Article => "article",
            EntryType::Book => "book",
            EntryType::Booklet => "booklet",
            EntryType::Conference => "conference",
            EntryType::Inbook => "inbook",
            EntryType::Incollection => "incollection",
            EntryType::Inproceedings => "inproceedings",
            EntryType::Manual => "manual",
            EntryType::Mastersthesis => "mastersthesis",
            EntryType::Misc => "misc",
            EntryType::Phdthesis => "phdthesis",
            EntryType::Proceedings => "proceedings",
            EntryType::Techreport => "techreport",
            EntryType::Unpublished => "unpublished",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("article", Some(EntryType::Article))]
    #[case("ARTICLE", Some(EntryType::Article))]
    #[case("InProceedings", Some(EntryType::Inproceedings))]
    #[case("misc", Some(EntryType::Misc))]
    #[case("unpublished", Some(EntryType::Unpublished))]
    #[case("preprint", None)]
    #[case("webpage", None)]
    #[case("", None)]
    fn test_from_name(#[case] input: &str, #[case] expected: Option<EntryType>) {
        assert_eq!(EntryType::from_name(input), expected);
    }

    #[rstest]
    #[case(EntryType::Article, "article")]
    #[case(EntryType::Inproceedings, "inproceedings")]
    #[case(EntryType::Phdthesis, "phdthesis")]
    fn test_as_name(#[case] input: EntryType, #[case] expected: &str) {
        assert_eq!(input.as_name(), expected);
    }

    #[test]
    fn test_names_round_trip() {
        for name in EntryType::NAMES {
            let kind = EntryType::from_name(name).unwrap();
            assert_eq!(kind.as_name(), name);
        }
    }
}
