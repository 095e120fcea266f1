//! Low-level decomposition of BibTeX text into records.

use crate::bibtex::ParseError;
use crate::bibtex::structure::RawBibRecord;
use crate::bibtex::types::EntryType;
use crate::regex::Regex;
use either::{Either, Left, Right};
use std::sync::LazyLock;

/// A possible record header: `@` followed by a word and an opening brace.
/// Stray `@` signs in field values or free text are not candidates.
static CANDIDATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z]+)\{").unwrap());

/// A complete record: `@type{key, fields...}` with the closing brace at the
/// start of a line. The key capture runs up to the comma ending the header
/// and may not contain braces; the body capture stops at the first
/// line-leading `}`.
static RECORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let types = EntryType::NAMES.join("|");
    Regex::new(&format!(r"(?i)^@(?:{types})\{{([^,{{}}]+),([\s\S]*?)\n\}}")).unwrap()
});

/// Split source text into records, collecting one [`ParseError`] per
/// candidate header that does not decompose into a recognizable record.
///
/// Text between records is ignored, as are candidates that fall inside a
/// previously matched record body.
pub(crate) fn scan_records(text: &str) -> (Vec<RawBibRecord>, Vec<ParseError>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();
    // End of the last matched record; candidates before it are field text.
    let mut cursor = 0;

    for caps in CANDIDATE_REGEX.captures_iter(text) {
        let header = caps.get(0).expect("candidate match has a whole capture");
        if header.start() < cursor {
            continue;
        }
        let type_name = caps.get(1).expect("candidate match has a type capture");
        match classify_candidate(text, header.start(), type_name.as_str()) {
            Right(record) => {
                cursor = header.start() + record.raw.len();
                records.push(record);
            }
            Left(err) => skipped.push(err),
        }
    }

    (records, skipped)
}

/// Decide whether the candidate at `start` is a well-formed record.
fn classify_candidate(
    text: &str,
    start: usize,
    type_name: &str,
) -> Either<ParseError, RawBibRecord> {
    let line = line_number(text, start);

    let Some(kind) = EntryType::from_name(type_name) else {
        return Left(ParseError::UnknownType {
            name: type_name.to_string(),
            line,
        });
    };

    let Some(caps) = RECORD_REGEX.captures(&text[start..]) else {
        return Left(ParseError::MalformedRecord { line });
    };

    let whole = caps.get(0).expect("record match has a whole capture");
    Right(RawBibRecord {
        kind,
        key: caps[1].trim().to_string(),
        body: caps[2].to_string(),
        raw: whole.as_str().to_string(),
        line,
    })
}

/// 1-based line number of a byte offset.
fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
