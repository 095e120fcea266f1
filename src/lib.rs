//! A library for merging BibTeX bibliographies with consistency checks.
//!
//! `bibmerge` merges multiple bibliography files into one, detecting
//! duplicate or conflicting entries and resolving each conflict to a single
//! winner, either interactively or by a deterministic first-occurrence rule.
//!
//! # Key Features
//!
//! - **Consistency checking** along two dimensions:
//!   - the same work (identical normalized title and entry type) cited
//!     under different keys
//!   - the same key referring to different works
//! - **Deterministic automatic resolution**: first occurrence in input
//!   order wins; identical inputs always produce byte-identical output
//! - **Interactive resolution** through an abstract, synchronous prompt
//!   capability supplied by the caller
//! - **Verbatim output**: entries are serialized exactly as they appeared
//!   in their source file, never rewritten
//!
//! # Basic Usage
//!
//! ```rust
//! use bibmerge::{BibSource, Merger};
//!
//! let sources = vec![
//!     BibSource::new("a.bib", "@article{dl1,\n  title = {Deep Learning},\n}\n"),
//!     BibSource::new("b.bib", "@article{dl2,\n  title = {Deep Learning},\n}\n"),
//! ];
//!
//! let outcome = Merger::new().merge(&sources).unwrap();
//!
//! // Both files cite the same article under different keys; the first
//! // occurrence wins.
//! assert_eq!(outcome.entries.len(), 1);
//! assert_eq!(outcome.entries[0].key, "dl1");
//! println!("{}", outcome.to_bibtex());
//! ```
//!
//! # Title Normalization
//!
//! Titles are compared after a documented lossy normalization: the value is
//! truncated at the first comma inside the title field. A title written as
//! `{Learning, Fast and Slow}` compares as `learning`. This matches the
//! long-standing behavior of the checks and is intentionally not "fixed";
//! the raw entry text serialized to output is unaffected.
//!
//! # Error Handling
//!
//! All operations share the crate's [`Result`] type wrapping [`MergeError`].
//! Malformed records are skipped and reported through
//! [`MergeReport`](merge::MergeReport) rather than failing the run; an
//! unresolved conflict (unavailable prompt, user abort) fails the run
//! before any output is produced.
//!
//! ```rust
//! use bibmerge::{BibSource, MergeError, Merger};
//!
//! let sources = vec![BibSource::new("a.bib", "not a bibliography")];
//! match Merger::new().merge(&sources) {
//!     Ok(outcome) => println!("{} entries", outcome.entries.len()),
//!     Err(MergeError::Unresolved(e)) => eprintln!("conflict unresolved: {e}"),
//!     Err(e) => eprintln!("merge failed: {e}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod bibtex;
pub mod check;
pub mod merge;
mod regex;
pub mod resolve;
mod utils;

// Reexports
pub use bibtex::{BibtexParser, EntryType, ParseError, ParsedSource, SkippedRecord};
pub use check::{ConflictGroup, ConflictKind, find_conflicts};
pub use merge::{BibSource, MergeOutcome, MergeReport, Merger, MergerConfig};
pub use resolve::{ChoicePrompt, ResolveError};

/// A specialized Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors that terminate a merge run. No partial output is ever written:
/// a failed run produces nothing rather than a half-resolved merge.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("conflict unresolved: {0}")]
    Unresolved(#[from] ResolveError),
}

/// One bibliographic record.
///
/// Entries are created during parsing and never mutated afterwards;
/// resolution selects among existing entries, it does not edit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque internal identity, distinct for every parsed record.
    pub id: String,
    /// The entry type from the record header.
    pub kind: EntryType,
    /// The citation key from the record header.
    pub key: String,
    /// The extracted title, truncated at the first comma inside the field
    /// value. Used for comparison only; `None` when the record has no
    /// usable title field.
    pub title: Option<String>,
    /// The record text exactly as it appeared in the source file. This is
    /// what gets serialized; it is never derived from the fields above.
    pub raw: String,
    /// Path of the file the entry came from, for provenance display.
    pub source: String,
}

impl Entry {
    /// The lowercased title used for comparison, if the entry has one.
    pub fn comparison_title(&self) -> Option<String> {
        self.title.as_deref().map(crate::utils::comparison_title)
    }
}
