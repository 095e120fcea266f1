//! The merge pipeline: parse, check, resolve, serialize.
//!
//! A [`Merger`] consumes pre-read sources in the order they were given,
//! collapses exact duplicates, detects conflicts, resolves each conflict
//! group to a single winner, and assembles the surviving entries into
//! output text. Sources are `(path, text)` pairs; opening and reading
//! files, as well as confirming overwrites, is the caller's concern.
//!
//! # Automatic merging
//!
//! ```
//! use bibmerge::{BibSource, Merger};
//!
//! let sources = vec![
//!     BibSource::new("a.bib", "@article{smith2020,\n  title = {A Study},\n}\n"),
//!     BibSource::new("b.bib", "@article{smith2020,\n  title = {A Study},\n}\n"),
//! ];
//!
//! let outcome = Merger::new().merge(&sources).unwrap();
//! assert_eq!(outcome.entries.len(), 1);
//! assert!(!outcome.has_issues());
//! ```
//!
//! # Interactive merging
//!
//! Interactive mode routes every conflict through a caller-supplied
//! [`ChoicePrompt`](crate::resolve::ChoicePrompt) and fails the whole run
//! if the channel is unavailable or the user declines to choose. No output
//! is produced on failure.

use crate::bibtex::{BibtexParser, SkippedRecord};
use crate::check::{ConflictGroup, collapse_duplicates, find_conflicts};
use crate::resolve::{ChoicePrompt, resolve_automatic, resolve_interactive};
use crate::{Entry, Result};
use itertools::Itertools;
use std::collections::HashSet;
use std::io::Write;

/// One pre-read bibliography source.
#[derive(Debug, Clone)]
pub struct BibSource {
    /// Originating file path, kept for provenance and display.
    pub path: String,
    /// Full file contents.
    pub text: String,
}

impl BibSource {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Configuration options for the merge engine.
#[derive(Debug, Default, Clone)]
pub struct MergerConfig {
    /// Resolve conflict groups in parallel in automatic mode. Groups do not
    /// interact, so the merged output is identical either way. Ignored in
    /// interactive mode, which prompts one group at a time.
    pub run_in_parallel: bool,
}

/// Merge engine for bibliography sources.
///
/// The merged output satisfies two invariants: no two surviving entries
/// share a citation key, and no two surviving entries share a
/// (normalized title, type) pair. An entry belonging to several conflict
/// groups survives only if it wins every one of them.
#[derive(Debug, Default, Clone)]
pub struct Merger {
    config: MergerConfig,
}

/// Per-source parse summary.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub path: String,
    /// Number of recognizable entries found in the source.
    pub entry_count: usize,
}

/// Diagnostics accumulated over a merge run.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// One summary per input source, in input order.
    pub sources: Vec<SourceReport>,
    /// Records skipped during parsing, across all sources.
    pub skipped: Vec<SkippedRecord>,
    /// Entries dropped because they were exact duplicates of an earlier one.
    pub duplicates_collapsed: usize,
}

/// A conflict group together with the selection made for it.
#[derive(Debug, Clone)]
pub struct ResolvedConflict {
    pub group: ConflictGroup,
    /// Index of the winning member within `group.entries`.
    pub winner: usize,
}

impl ResolvedConflict {
    /// The entry chosen to represent this group in the merged output.
    pub fn winner_entry(&self) -> &Entry {
        &self.group.entries[self.winner]
    }
}

/// The result of a completed merge run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Surviving entries, ordered by the first input-order occurrence.
    pub entries: Vec<Entry>,
    /// Every detected conflict and how it was resolved.
    pub conflicts: Vec<ResolvedConflict>,
    /// Parse and duplicate diagnostics.
    pub report: MergeReport,
}

impl MergeOutcome {
    /// Serialize the surviving entries back to BibTeX text.
    ///
    /// Each entry's verbatim source text is emitted unchanged, separated by
    /// blank lines, so output from well-formed inputs parses back with the
    /// same grammar.
    pub fn to_bibtex(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut output = self.entries.iter().map(|entry| entry.raw.as_str()).join("\n\n");
        output.push('\n');
        output
    }

    /// Write the serialized output to a sink. Sink failures surface as
    /// [`MergeError::Io`](crate::MergeError::Io).
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_bibtex().as_bytes())?;
        Ok(())
    }

    /// Whether the run found anything worth reviewing: skipped records or
    /// conflicting entries.
    pub fn has_issues(&self) -> bool {
        !self.conflicts.is_empty() || !self.report.skipped.is_empty()
    }
}

impl Merger {
    /// Creates a merge engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a merge engine with custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: MergerConfig) -> Self {
        self.config = config;
        self
    }

    /// Merge sources in automatic mode: every conflict resolves to the
    /// member that appeared first in overall input order. Deterministic:
    /// identical inputs in identical order produce byte-identical output.
    pub fn merge(&self, sources: &[BibSource]) -> Result<MergeOutcome> {
        self.run(sources, None)
    }

    /// Merge sources in interactive mode: every conflict is routed through
    /// `prompt`. Any prompt failure aborts the run before output exists.
    pub fn merge_interactive(
        &self,
        sources: &[BibSource],
        prompt: &mut dyn ChoicePrompt,
    ) -> Result<MergeOutcome> {
        self.run(sources, Some(prompt))
    }

    fn run(
        &self,
        sources: &[BibSource],
        prompt: Option<&mut dyn ChoicePrompt>,
    ) -> Result<MergeOutcome> {
        let parser = BibtexParser::new();

        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        let mut source_reports = Vec::new();
        for source in sources {
            let parsed = parser.parse(&source.path, &source.text);
            source_reports.push(SourceReport {
                path: source.path.clone(),
                entry_count: parsed.entries.len(),
            });
            entries.extend(parsed.entries);
            skipped.extend(parsed.skipped);
        }

        let (entries, duplicates_collapsed) = collapse_duplicates(entries);
        let groups = find_conflicts(&entries);

        let winners = match prompt {
            Some(prompt) => {
                let mut winners = Vec::with_capacity(groups.len());
                for group in &groups {
                    winners.push(resolve_interactive(group, &mut *prompt)?);
                }
                winners
            }
            None => self.resolve_all_automatic(&groups),
        };

        // An entry in several groups survives only if it wins each of them.
        let mut losers: HashSet<String> = HashSet::new();
        for (group, &winner) in groups.iter().zip(winners.iter()) {
            for (index, entry) in group.entries.iter().enumerate() {
                if index != winner {
                    losers.insert(entry.id.clone());
                }
            }
        }

        let survivors: Vec<Entry> = entries
            .into_iter()
            .filter(|entry| !losers.contains(&entry.id))
            .collect();

        tracing::debug!(
            survivors = survivors.len(),
            conflicts = groups.len(),
            duplicates_collapsed,
            "merge complete"
        );

        Ok(MergeOutcome {
            entries: survivors,
            conflicts: groups
                .into_iter()
                .zip(winners)
                .map(|(group, winner)| ResolvedConflict { group, winner })
                .collect(),
            report: MergeReport {
                sources: source_reports,
                skipped,
                duplicates_collapsed,
            },
        })
    }

    fn resolve_all_automatic(&self, groups: &[ConflictGroup]) -> Vec<usize> {
        #[cfg(feature = "parallel")]
        if self.config.run_in_parallel {
            use rayon::prelude::*;
            return groups.par_iter().map(resolve_automatic).collect();
        }
        groups.iter().map(resolve_automatic).collect()
    }
}
