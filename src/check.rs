//! Consistency checking across parsed entries.
//!
//! Two comparison dimensions are checked over the full entry sequence:
//!
//! 1. Entries describing the same work (identical normalized title and
//!    entry type) must agree on their citation key.
//! 2. Entries sharing a citation key must describe the same work.
//!
//! The entry type is part of a work's identity: a conference paper and a
//! journal article sharing a title are distinct works and never conflict
//! with each other. Entries identical on key, type, and normalized title
//! are plain duplicates and are collapsed before checking, keeping the
//! first occurrence in input order.

use crate::bibtex::EntryType;
use crate::utils::comparison_title;
use crate::Entry;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The dimension along which a conflict group diverges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The same work is cited under more than one key.
    SameTitleDifferentKeys {
        /// The shared title, as written in the first conflicting entry.
        title: String,
        /// The shared entry type.
        kind: EntryType,
    },
    /// One key refers to more than one work.
    SameKeyDifferentWorks {
        /// The shared citation key.
        key: String,
    },
}

/// Entries expected to be identical along one comparison dimension but
/// diverging along the other.
///
/// Members are ordered by overall input position; the first member is the
/// earliest occurrence across all input files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictGroup {
    /// What diverges between the members.
    pub kind: ConflictKind,
    /// The conflicting entries, in input order.
    pub entries: Vec<Entry>,
}

impl fmt::Display for ConflictGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConflictKind::SameTitleDifferentKeys { title, kind } => {
                writeln!(f, "same title and type ({kind}) has different keys:")?;
                writeln!(f, "  title: {title}")?;
                for entry in &self.entries {
                    writeln!(f, "  key in {}: {}", entry.source, entry.key)?;
                }
            }
            ConflictKind::SameKeyDifferentWorks { key } => {
                writeln!(f, "same key refers to different works:")?;
                writeln!(f, "  key: {key}")?;
                for entry in &self.entries {
                    writeln!(
                        f,
                        "  in {}: {} ({})",
                        entry.source,
                        entry.title.as_deref().unwrap_or("<no title>"),
                        entry.kind
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// The (normalized title, type) pair identifying a work. `None` titles
/// compare equal to each other, matching the merge behavior for entries
/// without a title field.
fn work_identity(entry: &Entry) -> (Option<String>, EntryType) {
    (
        entry.title.as_deref().map(comparison_title),
        entry.kind,
    )
}

/// Drop entries fully identical on (key, type, normalized title), keeping
/// the first occurrence. Returns the survivors and the number collapsed.
pub(crate) fn collapse_duplicates(entries: Vec<Entry>) -> (Vec<Entry>, usize) {
    let mut seen: HashSet<(String, (Option<String>, EntryType))> = HashSet::new();
    let before = entries.len();

    let survivors: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| seen.insert((entry.key.clone(), work_identity(entry))))
        .collect();

    let collapsed = before - survivors.len();
    if collapsed > 0 {
        tracing::debug!(collapsed, "collapsed exact duplicate entries");
    }
    (survivors, collapsed)
}

/// Detect both conflict classes over the full ordered entry sequence.
///
/// Groups are returned sorted by the input position of their earliest
/// member, title/type divergences before key divergences on ties, so the
/// result is deterministic regardless of map iteration order.
pub fn find_conflicts(entries: &[Entry]) -> Vec<ConflictGroup> {
    let mut by_work: HashMap<(String, EntryType), Vec<usize>> = HashMap::new();
    let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();

    for (position, entry) in entries.iter().enumerate() {
        // Untitled entries never enter title-based grouping.
        if let Some(title) = entry.title.as_deref() {
            by_work
                .entry((comparison_title(title), entry.kind))
                .or_default()
                .push(position);
        }
        by_key.entry(entry.key.as_str()).or_default().push(position);
    }

    let mut groups: Vec<(usize, u8, ConflictGroup)> = Vec::new();

    for ((_, kind), positions) in by_work {
        let distinct_keys: HashSet<&str> = positions
            .iter()
            .map(|&p| entries[p].key.as_str())
            .collect();
        if distinct_keys.len() > 1 {
            let first = positions[0];
            let title = entries[first]
                .title
                .clone()
                .unwrap_or_default();
            groups.push((
                first,
                0,
                ConflictGroup {
                    kind: ConflictKind::SameTitleDifferentKeys { title, kind },
                    entries: positions.iter().map(|&p| entries[p].clone()).collect(),
                },
            ));
        }
    }

    for (key, positions) in by_key {
        let distinct_works: HashSet<(Option<String>, EntryType)> = positions
            .iter()
            .map(|&p| work_identity(&entries[p]))
            .collect();
        if distinct_works.len() > 1 {
            groups.push((
                positions[0],
                1,
                ConflictGroup {
                    kind: ConflictKind::SameKeyDifferentWorks {
                        key: key.to_string(),
                    },
                    entries: positions.iter().map(|&p| entries[p].clone()).collect(),
                },
            ));
        }
    }

    groups.sort_by_key(|(first, order, _)| (*first, *order));

    let groups: Vec<ConflictGroup> = groups.into_iter().map(|(_, _, group)| group).collect();
    for group in &groups {
        tracing::warn!("conflict detected: {group}");
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(kind: EntryType, key: &str, title: Option<&str>, source: &str) -> Entry {
        Entry {
            id: nanoid::nanoid!(),
            kind,
            key: key.to_string(),
            title: title.map(String::from),
            raw: format!("@{kind}{{{key},\n}}"),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_no_conflicts_for_distinct_entries() {
        let entries = vec![
            entry(EntryType::Article, "a", Some("One"), "x.bib"),
            entry(EntryType::Article, "b", Some("Two"), "x.bib"),
        ];
        assert!(find_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_same_title_different_keys() {
        let entries = vec![
            entry(EntryType::Article, "dl1", Some("Deep Learning"), "a.bib"),
            entry(EntryType::Article, "dl2", Some("deep learning"), "b.bib"),
        ];

        let groups = find_conflicts(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].kind,
            ConflictKind::SameTitleDifferentKeys {
                title: "Deep Learning".to_string(),
                kind: EntryType::Article,
            }
        );
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[0].key, "dl1");
        assert_eq!(groups[0].entries[1].key, "dl2");
    }

    #[test]
    fn test_same_key_different_titles() {
        let entries = vec![
            entry(EntryType::Article, "smith2020", Some("First Title"), "a.bib"),
            entry(EntryType::Article, "smith2020", Some("Second Title"), "b.bib"),
        ];

        let groups = find_conflicts(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].kind,
            ConflictKind::SameKeyDifferentWorks {
                key: "smith2020".to_string(),
            }
        );
    }

    #[test]
    fn test_same_key_different_types_conflicts() {
        // The same key citing an article and a book is a divergence even
        // when the titles agree.
        let entries = vec![
            entry(EntryType::Article, "x", Some("Same Title"), "a.bib"),
            entry(EntryType::Book, "x", Some("Same Title"), "b.bib"),
        ];

        let groups = find_conflicts(&entries);
        assert_eq!(groups.len(), 1);
        assert!(matches!(
            groups[0].kind,
            ConflictKind::SameKeyDifferentWorks { .. }
        ));
    }

    #[test]
    fn test_type_is_part_of_work_identity() {
        // Same title, different types, different keys: distinct works.
        let entries = vec![
            entry(EntryType::Article, "a1", Some("Deep Learning"), "a.bib"),
            entry(EntryType::Inproceedings, "p1", Some("Deep Learning"), "b.bib"),
        ];
        assert!(find_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_untitled_entries_skip_title_grouping() {
        let entries = vec![
            entry(EntryType::Misc, "m1", None, "a.bib"),
            entry(EntryType::Misc, "m2", None, "b.bib"),
        ];
        assert!(find_conflicts(&entries).is_empty());
    }

    #[test]
    fn test_untitled_entries_compare_equal_by_key() {
        // Two untitled entries under one key and type describe one work.
        let entries = vec![
            entry(EntryType::Misc, "m", None, "a.bib"),
            entry(EntryType::Misc, "m", None, "b.bib"),
        ];
        assert!(find_conflicts(&entries).is_empty());

        // But an untitled and a titled entry under one key diverge.
        let entries = vec![
            entry(EntryType::Misc, "m", None, "a.bib"),
            entry(EntryType::Misc, "m", Some("A Title"), "b.bib"),
        ];
        assert_eq!(find_conflicts(&entries).len(), 1);
    }

    #[test]
    fn test_groups_ordered_by_first_occurrence() {
        let entries = vec![
            entry(EntryType::Article, "k1", Some("Later Conflict"), "a.bib"),
            entry(EntryType::Article, "dup", Some("Alpha"), "a.bib"),
            entry(EntryType::Article, "dup", Some("Beta"), "b.bib"),
            entry(EntryType::Article, "k2", Some("Later Conflict"), "b.bib"),
        ];

        let groups = find_conflicts(&entries);
        assert_eq!(groups.len(), 2);
        // The title divergence starts at position 0, the key divergence at 1.
        assert!(matches!(
            groups[0].kind,
            ConflictKind::SameTitleDifferentKeys { .. }
        ));
        assert!(matches!(
            groups[1].kind,
            ConflictKind::SameKeyDifferentWorks { .. }
        ));
    }

    #[test]
    fn test_three_way_conflict_group() {
        let entries = vec![
            entry(EntryType::Article, "a", Some("Shared"), "1.bib"),
            entry(EntryType::Article, "b", Some("Shared"), "2.bib"),
            entry(EntryType::Article, "c", Some("Shared"), "3.bib"),
        ];

        let groups = find_conflicts(&entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entries.len(), 3);
        assert_eq!(groups[0].entries[0].key, "a");
        assert_eq!(groups[0].entries[2].key, "c");
    }

    #[test]
    fn test_collapse_duplicates_keeps_first() {
        let entries = vec![
            entry(EntryType::Article, "a", Some("One"), "first.bib"),
            entry(EntryType::Article, "a", Some("one"), "second.bib"),
            entry(EntryType::Article, "b", Some("Two"), "second.bib"),
        ];

        let (survivors, collapsed) = collapse_duplicates(entries);
        assert_eq!(collapsed, 1);
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].source, "first.bib");
    }

    #[test]
    fn test_collapse_is_type_sensitive() {
        let entries = vec![
            entry(EntryType::Article, "a", Some("One"), "first.bib"),
            entry(EntryType::Book, "a", Some("One"), "second.bib"),
        ];

        let (survivors, collapsed) = collapse_duplicates(entries);
        assert_eq!(collapsed, 0);
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn test_conflict_group_display() {
        let entries = vec![
            entry(EntryType::Article, "dl1", Some("Deep Learning"), "a.bib"),
            entry(EntryType::Article, "dl2", Some("Deep Learning"), "b.bib"),
        ];
        let groups = find_conflicts(&entries);
        let rendered = groups[0].to_string();

        assert!(rendered.contains("same title and type (article)"));
        assert!(rendered.contains("key in a.bib: dl1"));
        assert!(rendered.contains("key in b.bib: dl2"));
    }
}
