use crate::regex::Regex;
use std::sync::LazyLock;

/// Matches the first `title = ...` assignment in an entry body.
///
/// The value capture is non-greedy and stops at the first comma, so a title
/// such as `{Learning, Fast and Slow}` extracts as `Learning`. This is a
/// known lossy truncation kept for comparison purposes only; the raw entry
/// text is never rewritten from it. The pattern also matches `booktitle =`
/// when that field appears before `title =`, another accepted quirk.
static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)title\s*=\s*["{]?(.*?)["}]?(?:,|\s*$)"#).unwrap());

/// Extract the comparison title from an entry body.
///
/// Returns `None` when no title field is present or the value is empty.
pub(crate) fn extract_title(body: &str) -> Option<String> {
    let captures = TITLE_REGEX.captures(body)?;
    let title = captures
        .get(1)
        .map(|m| m.as_str().trim().trim_matches(','))
        .unwrap_or_default();

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Lowercase a title for comparison. Titles are compared case-insensitively;
/// the cased form is kept for display.
pub(crate) fn comparison_title(title: &str) -> String {
    title.to_lowercase()
}
