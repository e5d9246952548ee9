//! Successful search outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snippets extracted for one query.
///
/// Invariant: `snippets` is non-empty, holds at most the configured limit,
/// and every entry is already trimmed and non-empty. The only constructor
/// outside this crate is deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// The query exactly as supplied.
    pub query: String,
    /// Extracted snippets in document order.
    pub snippets: Vec<String>,
}

impl SearchReport {
    pub(crate) fn new(query: &str, snippets: Vec<String>) -> Self {
        Self {
            query: query.to_owned(),
            snippets,
        }
    }

    /// Number of snippets in the report.
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Whether the report carries no snippets.
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Legacy text form: a header naming the query, a blank line, then the
/// snippets separated by blank lines.
impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Search results for '{}':\n\n{}",
            self.query,
            self.snippets.join("\n\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_blank_line_separators() {
        let report = SearchReport::new(
            "rust vs go",
            vec!["Rust is fast".into(), "Go is simple".into()],
        );
        assert_eq!(
            report.to_string(),
            "Search results for 'rust vs go':\n\nRust is fast\n\nGo is simple"
        );
    }

    #[test]
    fn single_snippet_has_no_trailing_separator() {
        let report = SearchReport::new("q", vec!["only".into()]);
        assert_eq!(report.to_string(), "Search results for 'q':\n\nonly");
        assert_eq!(report.len(), 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn query_is_not_escaped() {
        let report = SearchReport::new("it's", vec!["x".into()]);
        assert!(report.to_string().starts_with("Search results for 'it's':"));
    }

    #[test]
    fn serializes_as_plain_fields() {
        let report = SearchReport::new("q", vec!["a".into()]);
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["query"], "q");
        assert_eq!(json["snippets"][0], "a");
    }
}
