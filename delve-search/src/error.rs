//! Error types for the delve-search crate.
//!
//! [`SearchError`] is the structured failure side of a search. Callers that
//! feed results straight into an LLM prompt use
//! [`SearchError::legacy_message`] instead, which renders the plain-text
//! form agents expect.

use std::fmt;

/// Broad category of a search failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchErrorKind {
    /// The HTTP exchange failed (DNS, refused, timeout, non-2xx, body read).
    Transport,
    /// The request succeeded but neither extraction strategy found a snippet.
    NoResults,
    /// Anything else: bad selector schema, runtime setup, invalid config.
    Unexpected,
}

impl SearchErrorKind {
    /// Stable lowercase name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::NoResults => "no_results",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for SearchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur during a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the search endpoint failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// No snippet could be extracted from the response.
    #[error("no results found for query: {query}")]
    NoResults {
        /// The query exactly as the caller supplied it.
        query: String,
    },

    /// Failure outside the HTTP transport.
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns the failure category.
    ///
    /// Configuration problems are reported as [`SearchErrorKind::Unexpected`]
    /// since they are not caused by the transport and are not an empty result.
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            Self::Transport(_) => SearchErrorKind::Transport,
            Self::NoResults { .. } => SearchErrorKind::NoResults,
            Self::Unexpected(_) | Self::Config(_) => SearchErrorKind::Unexpected,
        }
    }

    /// Render this error in the plain-text form returned by
    /// [`crate::search`].
    pub fn legacy_message(&self) -> String {
        match self {
            Self::Transport(details) => format!("Error performing internet search: {details}"),
            Self::NoResults { query } => format!("No results found for query: {query}"),
            Self::Unexpected(details) => format!("Unexpected error during search: {details}"),
            Self::Config(details) => {
                format!("Unexpected error during search: invalid search configuration: {details}")
            }
        }
    }
}

/// Convenience type alias for delve-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_transport() {
        let err = SearchError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn display_no_results() {
        let err = SearchError::NoResults {
            query: "rust".into(),
        };
        assert_eq!(err.to_string(), "no results found for query: rust");
    }

    #[test]
    fn legacy_transport_message() {
        let err = SearchError::Transport("operation timed out".into());
        assert_eq!(
            err.legacy_message(),
            "Error performing internet search: operation timed out"
        );
    }

    #[test]
    fn legacy_no_results_keeps_query_verbatim() {
        let err = SearchError::NoResults {
            query: "  spaced query ".into(),
        };
        assert_eq!(
            err.legacy_message(),
            "No results found for query:   spaced query "
        );
    }

    #[test]
    fn legacy_unexpected_message() {
        let err = SearchError::Unexpected("bad selector".into());
        assert_eq!(
            err.legacy_message(),
            "Unexpected error during search: bad selector"
        );
    }

    #[test]
    fn config_errors_render_as_unexpected() {
        let err = SearchError::Config("timeout_seconds must be greater than 0".into());
        assert_eq!(err.kind(), SearchErrorKind::Unexpected);
        assert!(err
            .legacy_message()
            .starts_with("Unexpected error during search:"));
        assert!(err.legacy_message().contains("timeout_seconds"));
    }

    #[test]
    fn kinds_map_one_to_one() {
        assert_eq!(
            SearchError::Transport(String::new()).kind(),
            SearchErrorKind::Transport
        );
        assert_eq!(
            SearchError::NoResults {
                query: String::new()
            }
            .kind(),
            SearchErrorKind::NoResults
        );
        assert_eq!(
            SearchError::Unexpected(String::new()).kind(),
            SearchErrorKind::Unexpected
        );
        assert_eq!(SearchErrorKind::NoResults.to_string(), "no_results");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
