//! Tools agents can consult before answering.
//!
//! A tool takes a plain-text input and always answers with plain text;
//! failures are reported inside the text rather than as errors so the
//! model sees them as observations.

use async_trait::async_trait;
use delve_search::SearchConfig;

/// Default maximum output size handed to a model (100 KB).
pub const DEFAULT_MAX_BYTES: usize = 100 * 1024;

/// Truncate a string to at most `max_bytes`, respecting UTF-8 boundaries.
///
/// Returns `(truncated_string, was_truncated)`.
pub fn truncate_output(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (
        format!("{}\n\n[output truncated at {max_bytes} bytes]", &s[..end]),
        true,
    )
}

/// A text-in, text-out tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Display name shown to the model.
    fn name(&self) -> &str;

    /// What the tool does, in one or two sentences.
    fn description(&self) -> &str;

    /// Run the tool.
    async fn call(&self, input: &str) -> String;
}

/// Searches the internet for a query and returns the top snippets.
///
/// Wraps [`delve_search::search`], so the output is either the success
/// report or one of the search error messages.
#[derive(Debug, Clone)]
pub struct InternetResearchTool {
    config: SearchConfig,
    max_bytes: usize,
}

impl InternetResearchTool {
    /// Create a tool that searches with `config`.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Cap the output size.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl Default for InternetResearchTool {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[async_trait]
impl Tool for InternetResearchTool {
    fn name(&self) -> &str {
        "Internet Research Tool"
    }

    fn description(&self) -> &str {
        "Searches the internet for the latest information on a given topic."
    }

    async fn call(&self, input: &str) -> String {
        let output = delve_search::search(input, &self.config).await;
        let (output, truncated) = truncate_output(&output, self.max_bytes);
        if truncated {
            tracing::debug!(tool = self.name(), max_bytes = self.max_bytes, "tool output truncated");
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_within_limit_is_unchanged() {
        let (s, truncated) = truncate_output("hello", 10);
        assert_eq!(s, "hello");
        assert!(!truncated);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        // "é" is two bytes; cutting at 2 would split it.
        let (s, truncated) = truncate_output("aé bc", 2);
        assert!(truncated);
        assert!(s.starts_with("a\n\n[output truncated at 2 bytes]"));
    }

    #[test]
    fn research_tool_metadata() {
        let tool = InternetResearchTool::new(SearchConfig::default());
        assert_eq!(tool.name(), "Internet Research Tool");
        assert!(tool.description().contains("internet"));
    }

    #[tokio::test]
    async fn research_tool_reports_transport_failure_as_text() {
        let config = SearchConfig {
            endpoint: "http://127.0.0.1:9/html/".into(),
            timeout_seconds: 2,
            ..SearchConfig::default()
        };
        let tool = InternetResearchTool::new(config);
        let output = tool.call("anything").await;
        assert!(
            output.starts_with("Error performing internet search: "),
            "{output}"
        );
    }

    #[tokio::test]
    async fn research_tool_reports_bad_config_as_text() {
        let config = SearchConfig {
            max_snippets: 0,
            ..SearchConfig::default()
        };
        let output = InternetResearchTool::new(config).call("q").await;
        assert!(output.starts_with("Unexpected error during search: "), "{output}");
    }
}
