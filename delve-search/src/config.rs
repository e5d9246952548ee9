//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the endpoint, request headers, timeout, result
//! limit and the selector schema used for extraction. The defaults target
//! DuckDuckGo's HTML-only endpoint.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::extract::SelectorSchema;

/// DuckDuckGo's JavaScript-free results endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Browser-like User-Agent sent with every request. Without one the
/// endpoint serves different markup or refuses the request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Configuration for a search operation.
///
/// Use [`Default::default()`] for the standard behaviour, or construct with
/// field overrides (tests point `endpoint` at a local mock server).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// URL the form-encoded query is POSTed to.
    pub endpoint: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Request timeout in seconds. An unresponsive peer past this bound is
    /// reported as a transport failure.
    pub timeout_seconds: u64,
    /// Maximum number of snippets returned.
    pub max_snippets: usize,
    /// Class names that locate snippets in the result page.
    pub schema: SelectorSchema,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_seconds: 10,
            max_snippets: 5,
            schema: SelectorSchema::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `max_snippets` must be greater than 0
    /// - `endpoint` must be an absolute `http` or `https` URL
    /// - `user_agent` must not be empty
    /// - every schema class name must be non-empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_snippets == 0 {
            return Err(SearchError::Config(
                "max_snippets must be greater than 0".into(),
            ));
        }
        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| SearchError::Config(format!("invalid endpoint {:?}: {e}", self.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "endpoint scheme must be http or https, got {}",
                endpoint.scheme()
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SearchError::Config("user_agent must not be empty".into()));
        }
        self.schema.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.endpoint, "https://html.duckduckgo.com/html/");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.max_snippets, 5);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.schema, SelectorSchema::duckduckgo());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_max_snippets_rejected() {
        let config = SearchConfig {
            max_snippets: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_snippets"));
    }

    #[test]
    fn relative_endpoint_rejected() {
        let config = SearchConfig {
            endpoint: "/html/".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let config = SearchConfig {
            endpoint: "ftp://example.com/".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn blank_user_agent_rejected() {
        let config = SearchConfig {
            user_agent: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn local_mock_endpoint_valid() {
        let config = SearchConfig {
            endpoint: "http://127.0.0.1:8080/html/".into(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: SearchConfig = toml::from_str("timeout_seconds = 3").expect("parse");
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.max_snippets, 5);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn schema_overridable_from_toml() {
        let toml_str = r#"
[schema]
snippet_class = "snip"
"#;
        let config: SearchConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.schema.snippet_class, "snip");
        assert_eq!(config.schema.title_class, "result__a");
    }
}
