//! Provider adapter trait for LLM backends.

use async_trait::async_trait;

use super::error::LlmError;
use super::message::{Completion, Message, RequestOptions};

/// Trait for LLM provider adapters.
///
/// Adapters turn a conversation into one finished completion. They are
/// shared between agents behind an `Arc`, so they must be `Send + Sync`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name (e.g. `"openai"`, `"anthropic"`).
    fn name(&self) -> &str;

    /// Send `messages` and wait for the full completion.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] for transport failures, non-2xx responses and
    /// response bodies without text.
    async fn complete(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<Completion, LlmError>;
}

/// Extract a human-readable error message from a provider error body.
///
/// Both supported APIs nest the message at `error.message`.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no response body".to_string()
            } else {
                body.to_string()
            }
        })
}

/// Map a non-success HTTP status to an [`LlmError`].
pub(crate) fn map_http_error(provider: &str, status: reqwest::StatusCode, body: &str) -> LlmError {
    let detail = extract_error_message(body);
    match status.as_u16() {
        401 | 403 => LlmError::AuthError(format!("{provider} authentication failed: {detail}")),
        429 => LlmError::RequestError(format!("{provider} rate limited: {detail}")),
        s if s >= 500 => LlmError::ProviderError(format!("{provider} HTTP {s}: {detail}")),
        s => LlmError::RequestError(format!("{provider} HTTP {s}: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body = r#"{"error":{"message":"Invalid API key","type":"auth"}}"#;
        assert_eq!(extract_error_message(body), "Invalid API key");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(extract_error_message("gateway down"), "gateway down");
        assert_eq!(extract_error_message(""), "no response body");
    }

    #[test]
    fn status_mapping() {
        let auth = map_http_error("groq", reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(matches!(auth, LlmError::AuthError(_)));

        let forbidden = map_http_error("groq", reqwest::StatusCode::FORBIDDEN, "");
        assert!(matches!(forbidden, LlmError::AuthError(_)));

        let limited = map_http_error("groq", reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(limited, LlmError::RequestError(ref m) if m.contains("rate limited")));

        let server = map_http_error("groq", reqwest::StatusCode::BAD_GATEWAY, "");
        assert!(matches!(server, LlmError::ProviderError(ref m) if m.contains("502")));

        let bad = map_http_error("groq", reqwest::StatusCode::BAD_REQUEST, "");
        assert!(matches!(bad, LlmError::RequestError(ref m) if m.contains("400")));
    }
}
