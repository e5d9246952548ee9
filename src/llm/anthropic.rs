//! Anthropic Messages API adapter (non-streaming).
//!
//! System messages are lifted into the top-level `system` field; the
//! remaining messages are sent as text content blocks.

use std::time::Duration;

use async_trait::async_trait;

use super::error::LlmError;
use super::message::{Completion, Message, RequestOptions, Role};
use super::provider::{CompletionProvider, map_http_error};

/// Default Anthropic API base URL.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Configuration for the Anthropic adapter.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Anthropic API key.
    pub api_key: String,
    /// Base URL for the API (defaults to `https://api.anthropic.com`).
    pub base_url: String,
    /// Model identifier (e.g. `"claude-3-5-sonnet-20241022"`).
    pub model: String,
    /// API version header value.
    pub api_version: String,
    /// Max tokens when the request options leave it unset. The API
    /// requires the field.
    pub max_tokens: u32,
    /// Whole-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl AnthropicConfig {
    /// Create a new Anthropic config.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            model: model.into(),
            api_version: "2023-06-01".to_string(),
            max_tokens: 4096,
            timeout_seconds: 120,
        }
    }

    /// Set the base URL (useful for testing with mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the default max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Build the JSON request body for the Messages API.
pub fn build_messages_request(
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
    default_max_tokens: u32,
) -> serde_json::Value {
    let (system_text, anthropic_messages) = convert_messages(messages);

    let mut body = serde_json::json!({
        "model": model,
        "max_tokens": options.max_tokens.unwrap_or(default_max_tokens),
        "messages": anthropic_messages,
    });

    if let Some(system) = system_text {
        body["system"] = serde_json::Value::String(system);
    }
    if let Some(temp) = options.temperature {
        body["temperature"] = serde_json::json!(temp);
    }

    body
}

/// Split out system text; multiple system messages are joined by blank lines.
pub fn convert_messages(messages: &[Message]) -> (Option<String>, Vec<serde_json::Value>) {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut result = Vec::new();

    for msg in messages {
        match msg.role {
            Role::System => system_parts.push(&msg.content),
            Role::User | Role::Assistant => result.push(serde_json::json!({
                "role": msg.role.as_str(),
                "content": [{"type": "text", "text": msg.content}],
            })),
        }
    }

    let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
    (system, result)
}

/// Concatenate the text blocks of a Messages API response.
pub fn parse_message_response(
    body: &serde_json::Value,
    fallback_model: &str,
) -> Result<Completion, LlmError> {
    let blocks = body
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| LlmError::ProviderError("response has no content array".into()))?;

    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(LlmError::ProviderError(
            "response contained no text blocks".into(),
        ));
    }

    let model = body
        .get("model")
        .and_then(|m| m.as_str())
        .unwrap_or(fallback_model);
    Ok(Completion {
        text,
        model: model.to_string(),
    })
}

/// Anthropic provider adapter.
pub struct AnthropicAdapter {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicAdapter {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] if the HTTP client cannot be built.
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::ConfigError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// The configured model.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionProvider for AnthropicAdapter {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<Completion, LlmError> {
        let body =
            build_messages_request(&self.config.model, messages, options, self.config.max_tokens);
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(model = %self.config.model, "sending Anthropic message");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Anthropic request failed");
                LlmError::from_transport("anthropic", &e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read body".into());
            tracing::error!(status = %status, "Anthropic request returned error");
            return Err(map_http_error("anthropic", status, &body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::ProviderError(format!("anthropic response not JSON: {e}")))?;
        parse_message_response(&json, &self.config.model)
    }
}
