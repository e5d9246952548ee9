//! OpenAI-compatible chat completions adapter.
//!
//! Speaks the non-streaming `/v1/chat/completions` API. Groq exposes the
//! same API under `https://api.groq.com/openai`, so one adapter covers both.
//!
//! # Examples
//!
//! ```rust,no_run
//! use delve::llm::message::{Message, RequestOptions};
//! use delve::llm::openai::{OpenAiAdapter, OpenAiConfig};
//! use delve::llm::provider::CompletionProvider;
//!
//! # async fn example() -> Result<(), delve::llm::LlmError> {
//! let config = OpenAiConfig::new("sk-...", "gpt-4o");
//! let adapter = OpenAiAdapter::new(config)?;
//! let completion = adapter
//!     .complete(&[Message::user("Hello")], &RequestOptions::new())
//!     .await?;
//! println!("{}", completion.text);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;

use super::error::LlmError;
use super::message::{Completion, Message, RequestOptions};
use super::provider::{CompletionProvider, map_http_error};

/// Default OpenAI API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Groq's OpenAI-compatible base URL.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// Configuration for the OpenAI-compatible adapter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for bearer authentication.
    pub api_key: String,
    /// Base URL without the `/v1/...` suffix.
    pub base_url: String,
    /// The model to request.
    pub model: String,
    /// Name used in logs and error messages.
    pub provider_name: String,
    /// Whole-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl OpenAiConfig {
    /// Create a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.into(),
            model: model.into(),
            provider_name: "openai".into(),
            timeout_seconds: 120,
        }
    }

    /// Config pointed at Groq.
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(api_key, model)
            .with_base_url(GROQ_BASE_URL)
            .with_provider_name("groq")
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the provider name reported by [`CompletionProvider::name`].
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Build the JSON request body for the Chat Completions API.
pub fn build_completions_request(
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| serde_json::json!({"role": m.role.as_str(), "content": m.content}))
        .collect();

    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "stream": false,
    });

    if let Some(obj) = body.as_object_mut() {
        if let Some(temp) = options.temperature {
            obj.insert("temperature".into(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".into(), serde_json::json!(max_tokens));
        }
    }

    body
}

/// Pull the assistant text out of a Chat Completions response body.
pub fn parse_completion(body: &serde_json::Value, fallback_model: &str) -> Result<Completion, LlmError> {
    let text = body
        .pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            LlmError::ProviderError("response has no choices[0].message.content".into())
        })?;
    let model = body
        .get("model")
        .and_then(|m| m.as_str())
        .unwrap_or(fallback_model);
    Ok(Completion {
        text: text.to_string(),
        model: model.to_string(),
    })
}

/// OpenAI-compatible provider adapter.
pub struct OpenAiAdapter {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    /// Create a new adapter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
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

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionProvider for OpenAiAdapter {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &RequestOptions,
    ) -> Result<Completion, LlmError> {
        let provider = self.name();
        let body = build_completions_request(&self.config.model, messages, options);
        tracing::debug!(provider, model = %self.config.model, "sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::error!(provider, status = %status, "chat completion returned error");
            return Err(map_http_error(provider, status, &body_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::ProviderError(format!("{provider} response not JSON: {e}")))?;
        parse_completion(&json, &self.config.model)
    }
}
