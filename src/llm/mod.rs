//! LLM provider adapters.
//!
//! Agents talk to models through [`CompletionProvider`]. Two adapters are
//! provided: [`openai::OpenAiAdapter`] (OpenAI and Groq) and
//! [`anthropic::AnthropicAdapter`]. [`build_provider`] picks one from a
//! `"provider/model"` reference in the config.

pub mod anthropic;
pub mod error;
pub mod message;
pub mod openai;
pub mod provider;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use error::LlmError;
pub use message::{Completion, Message, RequestOptions, Role};
pub use provider::CompletionProvider;

use crate::config::{ModelSettings, ProvidersConfig};
use anthropic::{AnthropicAdapter, AnthropicConfig};
use openai::{OpenAiAdapter, OpenAiConfig};

/// Supported model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq (OpenAI-compatible API).
    Groq,
    /// OpenAI.
    OpenAi,
    /// Anthropic.
    Anthropic,
}

impl ProviderKind {
    /// Returns the prefix used in model references.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(LlmError::ConfigError(format!("unknown provider: {other}"))),
        }
    }
}

/// A `"provider/model"` reference such as `groq/llama-3.3-70b-versatile`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelRef {
    /// Which provider serves the model.
    pub provider: ProviderKind,
    /// Provider-specific model ID; may itself contain `/`.
    pub model: String,
}

impl ModelRef {
    /// Parse a `"provider/model"` string.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] if the prefix is missing or unknown,
    /// or the model part is empty.
    pub fn parse(reference: &str) -> Result<Self, LlmError> {
        let (provider, model) = reference.split_once('/').ok_or_else(|| {
            LlmError::ConfigError(format!(
                "model reference {reference:?} must look like \"provider/model\""
            ))
        })?;
        if model.trim().is_empty() {
            return Err(LlmError::ConfigError(format!(
                "model reference {reference:?} has an empty model name"
            )));
        }
        Ok(Self {
            provider: provider.parse()?,
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Build the adapter for `settings.model` using the matching endpoint in
/// `providers`.
///
/// # Errors
///
/// Returns [`LlmError::ConfigError`] for a malformed model reference and
/// [`LlmError::AuthError`] when no API key can be found.
pub fn build_provider(
    settings: &ModelSettings,
    providers: &ProvidersConfig,
) -> Result<Arc<dyn CompletionProvider>, LlmError> {
    let model_ref = ModelRef::parse(&settings.model)?;
    let endpoint = providers.endpoint(model_ref.provider);
    let api_key = endpoint.resolve_api_key().ok_or_else(|| {
        LlmError::AuthError(format!(
            "no API key for {}: set {} or providers.{}.api_key",
            model_ref.provider, endpoint.api_key_env, model_ref.provider
        ))
    })?;

    tracing::debug!(model = %model_ref, "building provider");

    let provider: Arc<dyn CompletionProvider> = match model_ref.provider {
        ProviderKind::Groq | ProviderKind::OpenAi => Arc::new(OpenAiAdapter::new(
            OpenAiConfig::new(api_key, model_ref.model)
                .with_base_url(endpoint.base_url.clone())
                .with_provider_name(model_ref.provider.name())
                .with_timeout_seconds(endpoint.timeout_seconds),
        )?),
        ProviderKind::Anthropic => Arc::new(AnthropicAdapter::new(
            AnthropicConfig::new(api_key, model_ref.model)
                .with_base_url(endpoint.base_url.clone())
                .with_timeout_seconds(endpoint.timeout_seconds),
        )?),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_groq_reference() {
        let r = ModelRef::parse("groq/llama-3.3-70b-versatile").expect("parse");
        assert_eq!(r.provider, ProviderKind::Groq);
        assert_eq!(r.model, "llama-3.3-70b-versatile");
        assert_eq!(r.to_string(), "groq/llama-3.3-70b-versatile");
    }

    #[test]
    fn parse_keeps_nested_slashes_in_model() {
        let r = ModelRef::parse("groq/meta-llama/llama-4-scout").expect("parse");
        assert_eq!(r.model, "meta-llama/llama-4-scout");
    }

    #[test]
    fn parse_is_case_insensitive_on_provider() {
        let r = ModelRef::parse("Anthropic/claude-3-5-sonnet-20241022").expect("parse");
        assert_eq!(r.provider, ProviderKind::Anthropic);
    }

    #[test]
    fn parse_rejects_bad_references() {
        assert!(ModelRef::parse("llama-3.3").is_err());
        assert!(ModelRef::parse("groq/").is_err());
        let err = ModelRef::parse("mystery/model").unwrap_err();
        assert!(err.to_string().contains("unknown provider"));
    }

    #[test]
    fn build_provider_without_key_is_auth_error() {
        let mut providers = ProvidersConfig::default();
        providers.groq.api_key = None;
        providers.groq.api_key_env = Some("DELVE_TEST_UNSET_GROQ_KEY".into());
        let settings = ModelSettings {
            model: "groq/llama-3.3-70b-versatile".into(),
            ..ModelSettings::default()
        };
        let err = match build_provider(&settings, &providers) {
            Ok(_) => unreachable!("key should be missing"),
            Err(e) => e,
        };
        assert!(matches!(err, LlmError::AuthError(_)));
        assert!(err.to_string().contains("DELVE_TEST_UNSET_GROQ_KEY"));
    }

    #[test]
    fn build_provider_picks_adapter_by_prefix() {
        let mut providers = ProvidersConfig::default();
        providers.anthropic.api_key = Some("test-key".into());
        providers.openai.api_key = Some("test-key".into());

        let settings = ModelSettings {
            model: "anthropic/claude-3-5-sonnet-20241022".into(),
            ..ModelSettings::default()
        };
        let provider = build_provider(&settings, &providers).expect("anthropic adapter");
        assert_eq!(provider.name(), "anthropic");

        let settings = ModelSettings {
            model: "openai/gpt-4o".into(),
            ..ModelSettings::default()
        };
        let provider = build_provider(&settings, &providers).expect("openai adapter");
        assert_eq!(provider.name(), "openai");
    }
}
