//! Configuration for the research pipelines.
//!
//! Everything the agents need (search settings, provider endpoints, model
//! choice per agent) is built once from a [`DelveConfig`] at startup and
//! passed down explicitly.

use std::path::{Path, PathBuf};

use delve_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DelveError, Result};
use crate::llm::ProviderKind;
use crate::llm::anthropic::ANTHROPIC_BASE_URL;
use crate::llm::message::RequestOptions;
use crate::llm::openai::{GROQ_BASE_URL, OPENAI_BASE_URL};

/// Model used by the research agent and the analyst by default.
pub const DEFAULT_RESEARCH_MODEL: &str = "groq/llama-3.3-70b-versatile";

/// Model used by the summarizer agent by default.
pub const DEFAULT_SUMMARIZER_MODEL: &str = "anthropic/claude-3-5-sonnet-20241022";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelveConfig {
    /// Web search settings shared by the research tool and the analyst.
    pub search: SearchConfig,
    /// Provider endpoints and credentials.
    pub providers: ProvidersConfig,
    /// Model for the crew's research agent.
    pub research_agent: ModelSettings,
    /// Model for the crew's summarizer agent.
    pub summarizer_agent: ModelSettings,
    /// Model for the two-step analyst pipeline.
    pub analyst: ModelSettings,
}

impl Default for DelveConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            providers: ProvidersConfig::default(),
            research_agent: ModelSettings::new(DEFAULT_RESEARCH_MODEL),
            summarizer_agent: ModelSettings::new(DEFAULT_SUMMARIZER_MODEL),
            analyst: ModelSettings::new(DEFAULT_RESEARCH_MODEL),
        }
    }
}

/// Which model an agent uses and how it samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// `"provider/model"` reference, e.g. `groq/llama-3.3-70b-versatile`.
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Optional cap on generated tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f64 {
    0.3
}

impl ModelSettings {
    /// Settings for `model` with the default temperature.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    /// Request options derived from these settings.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            temperature: Some(self.temperature),
            max_tokens: self.max_tokens,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::new(DEFAULT_RESEARCH_MODEL)
    }
}

/// Per-provider endpoint overrides. Unset fields use the provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Groq endpoint.
    pub groq: EndpointConfig,
    /// OpenAI endpoint.
    pub openai: EndpointConfig,
    /// Anthropic endpoint.
    pub anthropic: EndpointConfig,
}

impl ProvidersConfig {
    /// Resolve the endpoint for `kind`, filling unset fields with defaults.
    pub fn endpoint(&self, kind: ProviderKind) -> Endpoint {
        let (overrides, base_url, api_key_env) = match kind {
            ProviderKind::Groq => (&self.groq, GROQ_BASE_URL, "GROQ_API_KEY"),
            ProviderKind::OpenAi => (&self.openai, OPENAI_BASE_URL, "OPENAI_API_KEY"),
            ProviderKind::Anthropic => (&self.anthropic, ANTHROPIC_BASE_URL, "ANTHROPIC_API_KEY"),
        };
        Endpoint {
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| base_url.to_string()),
            api_key_env: overrides
                .api_key_env
                .clone()
                .unwrap_or_else(|| api_key_env.to_string()),
            api_key: overrides.api_key.clone(),
            timeout_seconds: overrides.timeout_seconds.unwrap_or(120),
        }
    }
}

/// Endpoint overrides for one provider as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL without the API path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Inline API key; takes precedence over the environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// A fully resolved provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL without the API path.
    pub base_url: String,
    /// Environment variable consulted for the API key.
    pub api_key_env: String,
    /// Inline API key, if configured.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Endpoint {
    /// The inline key if set, otherwise the environment variable. Blank
    /// values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

impl DelveConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the search
    /// section is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| DelveError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DelveError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if given, else from [`Self::default_config_path`]
    /// if that file exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named or existing file fails to load.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.exists() {
            tracing::debug!(path = %default_path.display(), "loading config");
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path: `~/.config/delve/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("delve").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("delve")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/delve-config/config.toml")
        }
    }

    /// Check the search settings and that every model reference parses.
    ///
    /// # Errors
    ///
    /// Returns [`DelveError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search
            .validate()
            .map_err(|e| DelveError::Config(format!("search: {e}")))?;
        for (name, settings) in [
            ("research_agent", &self.research_agent),
            ("summarizer_agent", &self.summarizer_agent),
            ("analyst", &self.analyst),
        ] {
            crate::llm::ModelRef::parse(&settings.model)
                .map_err(|e| DelveError::Config(format!("{name}: {}", e.message())))?;
            if !(0.0..=2.0).contains(&settings.temperature) {
                return Err(DelveError::Config(format!(
                    "{name}: temperature must be between 0.0 and 2.0"
                )));
            }
        }
        Ok(())
    }
}
