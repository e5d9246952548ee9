//! Two-step research analyst: search first, then ask a model to analyze
//! the results.
//!
//! The search step never fails: its text (results or an error message) is
//! handed to the model either way.

use std::sync::Arc;

use delve_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::config::DelveConfig;
use crate::error::Result;
use crate::llm::{CompletionProvider, LlmError, Message, RequestOptions, build_provider};

/// System prompt for the analyst model.
pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert internet researcher and analyst. \
     You will be provided with search results from the internet. \
     Analyze the information and provide a comprehensive, well-structured summary \
     with key insights, trends, and important findings. \
     Format your response with clear sections and bullet points.";

/// Build the analysis request for `query` and its search results.
pub fn analysis_prompt(query: &str, search_results: &str) -> String {
    format!(
        "Based on the following internet search results about \"{query}\":\n\n\
         {search_results}\n\n\
         Please provide a comprehensive analysis with:\n\
         1. **Summary**: Overview of key findings\n\
         2. **Main Trends**: Notable patterns and developments\n\
         3. **Key Insights**: Important takeaways\n\
         4. **Conclusion**: Brief summary of the most significant points\n\n\
         Use clear formatting with headers and bullet points."
    )
}

/// Output of [`Analyst::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystReport {
    /// The query that was researched.
    pub query: String,
    /// Text returned by the search step.
    pub search_results: String,
    /// The model's analysis.
    pub analysis: String,
}

/// Search-then-analyze pipeline.
pub struct Analyst {
    provider: Arc<dyn CompletionProvider>,
    options: RequestOptions,
    search: SearchConfig,
}

impl Analyst {
    /// Create an analyst using `provider`.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        options: RequestOptions,
        search: SearchConfig,
    ) -> Self {
        Self {
            provider,
            options,
            search,
        }
    }

    /// Build an analyst from the `analyst` section of the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the model reference is invalid or its API key is
    /// missing.
    pub fn from_config(config: &DelveConfig) -> Result<Self> {
        let provider = build_provider(&config.analyst, &config.providers)?;
        Ok(Self::new(
            provider,
            config.analyst.request_options(),
            config.search.clone(),
        ))
    }

    /// Search for `query`, then analyze the results.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the analysis request fails.
    pub async fn run(&self, query: &str) -> std::result::Result<AnalystReport, LlmError> {
        tracing::info!(query, "searching");
        let search_results = delve_search::search(query, &self.search).await;
        tracing::info!(chars = search_results.len(), "search completed");

        tracing::info!(provider = self.provider.name(), "analyzing search results");
        let messages = [
            Message::system(ANALYST_SYSTEM_PROMPT),
            Message::user(analysis_prompt(query, &search_results)),
        ];
        let completion = self.provider.complete(&messages, &self.options).await?;

        Ok(AnalystReport {
            query: query.to_string(),
            search_results,
            analysis: completion.text,
        })
    }
}
