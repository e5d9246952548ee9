//! HTTP plumbing for the search endpoint.
//!
//! A fresh [`reqwest::Client`] is built per search so no connection pool
//! outlives the call.

use std::error::Error as _;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Build a [`reqwest::Client`] configured for the search endpoint.
///
/// The client has:
/// - Timeout from config
/// - The configured browser-like User-Agent
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Unexpected`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Unexpected(format!("failed to build HTTP client: {e}")))
}

/// POST `query` to the configured endpoint and return the response body.
///
/// # Errors
///
/// Returns [`SearchError::Transport`] for connection failures, timeouts,
/// non-2xx statuses and body read failures.
pub async fn fetch_results_page(query: &str, config: &SearchConfig) -> Result<String, SearchError> {
    let client = build_client(config)?;

    let response = client
        .post(config.endpoint.as_str())
        .form(&[("q", query)])
        .send()
        .await
        .map_err(|e| SearchError::Transport(describe(&e)))?
        .error_for_status()
        .map_err(|e| SearchError::Transport(describe(&e)))?;

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::Transport(describe(&e)))?;

    tracing::trace!(bytes = body.len(), "search response received");
    Ok(body)
}

/// Flatten a reqwest error and its source chain into one line, so the
/// message names the underlying cause (e.g. "operation timed out").
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    if err.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    message
}
