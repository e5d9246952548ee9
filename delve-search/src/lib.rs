//! # delve-search
//!
//! Single-shot web search for delve's research agents.
//!
//! One call issues one POST to a search engine's HTML endpoint, parses the
//! page, and returns up to five text snippets. No API keys, no caching, no
//! retries.
//!
//! ## Design
//!
//! - [`try_search`] returns a structured [`SearchReport`] or [`SearchError`]
//! - [`search`] renders either outcome as plain text for LLM prompts and
//!   never fails
//! - Class names live in a [`SelectorSchema`]; extraction sits behind
//!   [`SnippetExtractor`] so the schema can change without touching the
//!   request path
//!
//! ## Security
//!
//! - Search queries are logged only at trace level
//! - No network listeners; this is a library, not a server

pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError, SearchErrorKind};
pub use extract::{SchemaExtractor, SelectorSchema, SnippetExtractor};
pub use types::SearchReport;

/// Parsed document handed to [`SnippetExtractor::extract`].
pub use scraper::Html;

/// Search using the schema in `config`.
///
/// # Errors
///
/// - [`SearchError::Config`] if `config` is invalid
/// - [`SearchError::Unexpected`] if the schema does not compile
/// - [`SearchError::Transport`] if the HTTP exchange fails
/// - [`SearchError::NoResults`] if no snippet could be extracted
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> delve_search::Result<()> {
/// let config = delve_search::SearchConfig::default();
/// let report = delve_search::try_search("rust programming", &config).await?;
/// for snippet in &report.snippets {
///     println!("{snippet}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn try_search(query: &str, config: &SearchConfig) -> Result<SearchReport> {
    config.validate()?;
    let extractor = SchemaExtractor::compile(&config.schema, config.max_snippets)?;
    try_search_with(query, config, &extractor).await
}

/// Search using a caller-supplied extractor. `config.schema` is ignored.
///
/// # Errors
///
/// Same as [`try_search`], except schema compilation is the caller's concern.
pub async fn try_search_with<E>(
    query: &str,
    config: &SearchConfig,
    extractor: &E,
) -> Result<SearchReport>
where
    E: SnippetExtractor + ?Sized,
{
    config.validate()?;
    tracing::trace!(query, "web search");

    let body = http::fetch_results_page(query, config).await?;

    // Html is not Send; keep it out of scope of any await point.
    let snippets = {
        let document = Html::parse_document(&body);
        extractor.extract(&document)
    };
    let snippets: Vec<String> = snippets
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .take(config.max_snippets)
        .collect();

    if snippets.is_empty() {
        return Err(SearchError::NoResults {
            query: query.to_owned(),
        });
    }
    tracing::debug!(count = snippets.len(), "web search completed");
    Ok(SearchReport::new(query, snippets))
}

/// Search and render the outcome as plain text.
///
/// Returns `Search results for '<query>':` followed by the snippets on
/// success, or one of the `Error performing internet search: ...`,
/// `No results found for query: ...`, `Unexpected error during search: ...`
/// messages. Never returns an error.
pub async fn search(query: &str, config: &SearchConfig) -> String {
    render(try_search(query, config).await)
}

/// [`search`] with [`SearchConfig::default()`].
pub async fn search_default(query: &str) -> String {
    search(query, &SearchConfig::default()).await
}

/// Blocking form of [`search`] for callers without an async runtime.
///
/// Drives the request on a private current-thread runtime owned by a
/// scoped worker thread, so it also works from `spawn_blocking` or from
/// inside a runtime. Never panics.
pub fn search_blocking(query: &str, config: &SearchConfig) -> String {
    let outcome = std::thread::scope(|scope| {
        scope
            .spawn(|| {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| SearchError::Unexpected(format!("failed to start runtime: {e}")))?;
                Ok::<_, SearchError>(runtime.block_on(search(query, config)))
            })
            .join()
    });

    match outcome {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => err.legacy_message(),
        Err(_) => SearchError::Unexpected("search worker thread panicked".into()).legacy_message(),
    }
}

/// Render a structured outcome as the plain-text form.
pub fn render(outcome: Result<SearchReport>) -> String {
    match outcome {
        Ok(report) => report.to_string(),
        Err(err) => {
            tracing::debug!(kind = %err.kind(), error = %err, "web search failed");
            err.legacy_message()
        }
    }
}
