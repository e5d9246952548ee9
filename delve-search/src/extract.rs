//! Snippet extraction from search result pages.
//!
//! The result page markup is owned by the search backend and changes
//! without notice, so the class names live in a [`SelectorSchema`] and the
//! two-strategy lookup sits behind [`SnippetExtractor`]. Request and error
//! handling never look at the markup.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Class names locating snippets in a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSchema {
    /// Class on the anchor holding a result's text snippet.
    pub snippet_class: String,
    /// Class on the anchor holding a result's title link.
    pub title_class: String,
    /// Class on the container wrapping one result.
    pub body_class: String,
    /// Tag name of that container.
    pub body_tag: String,
}

impl SelectorSchema {
    /// Schema for DuckDuckGo's HTML-only results page.
    pub fn duckduckgo() -> Self {
        Self {
            snippet_class: "result__snippet".into(),
            title_class: "result__a".into(),
            body_class: "result__body".into(),
            body_tag: "div".into(),
        }
    }

    /// Checks that no class or tag name is blank.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (field, value) in [
            ("snippet_class", &self.snippet_class),
            ("title_class", &self.title_class),
            ("body_class", &self.body_class),
            ("body_tag", &self.body_tag),
        ] {
            if value.trim().is_empty() {
                return Err(SearchError::Config(format!(
                    "schema.{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SelectorSchema {
    fn default() -> Self {
        Self::duckduckgo()
    }
}

/// Turns a parsed result page into an ordered list of snippet texts.
pub trait SnippetExtractor: Send + Sync {
    /// Extract snippets in document order. Returns an empty list when the
    /// page holds nothing recognisable; never fails.
    fn extract(&self, document: &Html) -> Vec<String>;
}

/// [`SnippetExtractor`] driven by a [`SelectorSchema`].
///
/// The primary strategy reads snippet anchors directly. Only when that
/// yields nothing does the fallback walk from each title anchor up to its
/// result container and back down to the snippet anchor inside it.
#[derive(Debug)]
pub struct SchemaExtractor {
    snippet: Selector,
    title: Selector,
    body_tag: String,
    body_class: String,
    limit: usize,
}

impl SchemaExtractor {
    /// Compile `schema` into CSS selectors. Each strategy inspects at most
    /// `limit` anchors.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Unexpected`] if a class name does not form a
    /// valid selector.
    pub fn compile(schema: &SelectorSchema, limit: usize) -> Result<Self, SearchError> {
        Ok(Self {
            snippet: parse_selector(&format!("a.{}", schema.snippet_class))?,
            title: parse_selector(&format!("a.{}", schema.title_class))?,
            body_tag: schema.body_tag.clone(),
            body_class: schema.body_class.clone(),
            limit,
        })
    }

    fn primary(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.snippet)
            .take(self.limit)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn fallback(&self, document: &Html) -> Vec<String> {
        let mut snippets = Vec::new();
        for title in document.select(&self.title).take(self.limit) {
            let Some(body) = self.result_body(title) else {
                tracing::trace!("title anchor without result container, skipped");
                continue;
            };
            let Some(snippet) = body.select(&self.snippet).next() else {
                tracing::trace!("result container without snippet anchor, skipped");
                continue;
            };
            let text = element_text(snippet);
            if !text.is_empty() {
                snippets.push(text);
            }
        }
        snippets
    }

    /// Nearest ancestor matching the result container tag and class.
    fn result_body<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| {
                let value = ancestor.value();
                value.name() == self.body_tag
                    && value.classes().any(|class| class == self.body_class)
            })
    }
}

impl SnippetExtractor for SchemaExtractor {
    fn extract(&self, document: &Html) -> Vec<String> {
        let primary = self.primary(document);
        if !primary.is_empty() {
            tracing::debug!(count = primary.len(), "snippets extracted (primary)");
            return primary;
        }
        let fallback = self.fallback(document);
        tracing::debug!(count = fallback.len(), "snippets extracted (fallback)");
        fallback
    }
}

fn parse_selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css)
        .map_err(|e| SearchError::Unexpected(format!("invalid selector {css:?}: {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
