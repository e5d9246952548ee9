//! Delve: web research agents backed by a DuckDuckGo snippet search.
//!
//! # Architecture
//!
//! - **Search** (`delve-search` crate): POSTs a query to the DuckDuckGo HTML
//!   endpoint and extracts up to five result snippets.
//! - **LLM**: non-streaming adapters for OpenAI-compatible APIs (OpenAI,
//!   Groq) and Anthropic behind [`llm::CompletionProvider`].
//! - **Tools**: [`tools::InternetResearchTool`] exposes the search to agents.
//! - **Analyst**: search, then one analysis completion.
//! - **Crew**: a researcher and a summarizer running ordered tasks, the
//!   second seeing the first's output.

pub mod analyst;
pub mod config;
pub mod crew;
pub mod error;
pub mod llm;
pub mod tools;
pub mod workflow;

pub use analyst::{Analyst, AnalystReport};
pub use config::DelveConfig;
pub use crew::{Crew, CrewError, CrewOutput};
pub use error::{DelveError, Result};
pub use workflow::{CombinedReport, run_analyst, run_both, run_crew};

/// Topic researched when none is given.
pub const DEFAULT_TOPIC: &str = "latest trends in generative AI";
