//! Pipeline entry points used by the CLI.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analyst::{Analyst, AnalystReport};
use crate::config::DelveConfig;
use crate::crew::agent::TOPIC_INPUT;
use crate::crew::{Crew, CrewOutput};
use crate::error::Result;

/// Output of [`run_both`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedReport {
    /// The analyst's report, or `None` if the analyst failed.
    pub analysis: Option<AnalystReport>,
    /// The crew's output.
    pub crew: CrewOutput,
}

/// Run the search-then-analyze pipeline for `topic`.
///
/// # Errors
///
/// Returns an error if the analyst cannot be built or its model call fails.
pub async fn run_analyst(config: &DelveConfig, topic: &str) -> Result<AnalystReport> {
    tracing::info!(topic, "running analyst");
    let analyst = Analyst::from_config(config)?;
    Ok(analyst.run(topic).await?)
}

/// Run the research crew for `topic`.
///
/// # Errors
///
/// Returns an error if the crew cannot be built or any task fails.
pub async fn run_crew(config: &DelveConfig, topic: &str) -> Result<CrewOutput> {
    tracing::info!(topic, "running research crew");
    let crew = Crew::research_crew(config)?;
    let inputs = HashMap::from([(TOPIC_INPUT.to_string(), topic.to_string())]);
    Ok(crew.kickoff(&inputs).await?)
}

/// Run the analyst, then the crew.
///
/// An analyst failure is logged and the crew still runs.
///
/// # Errors
///
/// Returns an error only if the crew fails.
pub async fn run_both(config: &DelveConfig, topic: &str) -> Result<CombinedReport> {
    let analysis = match run_analyst(config, topic).await {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!(error = %e, "analyst failed");
            None
        }
    };
    let crew = run_crew(config, topic).await?;
    Ok(CombinedReport { analysis, crew })
}
