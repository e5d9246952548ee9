//! Multi-agent crew: an ordered list of tasks, each performed by one agent.
//!
//! Tasks run strictly in order. A task receives the outputs of the tasks
//! named in its `context`, which must all come earlier in the list, so the
//! summarizer sees what the researcher found.

pub mod agent;
pub mod task;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use agent::{Agent, AgentProfile, research_agent_profile, summarizer_agent_profile};
pub use task::{TaskOutput, TaskSpec, research_task, summarize_task};

use crate::config::DelveConfig;
use crate::error::Result;
use crate::llm::{LlmError, build_provider};
use crate::tools::InternetResearchTool;

/// Errors from building or running a crew.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    /// A crew needs at least one task.
    #[error("crew has no tasks")]
    NoTasks,

    /// Two tasks share a name.
    #[error("duplicate task name: {0}")]
    DuplicateTask(String),

    /// A task names an agent role that is not in the crew.
    #[error("task {task:?} is assigned to unknown agent {agent:?}")]
    UnknownAgent {
        /// Task name.
        task: String,
        /// Missing agent role.
        agent: String,
    },

    /// A task's context names a task that does not run before it.
    #[error("task {task:?} uses {context:?} as context, but it is not an earlier task")]
    UnknownContext {
        /// Task name.
        task: String,
        /// Offending context entry.
        context: String,
    },

    /// A template placeholder has no matching input.
    #[error("task {task:?} needs input {name:?}")]
    MissingInput {
        /// Task name.
        task: String,
        /// Placeholder name.
        name: String,
    },

    /// The model call for a task failed.
    #[error("task {task:?} failed: {source}")]
    Llm {
        /// Task name.
        task: String,
        /// Underlying provider error.
        #[source]
        source: LlmError,
    },
}

/// Result of a full kickoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Every task's output, in execution order.
    pub tasks: Vec<TaskOutput>,
    /// Text of the last task.
    pub final_output: String,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.final_output)
    }
}

/// A validated set of agents and tasks.
#[derive(Debug)]
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<TaskSpec>,
}

impl Crew {
    /// Build a crew, checking that every task can run.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::NoTasks`], [`CrewError::DuplicateTask`],
    /// [`CrewError::UnknownAgent`] or [`CrewError::UnknownContext`].
    pub fn new(agents: Vec<Agent>, tasks: Vec<TaskSpec>) -> std::result::Result<Self, CrewError> {
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        let roles: HashSet<&str> = agents.iter().map(Agent::role).collect();
        let mut earlier: HashSet<&str> = HashSet::new();
        for task in &tasks {
            if !roles.contains(task.agent.as_str()) {
                return Err(CrewError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                });
            }
            if let Some(missing) = task.context.iter().find(|c| !earlier.contains(c.as_str())) {
                return Err(CrewError::UnknownContext {
                    task: task.name.clone(),
                    context: missing.clone(),
                });
            }
            if !earlier.insert(task.name.as_str()) {
                return Err(CrewError::DuplicateTask(task.name.clone()));
            }
        }

        Ok(Self { agents, tasks })
    }

    /// The default two-agent research crew.
    ///
    /// The research agent searches with the internet research tool; the
    /// summarizer turns its findings into a report.
    ///
    /// # Errors
    ///
    /// Returns an error if a model reference is invalid or its API key is
    /// missing.
    pub fn research_crew(config: &DelveConfig) -> Result<Self> {
        let research_provider = build_provider(&config.research_agent, &config.providers)?;
        let summarizer_provider = build_provider(&config.summarizer_agent, &config.providers)?;

        let researcher = Agent::new(
            research_agent_profile(),
            research_provider,
            config.research_agent.request_options(),
        )
        .with_tool(Arc::new(InternetResearchTool::new(config.search.clone())));
        let summarizer = Agent::new(
            summarizer_agent_profile(),
            summarizer_provider,
            config.summarizer_agent.request_options(),
        );

        Ok(Self::new(
            vec![researcher, summarizer],
            vec![research_task(), summarize_task()],
        )?)
    }

    /// Task specs in execution order.
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Run every task in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing task and returns its error.
    pub async fn kickoff(
        &self,
        inputs: &HashMap<String, String>,
    ) -> std::result::Result<CrewOutput, CrewError> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            let agent = self
                .agents
                .iter()
                .find(|a| a.role() == task.agent)
                .ok_or_else(|| CrewError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                })?;
            let context: Vec<&TaskOutput> = outputs
                .iter()
                .filter(|o| task.context.contains(&o.task))
                .collect();

            tracing::info!(task = %task.name, agent = %agent.role(), "starting task");
            let output = agent.perform(task, inputs, &context).await?;
            tracing::info!(task = %task.name, "finished task");
            outputs.push(output);
        }

        let final_output = outputs
            .last()
            .map(|o| o.text.clone())
            .unwrap_or_default();
        Ok(CrewOutput {
            tasks: outputs,
            final_output,
        })
    }
}
