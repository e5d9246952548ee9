//! Agents: a persona, a model, and the tools it may consult.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::CrewError;
use super::task::{TaskOutput, TaskSpec, render_template};
use crate::llm::{CompletionProvider, Message, RequestOptions};
use crate::tools::Tool;

/// Role of the default research agent.
pub const RESEARCH_ROLE: &str = "Internet Research Specialist";

/// Role of the default summarizer agent.
pub const SUMMARIZER_ROLE: &str = "Information Summarizer and Analyst";

/// Input key passed to tools.
pub const TOPIC_INPUT: &str = "topic";

/// Who an agent is. Rendered into its system prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Role; also the name tasks use to pick the agent.
    pub role: String,
    /// What the agent is trying to achieve.
    pub goal: String,
    /// Persona background.
    pub backstory: String,
}

/// Profile of the agent that gathers raw findings.
pub fn research_agent_profile() -> AgentProfile {
    AgentProfile {
        role: RESEARCH_ROLE.to_string(),
        goal: "Search the internet for accurate, up-to-date information on any given topic. \
               Gather comprehensive data from multiple sources and provide raw research findings."
            .to_string(),
        backstory: "You are an expert internet researcher with a talent for finding relevant \
                    information quickly. You excel at using search tools to discover the most \
                    recent and authoritative sources on any subject. Your research is thorough, \
                    accurate, and well-sourced."
            .to_string(),
    }
}

/// Profile of the agent that condenses findings into a report.
pub fn summarizer_agent_profile() -> AgentProfile {
    AgentProfile {
        role: SUMMARIZER_ROLE.to_string(),
        goal: "Take raw research data and transform it into clear, concise, and well-structured \
               summaries. Extract key insights, identify trends, and present information in an \
               easy-to-understand format."
            .to_string(),
        backstory: "You are a skilled analyst and writer who specializes in distilling complex \
                    information into digestible summaries. You have a gift for identifying the \
                    most important points and presenting them in a logical, engaging manner. Your \
                    summaries are always accurate, insightful, and valuable."
            .to_string(),
    }
}

/// An agent bound to a model and a set of tools.
#[derive(Clone)]
pub struct Agent {
    profile: AgentProfile,
    provider: Arc<dyn CompletionProvider>,
    options: RequestOptions,
    tools: Vec<Arc<dyn Tool>>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.profile.role)
            .field("provider", &self.provider.name())
            .field("options", &self.options)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Agent {
    /// Create an agent without tools.
    pub fn new(
        profile: AgentProfile,
        provider: Arc<dyn CompletionProvider>,
        options: RequestOptions,
    ) -> Self {
        Self {
            profile,
            provider,
            options,
            tools: Vec::new(),
        }
    }

    /// Give the agent a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// The agent's role.
    pub fn role(&self) -> &str {
        &self.profile.role
    }

    /// The agent's profile.
    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// System prompt built from the profile.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.profile.role, self.profile.backstory, self.profile.goal
        )
    }

    /// Build the user prompt for `task`: the rendered task, tool
    /// observations, and the outputs of its context tasks.
    ///
    /// Tools receive the `topic` input, or the rendered description when
    /// there is none.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::MissingInput`] if the task references an input
    /// that was not supplied.
    pub async fn task_prompt(
        &self,
        task: &TaskSpec,
        inputs: &HashMap<String, String>,
        context: &[&TaskOutput],
    ) -> Result<String, CrewError> {
        let description = render_template(&task.name, &task.description, inputs)?;
        let expected = render_template(&task.name, &task.expected_output, inputs)?;

        let mut prompt = format!(
            "Current Task: {description}\n\n\
             This is the expected criteria for your final answer: {expected}\n\
             You MUST return the actual complete content as the final answer, not a summary."
        );

        let tool_input = inputs
            .get(TOPIC_INPUT)
            .map_or(description.as_str(), String::as_str);
        for tool in &self.tools {
            tracing::info!(agent = %self.profile.role, tool = tool.name(), "using tool");
            let observation = tool.call(tool_input).await;
            prompt.push_str(&format!(
                "\n\nTool: {}\nTool Input: {tool_input}\nObservation:\n{observation}",
                tool.name()
            ));
        }

        if !context.is_empty() {
            let joined = context
                .iter()
                .map(|o| o.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n----------\n\n");
            prompt.push_str(&format!(
                "\n\nThis is the context you're working with:\n{joined}"
            ));
        }

        prompt.push_str("\n\nBegin! This is VERY important to you, use the tools available and give your best Final Answer, your job depends on it!");
        Ok(prompt)
    }

    /// Perform `task` and return the model's answer.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::MissingInput`] for unrendered placeholders and
    /// [`CrewError::Llm`] if the completion fails.
    pub async fn perform(
        &self,
        task: &TaskSpec,
        inputs: &HashMap<String, String>,
        context: &[&TaskOutput],
    ) -> Result<TaskOutput, CrewError> {
        let prompt = self.task_prompt(task, inputs, context).await?;
        let messages = [Message::system(self.system_prompt()), Message::user(prompt)];

        let completion = self
            .provider
            .complete(&messages, &self.options)
            .await
            .map_err(|source| CrewError::Llm {
                task: task.name.clone(),
                source,
            })?;

        tracing::debug!(
            task = %task.name,
            model = %completion.model,
            chars = completion.text.len(),
            "task completed"
        );

        Ok(TaskOutput {
            task: task.name.clone(),
            agent_role: self.profile.role.clone(),
            text: completion.text,
        })
    }
}
