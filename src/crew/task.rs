//! Task definitions and prompt templating.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::CrewError;

/// One unit of work assigned to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Unique task name; context lists refer to it.
    pub name: String,
    /// What to do. May contain `{input}` placeholders.
    pub description: String,
    /// What the answer should look like. May contain placeholders.
    pub expected_output: String,
    /// Role of the agent that performs the task.
    pub agent: String,
    /// Names of earlier tasks whose outputs this task receives.
    #[serde(default)]
    pub context: Vec<String>,
}

impl TaskSpec {
    /// Create a task with no context.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: Vec::new(),
        }
    }

    /// Add an upstream task whose output is passed in.
    pub fn with_context(mut self, task: impl Into<String>) -> Self {
        self.context.push(task.into());
        self
    }
}

/// Output of a finished task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Name of the task that produced it.
    pub task: String,
    /// Role of the agent that produced it.
    pub agent_role: String,
    /// The model's answer.
    pub text: String,
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Research a topic with the internet research tool.
pub fn research_task() -> TaskSpec {
    TaskSpec::new(
        "research",
        "Research the following topic thoroughly using internet search: {topic}. \
         Use the internet research tool to gather comprehensive information. \
         Collect data on current trends, recent developments, key facts, and important insights. \
         Provide detailed findings with relevant information from your search.",
        "A detailed research report containing:\n\
         - Key findings and facts about the topic\n\
         - Current trends and recent developments\n\
         - Important statistics or data points\n\
         - Relevant insights from search results\n\
         - Raw information organized by subtopics",
        super::agent::RESEARCH_ROLE,
    )
}

/// Summarize the output of [`research_task`].
pub fn summarize_task() -> TaskSpec {
    TaskSpec::new(
        "summarize",
        "Take the raw research findings and create a clear, well-structured summary. \
         Analyze the information, identify the most important points, and organize them logically. \
         Create a concise yet comprehensive summary that highlights key trends, insights, and takeaways. \
         Make the summary easy to understand for someone who wants to quickly grasp the main points.",
        "A polished summary report with:\n\
         - Executive summary (2-3 sentences overview)\n\
         - Key Points (3-5 main findings in bullet points)\n\
         - Trends and Insights (notable patterns or developments)\n\
         - Conclusion (brief takeaway or recommendation)\n\
         - Well-organized, professional formatting",
        super::agent::SUMMARIZER_ROLE,
    )
    .with_context("research")
}

/// Replace `{name}` placeholders with values from `inputs`.
///
/// Only braces around an identifier (`[A-Za-z0-9_]+`) count as
/// placeholders; any other brace is copied through.
///
/// # Errors
///
/// Returns [`CrewError::MissingInput`] for the first placeholder with no
/// matching input.
pub fn render_template(
    task: &str,
    template: &str,
    inputs: &HashMap<String, String>,
) -> Result<String, CrewError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}');
        let name = close.map(|c| &after[..c]);

        match name {
            Some(name) if is_placeholder(name) => {
                let value = inputs.get(name).ok_or_else(|| CrewError::MissingInput {
                    task: task.to_string(),
                    name: name.to_string(),
                })?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
