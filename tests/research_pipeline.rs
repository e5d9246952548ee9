//! End-to-end tests for the analyst and crew pipelines.
//!
//! The search endpoint is a wiremock server; models are in-process fakes
//! that record what they were sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use delve::analyst::{ANALYST_SYSTEM_PROMPT, Analyst};
use delve::config::ModelSettings;
use delve::{DelveConfig, run_both};
use delve::crew::agent::{RESEARCH_ROLE, SUMMARIZER_ROLE, TOPIC_INPUT};
use delve::crew::{
    Agent, Crew, CrewError, research_agent_profile, research_task, summarize_task,
    summarizer_agent_profile,
};
use delve::llm::{Completion, CompletionProvider, LlmError, Message, RequestOptions, Role};
use delve::tools::InternetResearchTool;
use delve_search::SearchConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"<html><body>
<div class="result results_links"><div class="links_main result__body">
  <h2><a class="result__a" href="https://www.rust-lang.org">Rust</a></h2>
  <a class="result__snippet" href="https://www.rust-lang.org">Rust is fast and memory-efficient.</a>
</div></div>
<div class="result results_links"><div class="links_main result__body">
  <h2><a class="result__a" href="https://go.dev">Go</a></h2>
  <a class="result__snippet" href="https://go.dev">Go is simple and productive.</a>
</div></div>
</body></html>"#;

/// Replies with a fixed text and records every conversation.
struct Recorder {
    reply: String,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl Recorder {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn conversations(&self) -> Vec<Vec<Message>> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CompletionProvider for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &RequestOptions,
    ) -> Result<Completion, LlmError> {
        self.seen.lock().expect("lock").push(messages.to_vec());
        Ok(Completion {
            text: self.reply.clone(),
            model: "recorder-1".into(),
        })
    }
}

async fn search_server(body: &str) -> (MockServer, SearchConfig) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    let config = SearchConfig {
        endpoint: format!("{}/html/", server.uri()),
        timeout_seconds: 5,
        ..SearchConfig::default()
    };
    (server, config)
}

fn topic(value: &str) -> HashMap<String, String> {
    HashMap::from([(TOPIC_INPUT.to_string(), value.to_string())])
}

#[tokio::test]
async fn analyst_sends_search_results_to_model() {
    let (_server, search) = search_server(RESULTS_PAGE).await;
    let model = Recorder::new("## Summary\nRust and Go both thrive.");
    let analyst = Analyst::new(model.clone(), RequestOptions::new().with_temperature(0.3), search);

    let report = analyst.run("rust vs go").await.expect("analysis");

    assert_eq!(
        report.search_results,
        "Search results for 'rust vs go':\n\n\
         Rust is fast and memory-efficient.\n\n\
         Go is simple and productive."
    );
    assert_eq!(report.analysis, "## Summary\nRust and Go both thrive.");

    let conversations = model.conversations();
    assert_eq!(conversations.len(), 1);
    let messages = &conversations[0];
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, ANALYST_SYSTEM_PROMPT);
    assert!(messages[1].content.contains(&report.search_results));
    assert!(messages[1].content.contains("\"rust vs go\""));
}

#[tokio::test]
async fn analyst_forwards_search_failure_text() {
    let (_server, search) = search_server("<html><body></body></html>").await;
    let model = Recorder::new("nothing to analyze");
    let analyst = Analyst::new(model.clone(), RequestOptions::new(), search);

    let report = analyst.run("zzqx").await.expect("analysis");
    assert_eq!(report.search_results, "No results found for query: zzqx");
    assert!(model.conversations()[0][1]
        .content
        .contains("No results found for query: zzqx"));
}

#[tokio::test]
async fn crew_forwards_research_into_summary() {
    let (_server, search) = search_server(RESULTS_PAGE).await;
    let researcher_model = Recorder::new("RESEARCH NOTES: Rust and Go");
    let summarizer_model = Recorder::new("FINAL SUMMARY");

    let researcher = Agent::new(
        research_agent_profile(),
        researcher_model.clone(),
        RequestOptions::new(),
    )
    .with_tool(Arc::new(InternetResearchTool::new(search)));
    let summarizer = Agent::new(
        summarizer_agent_profile(),
        summarizer_model.clone(),
        RequestOptions::new(),
    );

    let crew = Crew::new(
        vec![researcher, summarizer],
        vec![research_task(), summarize_task()],
    )
    .expect("crew");
    let output = crew.kickoff(&topic("rust vs go")).await.expect("kickoff");

    assert_eq!(output.final_output, "FINAL SUMMARY");
    assert_eq!(output.tasks[0].agent_role, RESEARCH_ROLE);
    assert_eq!(output.tasks[1].agent_role, SUMMARIZER_ROLE);

    let research_prompt = &researcher_model.conversations()[0][1].content;
    assert!(research_prompt.contains("using internet search: rust vs go."));
    assert!(research_prompt.contains("Tool: Internet Research Tool"));
    assert!(research_prompt.contains("Rust is fast and memory-efficient."));

    let summary_prompt = &summarizer_model.conversations()[0][1].content;
    assert!(summary_prompt.contains("RESEARCH NOTES: Rust and Go"));
    assert!(!summary_prompt.contains("Tool:"));
}

#[tokio::test]
async fn crew_without_topic_reports_missing_input() {
    let crew = Crew::new(
        vec![Agent::new(
            research_agent_profile(),
            Recorder::new("unused"),
            RequestOptions::new(),
        )],
        vec![research_task()],
    )
    .expect("crew");

    let err = crew.kickoff(&HashMap::new()).await.unwrap_err();
    assert!(matches!(err, CrewError::MissingInput { ref name, .. } if name == "topic"));
}

/// One server standing in for both the search endpoint and an
/// OpenAI-compatible model.
async fn combined_server(reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": reply}}]
        })))
        .mount(&server)
        .await;
    server
}

fn openai_config(server: &MockServer) -> DelveConfig {
    let mut config = DelveConfig::default();
    config.search.endpoint = format!("{}/html/", server.uri());
    config.providers.openai.api_key = Some("test-key".into());
    config.providers.openai.base_url = Some(server.uri());
    for settings in [
        &mut config.research_agent,
        &mut config.summarizer_agent,
        &mut config.analyst,
    ] {
        *settings = ModelSettings::new("openai/gpt-4o-mini");
    }
    config
}

#[tokio::test]
async fn run_both_returns_analysis_and_crew_output() {
    let server = combined_server("model reply").await;
    let config = openai_config(&server);

    let report = run_both(&config, "rust vs go").await.expect("both");
    let analysis = report.analysis.expect("analysis");
    assert_eq!(analysis.analysis, "model reply");
    assert_eq!(report.crew.final_output, "model reply");
    assert_eq!(report.crew.tasks.len(), 2);
}

#[tokio::test]
async fn run_both_still_runs_crew_when_analyst_fails() {
    let server = combined_server("crew reply").await;
    let mut config = openai_config(&server);
    config.analyst = ModelSettings::new("groq/llama-3.3-70b-versatile");
    config.providers.groq.api_key = None;
    config.providers.groq.api_key_env = Some("DELVE_TEST_UNSET_GROQ_KEY".into());

    let report = run_both(&config, "rust vs go").await.expect("crew result");
    assert!(report.analysis.is_none());
    assert_eq!(report.crew.final_output, "crew reply");
}

#[tokio::test]
async fn run_both_fails_when_crew_fails() {
    let server = combined_server("unused").await;
    let mut config = openai_config(&server);
    config.summarizer_agent = ModelSettings::new("anthropic/claude-3-5-sonnet-20241022");
    config.providers.anthropic.api_key = None;
    config.providers.anthropic.api_key_env = Some("DELVE_TEST_UNSET_ANTHROPIC_KEY".into());

    let err = run_both(&config, "rust vs go").await.unwrap_err();
    assert!(err.to_string().contains("AUTH_FAILED"), "{err}");
}
