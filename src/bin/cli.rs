//! CLI binary for delve.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use delve::{AnalystReport, CrewOutput, DEFAULT_TOPIC, DelveConfig, run_analyst, run_both, run_crew};
use tracing_subscriber::EnvFilter;

/// Delve: research a topic on the web with LLM agents.
#[derive(Parser)]
#[command(name = "delve", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands. Each takes an optional topic.
#[derive(Subcommand)]
enum Command {
    /// Print the raw search results.
    Search(Topic),

    /// Search, then analyze the results with one model.
    Analyze(Topic),

    /// Run the researcher and summarizer crew.
    Crew(Topic),

    /// Run the analyst, then the crew.
    Both(Topic),
}

#[derive(clap::Args)]
struct Topic {
    /// What to research.
    topic: Vec<String>,
}

impl Topic {
    fn text(&self) -> String {
        let joined = self.topic.join(" ");
        if joined.trim().is_empty() {
            DEFAULT_TOPIC.to_string()
        } else {
            joined
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only results.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("delve=info,delve_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = DelveConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search(topic) => {
            println!("{}", delve_search::search(&topic.text(), &config.search).await);
        }
        Command::Analyze(topic) => {
            let topic = topic.text();
            let report = run_analyst(&config, &topic).await?;
            print_analysis(&report);
        }
        Command::Crew(topic) => {
            let topic = topic.text();
            let output = run_crew(&config, &topic).await?;
            print_crew(&topic, &output);
        }
        Command::Both(topic) => {
            let topic = topic.text();
            let report = run_both(&config, &topic).await?;
            if let Some(analysis) = &report.analysis {
                print_analysis(analysis);
            }
            print_crew(&topic, &report.crew);
        }
    }
    Ok(())
}

fn print_analysis(report: &AnalystReport) {
    println!("{}", banner(&format!("Analysis: {}", report.query)));
    println!("{}", report.analysis);
}

fn print_crew(topic: &str, output: &CrewOutput) {
    println!("{}", banner(&format!("Crew report: {topic}")));
    println!("{output}");
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(60);
    format!("\n{rule}\n{title}\n{rule}")
}
