use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reqwest::Client;
use triage_agents::TriageAgent;
use triage_core::{sample_catalog, SymptomReport, UrgencyLevel};
use triage_llm::{OpenAiClassifier, OpenAiConfig};
use triage_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(about = "Triage AI CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify free-text symptoms and print the full assessment.
    Assess {
        symptoms: String,
        #[arg(long)]
        location: Option<String>,
    },
    /// List nearby resources for an urgency tier.
    Resources {
        #[arg(long, default_value = "moderate")]
        urgency: String,
        #[arg(long, default_value = "")]
        location: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("triage_cli");
    let cli = Cli::parse();

    let agent = build_agent()?;

    match cli.command {
        Command::Assess { symptoms, location } => {
            if symptoms.trim().is_empty() {
                anyhow::bail!("symptoms must not be empty");
            }

            let result = agent.assess(SymptomReport { symptoms, location }).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Resources { urgency, location } => {
            let urgency = UrgencyLevel::from_optional_str(Some(&urgency));
            let resources = agent.resources_for(&location, urgency);
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
    }

    Ok(())
}

fn build_agent() -> Result<TriageAgent<OpenAiClassifier>> {
    let http_client = Client::builder()
        .connect_timeout(Duration::from_secs(6))
        .timeout(Duration::from_secs(20))
        .build()?;
    let delegate =
        OpenAiConfig::from_env().map(|config| OpenAiClassifier::new(config, http_client));

    Ok(TriageAgent::new(
        Arc::new(sample_catalog()),
        delegate,
        AppMetrics::shared(),
    ))
}
