mod agent;
mod executor;
mod session;

use agent::{AgentConfig, AgentError, HfCliAgent, LoginStatus, NO_ARGS};
use clap::{Parser, Subcommand};
use executor::{CommandExecutor, ExecutorConfig};
use futures::future::join_all;
use session::{JsonFileStore, SessionConfig};
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "hfagent")]
#[command(about = "Run huggingface-cli through an async agent with a cached session")]
struct Args {
    /// Hugging Face token used to log in
    #[arg(short, long, env = "HF_TOKEN", hide_env_values = true)]
    token: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    scenario: Option<Scenario>,
}

#[derive(Debug, Subcommand)]
enum Scenario {
    /// Log in, then ask who we are
    Chat,
    /// Log in, then list models and datasets concurrently
    Catalog {
        /// Entries per listing
        #[arg(long, default_value = "2")]
        limit: u32,
    },
    /// Log in, then run one arbitrary subcommand
    Run {
        cmd: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let agent_config = AgentConfig::from_env();
    let executor_config = ExecutorConfig::from_env();
    let session_config = SessionConfig::from_env();

    info!(
        program = %agent_config.program,
        timeout_secs = executor_config.timeout_secs,
        session_file = %session_config.path.display(),
        "Configuration loaded"
    );

    let store = Arc::new(JsonFileStore::new(session_config.path));
    let agent = HfCliAgent::new(agent_config, CommandExecutor::new(executor_config), store)?;
    info!(agent = %agent.name(), tools = agent.tool_definitions().len(), "Agent ready");

    if let Err(e) = run_scenario(&agent, &args.token, args.scenario).await {
        error!(error = %e, "scenario failed");
        process::exit(1);
    }

    Ok(())
}

async fn run_scenario(
    agent: &HfCliAgent,
    token: &str,
    scenario: Option<Scenario>,
) -> Result<(), AgentError> {
    if let LoginStatus::Rejected(result) = agent.ensure_login(token).await? {
        // later calls run unauthenticated; the CLI reports that itself
        println!("{}", result.to_json());
    }

    match scenario {
        Some(Scenario::Chat) => chat(agent).await,
        Some(Scenario::Catalog { limit }) => catalog(agent, limit).await,
        Some(Scenario::Run { cmd, args }) => {
            let run = agent.run_cli(&cmd, &args).await?;
            println!("{}", run.result.to_json());
            Ok(())
        }
        None => {
            chat(agent).await?;
            catalog(agent, 2).await
        }
    }
}

async fn chat(agent: &HfCliAgent) -> Result<(), AgentError> {
    let run = agent.run_cli("whoami", &NO_ARGS).await?;
    println!("{}", run.result.to_json());
    Ok(())
}

async fn catalog(agent: &HfCliAgent, limit: u32) -> Result<(), AgentError> {
    let limit = limit.to_string();
    let list_args = ["list", "--limit", limit.as_str(), "--json"];

    let runs = join_all(
        ["models", "datasets"]
            .into_iter()
            .map(|cmd| agent.run_cli(cmd, &list_args)),
    )
    .await;

    for run in runs {
        println!("{}", run?.result.to_json());
    }
    Ok(())
}
