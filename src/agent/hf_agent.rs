// HF CLI agent - session-aware wrapper around the CLI runner

use crate::executor::CommandExecutor;
use crate::session::{LOGGED_IN_AT_KEY, Session, SessionStore};

use super::error::Result;
use super::runner::CliRunner;
use super::tool::{
    RUN_CLI_TOOL, RunCliTool, ToolDefinition, ToolRegistry, default_run_cli_description,
    load_tool_descriptions,
};
use super::types::{AgentConfig, CliRun, LoginStatus};

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Agent exposing the CLI as a tool, with a persisted session
pub struct HfCliAgent {
    config: AgentConfig,
    runner: Arc<CliRunner>,
    tools: ToolRegistry,
    store: Arc<dyn SessionStore>,
    session: Mutex<Session>,
}

impl HfCliAgent {
    /// Create the agent, loading its session from `store`
    pub fn new(
        config: AgentConfig,
        executor: CommandExecutor,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let runner = Arc::new(CliRunner::new(executor, config.program.clone()));
        let session = store.load()?;

        let descriptions = load_tool_descriptions(&config.tools_toml_path).unwrap_or_else(|e| {
            warn!(path = %config.tools_toml_path.display(), error = %e, "ignoring unreadable tools.toml");
            Default::default()
        });
        let description = descriptions
            .get(RUN_CLI_TOOL)
            .cloned()
            .unwrap_or_else(default_run_cli_description);

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(RunCliTool::new(runner.clone(), description)));

        info!(
            name = %config.name,
            program = %runner.program(),
            timeout_ms = runner.timeout().as_millis() as u64,
            tool_count = tools.len(),
            has_token = session.hf_token().is_some(),
            "agent initialized"
        );

        Ok(Self {
            config,
            runner,
            tools,
            store,
            session: Mutex::new(session),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Run one CLI subcommand with the retry policy applied
    pub async fn run_cli<S: AsRef<str>>(&self, cmd: &str, args: &[S]) -> Result<CliRun> {
        Ok(self.runner.run(cmd, args).await?)
    }

    /// Log in with `token` unless the session already holds it.
    ///
    /// The token is only persisted after the login command exits 0.
    pub async fn ensure_login(&self, token: &str) -> Result<LoginStatus> {
        let mut session = self.session.lock().await;

        if session.hf_token() == Some(token) {
            info!("token already cached, skipping login");
            return Ok(LoginStatus::Cached);
        }

        let run = self.runner.run("login", &["--token", token]).await?;
        if !run.result.is_success() {
            warn!(
                exit_code = run.result.exit_code,
                stderr = %run.result.stderr,
                "login rejected"
            );
            return Ok(LoginStatus::Rejected(run.result));
        }

        session.set_hf_token(token);
        session.set(LOGGED_IN_AT_KEY, Utc::now().to_rfc3339());
        self.store.save(&session)?;

        info!(attempts = run.attempts, "login succeeded, session saved");
        Ok(LoginStatus::LoggedIn)
    }

    /// Snapshot of the current session
    #[allow(dead_code)]
    pub async fn session(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Tool definitions for the orchestration layer
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// Call a registered tool by name
    #[allow(dead_code)]
    pub async fn call_tool(&self, name: &str, input: serde_json::Value) -> Result<serde_json::Value> {
        self.tools.call(name, input).await
    }
}
