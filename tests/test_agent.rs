// Integration tests for Agent module
// This file should be run with cargo test --test test_agent

#[path = "../src/executor/mod.rs"]
mod executor;

#[path = "../src/session/mod.rs"]
mod session;

#[path = "../src/agent/mod.rs"]
mod agent;

use std::sync::Arc;
use std::time::{Duration, Instant};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    });
}

/// Agent whose every command runs through `program`
fn create_agent(program: &str, store: Arc<dyn session::SessionStore>) -> agent::HfCliAgent {
    let config = agent::AgentConfig {
        program: program.to_string(),
        tools_toml_path: std::path::PathBuf::from("tools.toml"),
        ..Default::default()
    };
    agent::HfCliAgent::new(config, executor::CommandExecutor::default(), store)
        .expect("Failed to create agent")
}

fn create_runner(program: &str, timeout: Duration) -> agent::CliRunner {
    agent::CliRunner::new(executor::CommandExecutor::default(), program).with_timeout(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent::{AgentError, LoginStatus, NO_ARGS};
    use executor::ExecutorError;
    use session::{JsonFileStore, MemoryStore, Session, SessionStore};

    /// Subcommand and args follow the program
    #[tokio::test]
    async fn test_run_cli_prefixes_program() {
        init_tracing();

        let agent = create_agent("echo", Arc::new(MemoryStore::new()));
        let run = agent
            .run_cli("models", &["list", "--limit", "2", "--json"])
            .await
            .unwrap();

        assert_eq!(run.attempts, 1);
        assert_eq!(
            run.result.stdout.as_text(),
            Some("models list --limit 2 --json")
        );
    }

    /// Timeouts are retried exactly once
    #[tokio::test]
    async fn test_timeout_retried_once() {
        init_tracing();

        let runner = create_runner("sleep", Duration::from_millis(300));
        let start = Instant::now();
        let run = runner.run("5", &NO_ARGS).await.unwrap();

        assert_eq!(run.attempts, 2);
        assert!(run.result.is_timeout());
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    /// Exit 1 is never retried
    #[tokio::test]
    async fn test_rejected_not_retried() {
        init_tracing();

        let runner = create_runner("false", Duration::from_secs(10));
        let run = runner.run("whoami", &NO_ARGS).await.unwrap();

        assert_eq!(run.attempts, 1);
        assert_eq!(run.result.exit_code, 1);
    }

    /// Missing program surfaces as an environment error
    #[tokio::test]
    async fn test_missing_program() {
        init_tracing();

        let agent = create_agent("hfagent-definitely-missing-cli", Arc::new(MemoryStore::new()));
        let result = agent.run_cli("whoami", &NO_ARGS).await;

        assert!(matches!(
            result,
            Err(AgentError::Executor(ExecutorError::CommandNotFound(_)))
        ));
    }

    /// Successful login is cached and persisted
    #[tokio::test]
    async fn test_ensure_login_caches_token() {
        init_tracing();

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("session.json")));
        let agent = create_agent("echo", store.clone());

        assert_eq!(agent.ensure_login("hf_abc").await.unwrap(), LoginStatus::LoggedIn);
        assert_eq!(agent.ensure_login("hf_abc").await.unwrap(), LoginStatus::Cached);

        let saved = store.load().unwrap();
        assert_eq!(saved.hf_token(), Some("hf_abc"));
        assert!(saved.get("logged_in_at").is_some());

        // A new agent on the same store starts out logged in
        let reloaded = create_agent("echo", store);
        assert_eq!(reloaded.ensure_login("hf_abc").await.unwrap(), LoginStatus::Cached);
    }

    /// A different token triggers a fresh login
    #[tokio::test]
    async fn test_ensure_login_new_token() {
        init_tracing();

        let mut cached = Session::new();
        cached.set_hf_token("hf_old");
        let store = Arc::new(MemoryStore::with_session(cached));
        let agent = create_agent("echo", store.clone());

        assert_eq!(agent.ensure_login("hf_new").await.unwrap(), LoginStatus::LoggedIn);
        assert_eq!(agent.session().await.hf_token(), Some("hf_new"));
        assert_eq!(store.load().unwrap().hf_token(), Some("hf_new"));
    }

    /// Failed login leaves the session untouched
    #[tokio::test]
    async fn test_ensure_login_rejected() {
        init_tracing();

        let store = Arc::new(MemoryStore::new());
        let agent = create_agent("false", store.clone());

        match agent.ensure_login("hf_bad").await.unwrap() {
            LoginStatus::Rejected(result) => assert_eq!(result.exit_code, 1),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(agent.session().await.hf_token(), None);
        assert_eq!(store.load().unwrap().hf_token(), None);
    }

    /// The registry exposes run_hf_cli with a schema
    #[tokio::test]
    async fn test_tool_definitions() {
        init_tracing();

        let agent = create_agent("echo", Arc::new(MemoryStore::new()));
        let defs = agent.tool_definitions();

        let def = defs
            .iter()
            .find(|d| d.name == "run_hf_cli")
            .expect("Should have run_hf_cli tool");
        assert!(!def.description.is_empty());
        assert_eq!(def.input_schema["required"], serde_json::json!(["cmd"]));
    }

    /// Tool calls return the structured result
    #[tokio::test]
    async fn test_call_tool() {
        init_tracing();

        let agent = create_agent("echo", Arc::new(MemoryStore::new()));

        let output = agent
            .call_tool("run_hf_cli", serde_json::json!({"cmd": "whoami"}))
            .await
            .unwrap();
        assert_eq!(
            output,
            serde_json::json!({"exitCode": 0, "stdout": "whoami", "stderr": ""})
        );

        let output = agent
            .call_tool(
                "run_hf_cli",
                serde_json::json!({"cmd": "{\"count\":", "args": ["1}"]}),
            )
            .await
            .unwrap();
        assert_eq!(output["stdout"], serde_json::json!({"count": 1}));

        let output = agent
            .call_tool("run_hf_cli", serde_json::json!({"cmd": "whoami", "args": null}))
            .await
            .unwrap();
        assert_eq!(output["exitCode"], 0);
    }

    /// Unknown tools and bad input are rejected
    #[tokio::test]
    async fn test_call_tool_errors() {
        init_tracing();

        let agent = create_agent("echo", Arc::new(MemoryStore::new()));

        let result = agent
            .call_tool("nonexistent", serde_json::json!({"cmd": "whoami"}))
            .await;
        assert!(matches!(result, Err(AgentError::UnknownTool(_))));

        let result = agent
            .call_tool("run_hf_cli", serde_json::json!({"wrong_field": "value"}))
            .await;
        assert!(matches!(result, Err(AgentError::InvalidInput(_, _))));
    }

    /// Independent calls on one agent run concurrently
    #[tokio::test]
    async fn test_concurrent_run_cli() {
        init_tracing();

        let agent = create_agent("sh", Arc::new(MemoryStore::new()));
        let start = Instant::now();

        let runs = futures::future::join_all([
            agent.run_cli("-c", &["sleep 1; echo '{\"kind\": \"models\"}'"]),
            agent.run_cli("-c", &["sleep 1; echo '{\"kind\": \"datasets\"}'"]),
        ])
        .await;

        let kinds: Vec<_> = runs
            .into_iter()
            .map(|r| r.unwrap().result.stdout.as_json().unwrap()["kind"].clone())
            .collect();
        assert_eq!(kinds, vec!["models", "datasets"]);
        assert!(start.elapsed() < Duration::from_millis(1900));
    }
}
