// Agent types

use crate::executor::CommandResult;
use std::path::PathBuf;

/// Empty argument list for commands that take none
pub const NO_ARGS: [&str; 0] = [];

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent name reported to the orchestration layer
    pub name: String,
    /// CLI binary every command is run through
    pub program: String,
    /// Path to tools.toml with description overrides
    pub tools_toml_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "HF-CLI-EXECUTOR".to_string(),
            program: "huggingface-cli".to_string(),
            tools_toml_path: PathBuf::from("tools.toml"),
        }
    }
}

/// A CLI call after the retry policy has been applied
#[derive(Debug, Clone)]
pub struct CliRun {
    /// Result of the last attempt
    pub result: CommandResult,
    /// Number of times the command was spawned
    pub attempts: u32,
}

/// Outcome of `ensure_login`
#[derive(Debug, Clone, PartialEq)]
pub enum LoginStatus {
    /// Token already cached in the session, nothing was run
    Cached,
    /// Login succeeded and the token was saved
    LoggedIn,
    /// Login command failed; the session was left untouched
    Rejected(CommandResult),
}
