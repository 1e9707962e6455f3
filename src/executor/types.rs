// Data types for Executor module

use serde::Serialize;

/// Exit code reserved for a process killed after its timeout expired
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Stderr reported in place of captured output when a process times out
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// Captured standard output, parsed when it carries a JSON object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stdout {
    Json(serde_json::Value),
    Text(String),
}

impl Stdout {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Stdout::Json(value) => Some(value),
            Stdout::Text(_) => None,
        }
    }

    #[allow(dead_code)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Stdout::Json(_) => None,
            Stdout::Text(text) => Some(text),
        }
    }
}

/// Outcome of one execution attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Process exit code, or `TIMEOUT_EXIT_CODE` when killed on timeout
    pub exit_code: i32,
    pub stdout: Stdout,
    pub stderr: String,
}

impl CommandResult {
    /// Result for a process that was killed because it ran too long
    pub fn timed_out() -> Self {
        Self {
            exit_code: TIMEOUT_EXIT_CODE,
            stdout: Stdout::Text(String::new()),
            stderr: TIMEOUT_MESSAGE.to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn is_timeout(&self) -> bool {
        self.exit_code == TIMEOUT_EXIT_CODE
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn class(&self) -> ExitClass {
        ExitClass::from_code(self.exit_code)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "exitCode": self.exit_code,
            "stdout": self.stdout,
            "stderr": self.stderr,
        })
    }
}

/// How callers should read an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    Success,
    /// Invalid argument or authentication failure
    Rejected,
    /// Command missing or not executable
    Unavailable,
    /// Killed after the timeout expired
    TimedOut,
    /// Any other non-zero exit
    Failed(i32),
}

/// What a caller should do after a given `ExitClass`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    None,
    Never,
    Escalate,
    Once,
}

impl ExitClass {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ExitClass::Success,
            1 => ExitClass::Rejected,
            126 | 127 => ExitClass::Unavailable,
            TIMEOUT_EXIT_CODE => ExitClass::TimedOut,
            other => ExitClass::Failed(other),
        }
    }

    pub fn retry_policy(self) -> RetryPolicy {
        match self {
            ExitClass::Success => RetryPolicy::None,
            ExitClass::Rejected | ExitClass::Failed(_) => RetryPolicy::Never,
            ExitClass::Unavailable => RetryPolicy::Escalate,
            ExitClass::TimedOut => RetryPolicy::Once,
        }
    }
}
