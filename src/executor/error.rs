// Error types for Executor module

use thiserror::Error;

/// Environment-level executor failures.
///
/// A non-zero exit code is never an error here; it comes back as a
/// normal `CommandResult`.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command not executable: {0}")]
    NotExecutable(String),

    #[error("Failed to spawn process for command '{0}': {1}")]
    SpawnFailed(String, String),

    #[error("Failed to wait for command '{0}': {1}")]
    WaitFailed(String, String),
}

impl ExecutorError {
    /// Classify a spawn failure for `command`
    pub fn from_spawn(command: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::CommandNotFound(command.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::NotExecutable(command.to_string()),
            _ => Self::SpawnFailed(command.to_string(), err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
