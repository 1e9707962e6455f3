// Agent errors

use crate::executor::ExecutorError;
use crate::session::SessionError;
use thiserror::Error;

/// Agent errors
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for tool '{0}': {1}")]
    InvalidInput(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
