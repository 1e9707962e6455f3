// Executor module - runs external commands and shapes their output

pub mod config;
pub mod error;
pub mod parse;
pub mod runner;
pub mod types;

pub use config::ExecutorConfig;
pub use error::{ExecutorError, Result};
pub use runner::CommandExecutor;
pub use types::{CommandResult, ExitClass, RetryPolicy, Stdout};
