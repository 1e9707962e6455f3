// Agent module - wraps the CLI as a callable tool with session state
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod hf_agent;
pub mod runner;
pub mod tool;
pub mod types;

pub use error::AgentError;
pub use hf_agent::HfCliAgent;
pub use runner::CliRunner;
pub use tool::{RunCliTool, ToolDefinition, ToolImpl, ToolRegistry};
pub use types::{AgentConfig, CliRun, LoginStatus, NO_ARGS};
