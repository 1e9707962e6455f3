// Tool trait, the CLI tool and the registry exposed to orchestrators

use super::error::{AgentError, Result};
use super::runner::CliRunner;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name under which the CLI tool is registered
pub const RUN_CLI_TOOL: &str = "run_hf_cli";

/// Tool definition handed to an orchestration layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Internal trait for tool implementations
#[async_trait]
pub trait ToolImpl: Send + Sync {
    /// Get the tool definition (name, description, input_schema)
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with JSON input
    async fn run(&self, input: serde_json::Value) -> Result<serde_json::Value>;

    /// Get tool name
    fn name(&self) -> String {
        self.definition().name
    }
}

/// run_hf_cli input parameters
#[derive(Debug, Deserialize)]
struct RunCliInput {
    cmd: String,
    #[serde(default)]
    args: Option<Vec<String>>,
}

/// Tool running one CLI subcommand
pub struct RunCliTool {
    runner: Arc<CliRunner>,
    description: String,
}

impl RunCliTool {
    pub fn new(runner: Arc<CliRunner>, description: impl Into<String>) -> Self {
        Self {
            runner,
            description: description.into(),
        }
    }
}

#[async_trait]
impl ToolImpl for RunCliTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: RUN_CLI_TOOL.to_string(),
            description: self.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "cmd": {
                        "type": "string",
                        "description": "CLI subcommand, e.g. whoami or models"
                    },
                    "args": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Arguments passed verbatim after the subcommand"
                    }
                },
                "required": ["cmd"]
            }),
        }
    }

    async fn run(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        let RunCliInput { cmd, args } = serde_json::from_value(input)
            .map_err(|e| AgentError::InvalidInput(RUN_CLI_TOOL.to_string(), e.to_string()))?;
        let args = args.unwrap_or_default();

        let run = self.runner.run(&cmd, &args).await?;
        Ok(run.result.to_json())
    }
}

/// Default run_hf_cli description
pub fn default_run_cli_description() -> String {
    "Run huggingface-cli commands".to_string()
}

/// Load tool descriptions from TOML config file
pub fn load_tool_descriptions(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        debug!(path = %path.display(), "tools.toml not found, using default descriptions");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    let config: toml::Table = toml::from_str(&content)?;

    let descriptions: HashMap<String, String> = config
        .iter()
        .filter_map(|(key, value)| {
            value
                .get("description")
                .and_then(|d| d.as_str())
                .map(|s| (key.clone(), s.to_string()))
        })
        .collect();

    debug!(path = %path.display(), tool_count = descriptions.len(), "loaded tool descriptions from config");
    Ok(descriptions)
}

/// Registered tools, looked up by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolImpl>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn ToolImpl>) {
        let name = tool.name();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool_name = %name, "replaced previously registered tool");
        }
    }

    /// All tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Call a tool by name with JSON input
    #[allow(dead_code)]
    pub async fn call(&self, tool_name: &str, input: serde_json::Value) -> Result<serde_json::Value> {
        debug!(tool_name = %tool_name, "looking up tool");

        let tool = self
            .tools
            .get(tool_name)
            .cloned()
            .ok_or_else(|| AgentError::UnknownTool(tool_name.to_string()))?;

        info!(tool_name = %tool_name, "executing tool");
        tool.run(input).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
