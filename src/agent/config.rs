// Agent configuration

use super::AgentConfig;
use std::path::PathBuf;

impl AgentConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = AgentConfig::default();

        if let Ok(program) = std::env::var("HF_CLI_BIN") {
            config.program = program;
        }
        if let Some(path) = std::env::var_os("HF_TOOLS_TOML") {
            config.tools_toml_path = PathBuf::from(path);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_overrides() {
        // SAFETY: these variables are only read by this test
        unsafe {
            std::env::set_var("HF_CLI_BIN", "/opt/hf/bin/huggingface-cli");
            std::env::set_var("HF_TOOLS_TOML", "/etc/hfagent/tools.toml");
        }

        let config = AgentConfig::from_env();
        assert_eq!(config.program, "/opt/hf/bin/huggingface-cli");
        assert_eq!(config.tools_toml_path, PathBuf::from("/etc/hfagent/tools.toml"));
        assert_eq!(config.name, "HF-CLI-EXECUTOR");

        unsafe {
            std::env::remove_var("HF_CLI_BIN");
            std::env::remove_var("HF_TOOLS_TOML");
        }
    }
}
