// Executor configuration

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Executor configuration
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum execution time in seconds
    pub timeout_secs: u64,
    /// Bytes kept per stream; anything past this is read and discarded
    pub max_output_bytes: usize,
    /// Working directory for spawned commands
    pub working_dir: Option<PathBuf>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_output_bytes: 1048576, // 1MB
            working_dir: None,
        }
    }
}

impl ExecutorConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(v) = std::env::var("HF_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(_) => warn!(var = "HF_TIMEOUT_SECS", value = %v, "Invalid env var value, using default"),
            }
        }

        if let Ok(v) = std::env::var("HF_MAX_OUTPUT_BYTES") {
            match v.parse() {
                Ok(bytes) => config.max_output_bytes = bytes,
                Err(_) => warn!(var = "HF_MAX_OUTPUT_BYTES", value = %v, "Invalid env var value, using default"),
            }
        }

        config.working_dir = std::env::var_os("HF_WORKING_DIR").map(PathBuf::from);

        config
    }

    /// Default timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
