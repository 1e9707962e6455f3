// Session configuration

use std::path::PathBuf;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session file location
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: dirs::home_dir()
                .map(|p| p.join(".hfagent").join("session.json"))
                .unwrap_or_else(|| PathBuf::from(".hfagent/session.json")),
        }
    }
}

impl SessionConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        match std::env::var_os("HF_SESSION_FILE") {
            Some(path) => Self {
                path: PathBuf::from(path),
            },
            None => Self::default(),
        }
    }
}
