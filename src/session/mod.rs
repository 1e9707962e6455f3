// Session module - small key-value state persisted across runs

pub mod config;
pub mod error;
pub mod store;

pub use config::SessionConfig;
pub use error::SessionError;
pub use store::{JsonFileStore, MemoryStore, SessionStore};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the cached CLI token
pub const HF_TOKEN_KEY: &str = "hf_token";

/// Key holding the time of the last successful login
pub const LOGGED_IN_AT_KEY: &str = "logged_in_at";

/// Session state - a flat JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    values: Map<String, Value>,
}

impl Default for Session {
    fn default() -> Self {
        let mut values = Map::new();
        values.insert(HF_TOKEN_KEY.to_string(), Value::Null);
        Self { values }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay every key of `other` onto this session
    pub fn merge(&mut self, other: Session) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn hf_token(&self) -> Option<&str> {
        self.get(HF_TOKEN_KEY).and_then(Value::as_str)
    }

    pub fn set_hf_token(&mut self, token: impl Into<String>) {
        self.set(HF_TOKEN_KEY, token.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
