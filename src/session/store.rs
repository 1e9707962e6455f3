// Session persistence

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Session;
use super::error::SessionError;
use tracing::{debug, info};

/// Loads and saves session state
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Session, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;
}

/// Session stored as a JSON object in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<Session, SessionError> {
        let mut session = Session::default();

        if !self.path.exists() {
            info!(path = %self.path.display(), "Session file not found, starting with empty session");
            return Ok(session);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SessionError::LoadFailed(e.to_string()))?;

        let loaded: Session =
            serde_json::from_str(&content).map_err(|e| SessionError::LoadFailed(e.to_string()))?;

        debug!(path = %self.path.display(), keys = loaded.len(), "Loaded session");
        session.merge(loaded);

        Ok(session)
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SessionError::StoreFailed(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::StoreFailed(e.to_string()))?;

        // Write to a sibling temp file, then rename over the target
        let temp_path = self.path.with_extension("json.tmp");
        let mut file =
            fs::File::create(&temp_path).map_err(|e| SessionError::StoreFailed(e.to_string()))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.sync_all())
            .map_err(|e| SessionError::StoreFailed(e.to_string()))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| SessionError::StoreFailed(e.to_string()))?;

        debug!(path = %self.path.display(), keys = session.len(), "Persisted session");

        Ok(())
    }
}

/// Session kept in process memory only
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct MemoryStore {
    session: Mutex<Option<Session>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out holding `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Session, SessionError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| SessionError::LoadFailed(e.to_string()))?;
        let mut session = Session::default();
        if let Some(saved) = guard.as_ref() {
            session.merge(saved.clone());
        }
        Ok(session)
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| SessionError::StoreFailed(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }
}
