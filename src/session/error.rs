// Session errors

use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
#[allow(clippy::enum_variant_names)]
pub enum SessionError {
    #[error("Failed to load session: {0}")]
    LoadFailed(String),

    #[error("Failed to store session: {0}")]
    StoreFailed(String),
}
