//! Shared failure surface of remote collaborators.

use thiserror::Error;

/// Every remote collaborator (chain client, oracle, remote builder) fails
/// through this taxonomy so the orchestrator can map failures to typed
/// rejections without inspecting backend-specific errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote call timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service error: {0}")]
    Service(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Timeout)
    }
}
