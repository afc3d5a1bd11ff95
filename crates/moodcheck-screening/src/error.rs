//! Error types for the screening engine.

/// Errors from the screening engine.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("text generation failed: {0}")]
    Backend(String),
    #[error("text generation timed out after {0} ms")]
    Timeout(u64),
    #[error("storage error: {0}")]
    StorageError(String),
}

impl ScreeningError {
    /// Whether the error came from the text-generation backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, ScreeningError::Backend(_) | ScreeningError::Timeout(_))
    }
}

impl From<reqwest::Error> for ScreeningError {
    fn from(err: reqwest::Error) -> Self {
        ScreeningError::Backend(err.to_string())
    }
}
