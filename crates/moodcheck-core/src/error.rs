use thiserror::Error;

/// Error type for configuration loading and saving.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MoodcheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MoodcheckError {
    fn from(err: toml::de::Error) -> Self {
        MoodcheckError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MoodcheckError {
    fn from(err: toml::ser::Error) -> Self {
        MoodcheckError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MoodcheckError {
    fn from(err: serde_json::Error) -> Self {
        MoodcheckError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Moodcheck operations.
pub type Result<T> = std::result::Result<T, MoodcheckError>;
