use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MoodcheckError, Result};

/// Top-level configuration for the Moodcheck service.
///
/// Loaded from `~/.moodcheck/config.toml` by default. Every section falls
/// back to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodcheckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl MoodcheckConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MoodcheckConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MoodcheckError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Address the HTTP server binds to.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Text-generation backend (Ollama) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name passed to every chat request.
    pub model: String,
    /// Per-attempt timeout in seconds.
    pub request_timeout_secs: u64,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    /// Backoff between attempts, multiplied by the attempt number.
    pub retry_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gemma3n:e2b".to_string(),
            request_timeout_secs: 60,
            max_retries: 1,
            retry_backoff_ms: 500,
        }
    }
}

/// Screening session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions idle longer than this are evicted.
    pub idle_timeout_minutes: u32,
    /// Seconds between eviction sweeps.
    pub sweep_interval_secs: u64,
    /// Maximum accepted utterance length in characters.
    pub max_message_length: usize,
    /// Answer idle, non-start messages with a free-form supportive reply
    /// instead of the static onboarding prompt.
    pub companion_chat: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 30,
            sweep_interval_secs: 60,
            max_message_length: 2000,
            companion_chat: true,
        }
    }
}

/// High-risk language handling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Appended to the reply when a turn is flagged high-risk.
    pub crisis_note: Option<String>,
}

/// HTTP layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![
                "http://127.0.0.1:8000".to_string(),
                "http://localhost:8000".to_string(),
            ],
        }
    }
}
