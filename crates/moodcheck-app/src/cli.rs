//! CLI argument definitions for the Moodcheck server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use moodcheck_core::MoodcheckConfig;
use std::path::PathBuf;

/// Moodcheck: a conversational PHQ-9 depression screening service.
#[derive(Parser, Debug)]
#[command(name = "moodcheck", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Address to bind the API server to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Model name served by the Ollama backend.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Base URL of the Ollama server.
    #[arg(long = "llm-url")]
    pub llm_url: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MOODCHECK_CONFIG env var > ~/.moodcheck/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("MOODCHECK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > MOODCHECK_PORT env var > config file value > 8000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("MOODCHECK_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        8000
    }

    /// Log filter directive: --log-level flag, else the config value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Fold every CLI override into `config`.
    pub fn apply(&self, config: &mut MoodcheckConfig) {
        config.general.port = self.resolve_port(config.general.port);
        config.general.log_level = self.resolve_log_level(&config.general.log_level);
        if let Some(ref host) = self.host {
            config.general.host = host.clone();
        }
        if let Some(ref model) = self.model {
            config.llm.model = model.clone();
        }
        if let Some(ref url) = self.llm_url {
            config.llm.base_url = url.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".moodcheck").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".moodcheck").join("config.toml");
    }
    PathBuf::from("config.toml")
}
