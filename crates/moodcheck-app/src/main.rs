//! Moodcheck application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the Ollama-backed text generator and the screening orchestrator
//! 3. Start the idle-session eviction loop
//! 4. Start the axum REST API server

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use moodcheck_api::routes;
use moodcheck_api::state::AppState;
use moodcheck_core::MoodcheckConfig;
use moodcheck_screening::{OllamaGenerator, RetryingGenerator, ScreeningConfig, ScreeningOrchestrator};

use crate::cli::CliArgs;

/// Periodically drop sessions that have been idle past the timeout.
async fn eviction_loop(orchestrator: Arc<ScreeningOrchestrator>, interval_secs: u64) {
    tracing::info!(interval_secs, "Session eviction loop started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        let removed = orchestrator.evict_expired();
        if removed > 0 {
            tracing::debug!(removed, "Eviction sweep finished");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = MoodcheckConfig::load_or_default(&config_file);
    args.apply(&mut config);

    // Tracing. RUST_LOG wins over the resolved log level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Moodcheck v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Text generation.
    let ollama = OllamaGenerator::from_config(&config.llm);
    tracing::info!(
        base_url = %config.llm.base_url,
        model = %ollama.model(),
        timeout_secs = config.llm.request_timeout_secs,
        max_retries = config.llm.max_retries,
        "Ollama backend configured"
    );
    let generator = Arc::new(RetryingGenerator::from_config(ollama, &config.llm));

    // Screening sessions.
    let orchestrator = Arc::new(ScreeningOrchestrator::new(
        generator,
        ScreeningConfig::from(&config),
    ));
    if config.session.companion_chat {
        tracing::info!("Companion chat enabled for idle sessions");
    }
    if config.risk.crisis_note.is_some() {
        tracing::info!("Crisis note will be appended to high-risk replies");
    }

    // === Background tasks ===

    let sweep_orchestrator = Arc::clone(&orchestrator);
    let sweep_interval = config.session.sweep_interval_secs;
    tokio::spawn(async move {
        eviction_loop(sweep_orchestrator, sweep_interval).await;
    });

    // === API server ===

    let addr = format!("{}:{}", config.general.host, config.general.port);
    let port = config.general.port;
    let state = AppState::new(config, orchestrator);
    let router = routes::create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind, is another instance running?");
            tracing::error!("Try: MOODCHECK_PORT={} moodcheck", port.saturating_add(1));
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router).await?;

    Ok(())
}
