//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use moodcheck_core::MoodcheckConfig;
use moodcheck_screening::ScreeningOrchestrator;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MoodcheckConfig>,
    /// Keyed assessment sessions.
    pub orchestrator: Arc<ScreeningOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: MoodcheckConfig, orchestrator: Arc<ScreeningOrchestrator>) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
            start_time: Instant::now(),
        }
    }
}
