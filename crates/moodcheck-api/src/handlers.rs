//! Route handler functions for the screening API.

use axum::extract::{Path, State};
use axum::Json;
use moodcheck_screening::{ReplySource, ScreeningReply, SessionProgress, SessionSummary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// Body for POST /phq.
#[derive(Debug, Deserialize)]
pub struct PhqRequest {
    pub user_response: String,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Body for POST /phq/start.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Body for POST /phq/reset.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub session_id: Uuid,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PhqResponse {
    pub response: String,
    pub session_id: Uuid,
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    pub is_high_risk: bool,
    pub use_browser_tts: bool,
    pub source: ReplySource,
}

impl From<ScreeningReply> for PhqResponse {
    fn from(reply: ScreeningReply) -> Self {
        Self {
            response: reply.message,
            session_id: reply.session_id,
            is_final: reply.is_final,
            final_message: reply.final_message,
            total_score: reply.total_score,
            is_high_risk: reply.is_high_risk,
            use_browser_tts: reply.use_browser_tts,
            source: reply.source,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub active_sessions: usize,
}

// =============================================================================
// Assessment endpoints
// =============================================================================

/// POST /phq - route one utterance through the caller's session.
pub async fn phq(
    State(state): State<AppState>,
    Json(body): Json<PhqRequest>,
) -> Result<Json<PhqResponse>, ApiError> {
    let utterance = body.user_response.trim();
    let reply = state
        .orchestrator
        .handle_message(utterance, body.session_id)
        .await?;
    Ok(Json(reply.into()))
}

/// POST /phq/start - begin or restart the assessment.
pub async fn phq_start(
    State(state): State<AppState>,
    Json(body): Json<StartRequest>,
) -> Result<Json<PhqResponse>, ApiError> {
    let reply = state.orchestrator.start(body.session_id).await?;
    Ok(Json(reply.into()))
}

/// POST /phq/reset
pub async fn phq_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.orchestrator.reset(body.session_id).await?;
    Ok(Json(StatusResponse {
        status: "reset".to_string(),
        session_id: body.session_id,
    }))
}

// =============================================================================
// Session management
// =============================================================================

/// GET /phq/sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    let sessions = state.orchestrator.list_sessions();
    let total = sessions.len();
    Json(SessionsResponse { sessions, total })
}

/// GET /phq/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionProgress>, ApiError> {
    let progress = state.orchestrator.progress(id).await?;
    Ok(Json(progress))
}

/// DELETE /phq/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.orchestrator.delete_session(id)?;
    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
        session_id: id,
    }))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.orchestrator.session_count(),
    })
}
