//! Shared data types for the screening engine.

use moodcheck_core::MoodcheckConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::questionnaire::QUESTION_COUNT;
use crate::severity::SeverityLevel;

// =============================================================================
// Session data
// =============================================================================

/// One answered question. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub response: String,
    pub classification: SeverityLevel,
}

/// Mutable progress of one assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub started: bool,
    /// Next question to ask; `QUESTION_COUNT` once every question is answered.
    pub current_index: usize,
    pub total_score: u32,
    pub answers: Vec<AnsweredQuestion>,
}

impl SessionState {
    /// Whether every question has been answered.
    pub fn is_complete(&self) -> bool {
        self.current_index >= QUESTION_COUNT
    }

    /// Derive the observable phase from the raw fields.
    pub fn phase(&self) -> SessionPhase {
        match (self.started, self.is_complete()) {
            (false, false) => SessionPhase::Idle,
            (false, true) => SessionPhase::Completed,
            (true, false) => SessionPhase::InProgress {
                index: self.current_index,
            },
            (true, true) => SessionPhase::Completing,
        }
    }
}

/// Phase of the assessment state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Not started, or reset.
    Idle,
    /// Waiting for the answer to question `index`.
    InProgress { index: usize },
    /// All answers recorded but the session is still flagged as started.
    /// Only reachable transiently inside the final turn.
    Completing,
    /// Finished; inert until restarted or reset.
    Completed,
}

// =============================================================================
// Turn results
// =============================================================================

/// Result of one call into the assessment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnResponse {
    pub message: String,
    pub is_final: bool,
    /// Summary text, only on the final turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,
    /// Total score, only on the final turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    /// Self-harm language detected in the input.
    pub is_high_risk: bool,
}

impl TurnResponse {
    /// A non-final reply carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_final: false,
            final_message: None,
            total_score: None,
            is_high_risk: false,
        }
    }

    pub fn with_risk(mut self, is_high_risk: bool) -> Self {
        self.is_high_risk = is_high_risk;
        self
    }
}

/// Which path produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Assessment,
    Companion,
}

/// Reply returned by the orchestrator to the web layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReply {
    pub session_id: Uuid,
    pub message: String,
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
    pub is_high_risk: bool,
    /// False when the message contains Bengali script and the host should
    /// synthesize speech itself.
    pub use_browser_tts: bool,
    pub source: ReplySource,
}

// =============================================================================
// Session listing
// =============================================================================

/// Snapshot of one session's progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionProgress {
    pub id: Uuid,
    #[serde(flatten)]
    pub phase: SessionPhase,
    pub started: bool,
    pub current_index: usize,
    pub total_score: u32,
    pub answered: usize,
}

/// Summary of one stored session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: String,
    pub last_active_at: String,
    pub turn_count: u64,
}

// =============================================================================
// Configuration
// =============================================================================

/// Orchestrator settings, derived from the service configuration.
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    pub max_message_length: usize,
    pub idle_timeout_minutes: u32,
    pub companion_chat: bool,
    pub crisis_note: Option<String>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self::from(&MoodcheckConfig::default())
    }
}

impl From<&MoodcheckConfig> for ScreeningConfig {
    fn from(config: &MoodcheckConfig) -> Self {
        Self {
            max_message_length: config.session.max_message_length,
            idle_timeout_minutes: config.session.idle_timeout_minutes,
            companion_chat: config.session.companion_chat,
            crisis_note: config.risk.crisis_note.clone(),
        }
    }
}
