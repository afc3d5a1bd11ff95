//! Screening orchestrator: keyed session store in front of the state machine.
//!
//! Sessions are created on first contact, expire after an idle timeout and
//! are swept by `evict_expired`. Turns on the same session are serialized by
//! a per-session async lock; different sessions proceed independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone};
use moodcheck_core::risk;
use uuid::Uuid;

use crate::classifier::ResponseClassifier;
use crate::error::ScreeningError;
use crate::llm::TextGenerator;
use crate::phrases::Confirmations;
use crate::questionnaire;
use crate::session::AssessmentSession;
use crate::types::{
    ReplySource, ScreeningConfig, ScreeningReply, SessionPhase, SessionProgress, SessionSummary,
    TurnResponse,
};

/// One stored session plus its bookkeeping.
struct SessionSlot {
    created_at: i64,
    last_active: AtomicI64,
    turn_count: AtomicU64,
    session: tokio::sync::Mutex<AssessmentSession>,
}

impl SessionSlot {
    fn new(session: AssessmentSession) -> Self {
        let now = Local::now().timestamp();
        Self {
            created_at: now,
            last_active: AtomicI64::new(now),
            turn_count: AtomicU64::new(0),
            session: tokio::sync::Mutex::new(session),
        }
    }

    fn mark_active(&self) {
        self.last_active
            .store(Local::now().timestamp(), Ordering::Relaxed);
    }

    fn touch(&self) {
        self.mark_active();
        self.turn_count.fetch_add(1, Ordering::Relaxed);
    }

    fn is_expired(&self, now: i64, timeout_minutes: u32) -> bool {
        let timeout_secs = i64::from(timeout_minutes) * 60;
        now - self.last_active.load(Ordering::Relaxed) > timeout_secs
    }
}

/// Routes utterances to per-session assessments.
pub struct ScreeningOrchestrator {
    classifier: Arc<ResponseClassifier>,
    confirmations: Arc<Confirmations>,
    sessions: Mutex<HashMap<Uuid, Arc<SessionSlot>>>,
    config: ScreeningConfig,
}

impl ScreeningOrchestrator {
    /// Orchestrator over `generator` with randomly chosen confirmations.
    pub fn new(generator: Arc<dyn TextGenerator>, config: ScreeningConfig) -> Self {
        Self::with_components(
            ResponseClassifier::new(generator),
            Confirmations::default(),
            config,
        )
    }

    pub fn with_components(
        classifier: ResponseClassifier,
        confirmations: Confirmations,
        config: ScreeningConfig,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            confirmations: Arc::new(confirmations),
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Handle one user utterance.
    ///
    /// An unknown or expired `session_id` starts a fresh session; the id in
    /// the reply is the one to use for the next turn.
    pub async fn handle_message(
        &self,
        message: &str,
        session_id: Option<Uuid>,
    ) -> Result<ScreeningReply, ScreeningError> {
        self.validate(message)?;

        let (sid, slot) = self.resolve_session(session_id)?;
        let mut session = slot.session.lock().await;

        let use_companion = self.config.companion_chat
            && session.phase() == SessionPhase::Idle
            && !questionnaire::is_start_phrase(message);

        let (turn, source) = if use_companion {
            let is_high_risk = risk::is_high_risk(message);
            if is_high_risk {
                tracing::warn!(session_id = %sid, "High-risk language detected in idle chat");
            }
            let text = self.classifier.converse(message).await?;
            (
                TurnResponse::message(text).with_risk(is_high_risk),
                ReplySource::Companion,
            )
        } else {
            let turn = session.process_response(message).await?;
            (turn, ReplySource::Assessment)
        };

        slot.touch();
        tracing::debug!(
            session_id = %sid,
            length = message.chars().count(),
            source = ?source,
            "Turn handled"
        );

        Ok(self.reply(sid, turn, source))
    }

    /// Start (or restart) the assessment and return the first question.
    pub async fn start(&self, session_id: Option<Uuid>) -> Result<ScreeningReply, ScreeningError> {
        let (sid, slot) = self.resolve_session(session_id)?;
        let turn = slot.session.lock().await.start();
        slot.touch();
        tracing::info!(session_id = %sid, "Assessment started");
        Ok(self.reply(sid, turn, ReplySource::Assessment))
    }

    /// Return an existing session to Idle.
    pub async fn reset(&self, session_id: Uuid) -> Result<(), ScreeningError> {
        let slot = self.lookup(session_id)?;
        slot.session.lock().await.reset();
        slot.touch();
        tracing::info!(session_id = %session_id, "Session reset");
        Ok(())
    }

    /// Current progress of one session.
    pub async fn progress(&self, session_id: Uuid) -> Result<SessionProgress, ScreeningError> {
        let slot = self.lookup(session_id)?;
        let session = slot.session.lock().await;
        let state = session.state();
        Ok(SessionProgress {
            id: session_id,
            phase: state.phase(),
            started: state.started,
            current_index: state.current_index,
            total_score: state.total_score,
            answered: state.answers.len(),
        })
    }

    /// List all stored sessions as summaries.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        let mut summaries: Vec<SessionSummary> = sessions
            .iter()
            .map(|(id, slot)| SessionSummary {
                id: *id,
                created_at: format_epoch(slot.created_at),
                last_active_at: format_epoch(slot.last_active.load(Ordering::Relaxed)),
                turn_count: slot.turn_count.load(Ordering::Relaxed),
            })
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        summaries
    }

    /// Delete a session by ID.
    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ScreeningError> {
        let mut sessions = self.lock_sessions()?;
        match sessions.remove(&session_id) {
            Some(slot)
                if !slot.is_expired(Local::now().timestamp(), self.config.idle_timeout_minutes) =>
            {
                tracing::info!(session_id = %session_id, "Session deleted");
                Ok(())
            }
            _ => Err(ScreeningError::SessionNotFound(session_id)),
        }
    }

    /// Drop sessions idle longer than the configured timeout.
    ///
    /// Sessions with a turn in flight are skipped. Returns the number removed.
    pub fn evict_expired(&self) -> usize {
        let mut sessions = match self.sessions.lock() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Session lock poisoned: {}", e);
                return 0;
            }
        };
        let now = Local::now().timestamp();
        let timeout = self.config.idle_timeout_minutes;
        let before = sessions.len();

        sessions.retain(|id, slot| {
            let expired = slot.is_expired(now, timeout) && slot.session.try_lock().is_ok();
            if expired {
                tracing::debug!(session_id = %id, "Evicting idle session");
            }
            !expired
        });

        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Evicted idle sessions");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    // -- Private helpers --

    fn validate(&self, message: &str) -> Result<(), ScreeningError> {
        if message.trim().is_empty() {
            return Err(ScreeningError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_length {
            return Err(ScreeningError::MessageTooLong(self.config.max_message_length));
        }
        Ok(())
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Arc<SessionSlot>>>, ScreeningError> {
        self.sessions
            .lock()
            .map_err(|e| ScreeningError::StorageError(format!("session lock poisoned: {}", e)))
    }

    /// Existing, unexpired session. An expired one is dropped on the spot.
    fn lookup(&self, session_id: Uuid) -> Result<Arc<SessionSlot>, ScreeningError> {
        let mut sessions = self.lock_sessions()?;
        let slot = sessions
            .get(&session_id)
            .cloned()
            .ok_or(ScreeningError::SessionNotFound(session_id))?;

        if slot.is_expired(Local::now().timestamp(), self.config.idle_timeout_minutes) {
            tracing::debug!(session_id = %session_id, "Dropping expired session on lookup");
            sessions.remove(&session_id);
            return Err(ScreeningError::SessionNotFound(session_id));
        }
        Ok(slot)
    }

    /// Resolve or create a session.
    fn resolve_session(
        &self,
        requested: Option<Uuid>,
    ) -> Result<(Uuid, Arc<SessionSlot>), ScreeningError> {
        let mut sessions = self.lock_sessions()?;

        if let Some(sid) = requested {
            if let Some(slot) = sessions.get(&sid) {
                let now = Local::now().timestamp();
                if !slot.is_expired(now, self.config.idle_timeout_minutes) {
                    // Refreshed under the map lock so a concurrent sweep
                    // cannot evict the slot before the turn starts.
                    slot.mark_active();
                    return Ok((sid, Arc::clone(slot)));
                }
                tracing::warn!(session_id = %sid, "Session expired, starting a new one");
                sessions.remove(&sid);
            }
        }

        let sid = Uuid::new_v4();
        let slot = Arc::new(SessionSlot::new(AssessmentSession::new(
            Arc::clone(&self.classifier),
            Arc::clone(&self.confirmations),
        )));
        sessions.insert(sid, Arc::clone(&slot));
        tracing::debug!(session_id = %sid, "Session created");
        Ok((sid, slot))
    }

    fn reply(&self, session_id: Uuid, turn: TurnResponse, source: ReplySource) -> ScreeningReply {
        let message = match (&self.config.crisis_note, turn.is_high_risk) {
            (Some(note), true) => format!("{}\n\n{}", turn.message, note),
            _ => turn.message,
        };
        let use_browser_tts = !contains_bengali_script(&message);

        ScreeningReply {
            session_id,
            message,
            is_final: turn.is_final,
            final_message: turn.final_message,
            total_score: turn.total_score,
            is_high_risk: turn.is_high_risk,
            use_browser_tts,
            source,
        }
    }
}

/// Whether `text` contains any character from the Bengali block.
pub fn contains_bengali_script(text: &str) -> bool {
    text.chars().any(|c| ('\u{0980}'..='\u{09FF}').contains(&c))
}

/// Format epoch seconds as ISO 8601 string.
fn format_epoch(epoch: i64) -> String {
    chrono::Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}

// =============================================================================
// Tests
// =============================================================================
