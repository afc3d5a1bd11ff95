//! PHQ-9 assessment state machine.
//!
//! Transitions:
//! - Idle -> InProgress(0) on `start()` or a start phrase
//! - Idle -> Idle on any other input (onboarding prompt)
//! - InProgress(i) -> InProgress(i + 1) for i < 8
//! - InProgress(8) -> Completing -> Completed (final summary)
//! - Completed -> InProgress(0) on a start phrase, Idle on `reset()`
//!
//! A turn only mutates state after every backend call it needs has
//! succeeded, so a failed turn can simply be retried.

use std::sync::Arc;

use moodcheck_core::risk;

use crate::classifier::ResponseClassifier;
use crate::error::ScreeningError;
use crate::phrases::Confirmations;
use crate::questionnaire::{
    self, COMPLETED_MESSAGE, FINAL_MESSAGE_LABEL, ONBOARDING_PROMPT, QUESTIONS, QUESTION_COUNT,
};
use crate::types::{AnsweredQuestion, SessionPhase, SessionState, TurnResponse};

/// One assessment conversation.
pub struct AssessmentSession {
    state: SessionState,
    classifier: Arc<ResponseClassifier>,
    confirmations: Arc<Confirmations>,
}

impl AssessmentSession {
    pub fn new(classifier: Arc<ResponseClassifier>, confirmations: Arc<Confirmations>) -> Self {
        Self {
            state: SessionState::default(),
            classifier,
            confirmations,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Begin (or restart) the assessment and return the first question.
    pub fn start(&mut self) -> TurnResponse {
        self.state = SessionState {
            started: true,
            ..SessionState::default()
        };
        tracing::debug!("Assessment started");
        TurnResponse::message(QUESTIONS[0])
    }

    /// Clear all progress and return to Idle.
    pub fn reset(&mut self) {
        if self.state.started {
            tracing::info!(
                index = self.state.current_index,
                "Assessment reset mid-way"
            );
        }
        self.state = SessionState::default();
    }

    /// Advance the state machine with one user utterance.
    pub async fn process_response(&mut self, input: &str) -> Result<TurnResponse, ScreeningError> {
        let is_high_risk = risk::is_high_risk(input);
        if is_high_risk {
            tracing::warn!(
                index = self.state.current_index,
                "High-risk language detected in user input"
            );
        }

        if !self.state.started {
            if questionnaire::is_start_phrase(input) {
                return Ok(self.start().with_risk(is_high_risk));
            }
            let message = if self.state.is_complete() {
                COMPLETED_MESSAGE
            } else {
                ONBOARDING_PROMPT
            };
            return Ok(TurnResponse::message(message).with_risk(is_high_risk));
        }

        if self.state.is_complete() {
            return Ok(TurnResponse::message(COMPLETED_MESSAGE).with_risk(is_high_risk));
        }

        let index = self.state.current_index;
        let question = QUESTIONS[index];

        let classification = self.classifier.classify(question, input).await?;
        let empathetic = self.classifier.empathize(question, input).await?;
        let confirmation = self.confirmations.confirm(classification);

        let answer = AnsweredQuestion {
            question: question.to_string(),
            response: input.to_string(),
            classification,
        };
        let total_score = self.state.total_score + classification.score();
        let next_index = index + 1;

        tracing::debug!(
            index,
            score = classification.score(),
            total_score,
            "Answer classified"
        );

        if next_index >= QUESTION_COUNT {
            let mut answers = self.state.answers.clone();
            answers.push(answer);
            let summary = self.classifier.summarize(&answers, total_score).await?;

            self.state = SessionState {
                started: false,
                current_index: next_index,
                total_score,
                answers,
            };
            tracing::info!(total_score, "Assessment completed");

            return Ok(TurnResponse {
                message: format!(
                    "{}\n{}\n{}\n{}",
                    confirmation, empathetic, FINAL_MESSAGE_LABEL, summary
                ),
                is_final: true,
                final_message: Some(summary),
                total_score: Some(total_score),
                is_high_risk,
            });
        }

        self.state.answers.push(answer);
        self.state.total_score = total_score;
        self.state.current_index = next_index;

        Ok(TurnResponse::message(format!(
            "{}\n{}\n\n{}",
            confirmation, empathetic, QUESTIONS[next_index]
        ))
        .with_risk(is_high_risk))
    }
}

// =============================================================================
// Tests
// =============================================================================
