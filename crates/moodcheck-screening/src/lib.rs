//! PHQ-9 screening dialogue for Moodcheck.
//!
//! Walks a user through the nine PHQ-9 items one utterance at a time,
//! classifies each free-text answer into a severity bucket through a
//! text-generation backend, keeps a running score and produces a final
//! summary. Sessions are keyed by id and held in memory.

pub mod classifier;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod phrases;
pub mod prompts;
pub mod questionnaire;
pub mod session;
pub mod severity;
pub mod types;

pub use classifier::ResponseClassifier;
pub use error::ScreeningError;
pub use llm::{MockGenerator, OllamaGenerator, RetryingGenerator, TextGenerator};
pub use orchestrator::{contains_bengali_script, ScreeningOrchestrator};
pub use phrases::{Confirmations, FirstPicker, PhrasePicker, RandomPicker, RoundRobinPicker};
pub use prompts::PromptKind;
pub use session::AssessmentSession;
pub use severity::SeverityLevel;
pub use types::{
    AnsweredQuestion, ReplySource, ScreeningConfig, ScreeningReply, SessionPhase,
    SessionProgress, SessionState, SessionSummary, TurnResponse,
};
