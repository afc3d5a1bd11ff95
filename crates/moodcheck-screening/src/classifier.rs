//! Classification and reply generation on top of a `TextGenerator`.

use std::sync::Arc;

use crate::error::ScreeningError;
use crate::llm::TextGenerator;
use crate::prompts;
use crate::severity::SeverityLevel;
use crate::types::AnsweredQuestion;

/// Turns free-text answers into severity levels and produces the
/// conversational text around them. Each call is one backend request.
#[derive(Clone)]
pub struct ResponseClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl ResponseClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Classify `response` to `question`.
    ///
    /// Anything other than an exact canonical label (after trimming) resolves
    /// to `NotAtAll`. That fallback is logged, not returned as an error.
    pub async fn classify(
        &self,
        question: &str,
        response: &str,
    ) -> Result<SeverityLevel, ScreeningError> {
        let raw = self
            .generator
            .generate(&prompts::classification(question, response))
            .await?;
        let label = raw.trim();

        match SeverityLevel::from_label(label) {
            Some(level) => Ok(level),
            None => {
                tracing::warn!(
                    label = %label,
                    "Unrecognized severity label, scoring as Not at all"
                );
                Ok(SeverityLevel::NotAtAll)
            }
        }
    }

    /// One short validating sentence about the answer.
    pub async fn empathize(&self, question: &str, response: &str) -> Result<String, ScreeningError> {
        let text = self
            .generator
            .generate(&prompts::empathy(question, response))
            .await?;
        Ok(text.trim().to_string())
    }

    /// Severity-labelled supportive paragraph for the whole assessment.
    pub async fn summarize(
        &self,
        answers: &[AnsweredQuestion],
        total_score: u32,
    ) -> Result<String, ScreeningError> {
        let text = self
            .generator
            .generate(&prompts::summary(answers, total_score))
            .await?;
        Ok(text.trim().to_string())
    }

    /// Free-form supportive reply outside the assessment.
    pub async fn converse(&self, message: &str) -> Result<String, ScreeningError> {
        let text = self
            .generator
            .generate_with_system(prompts::COMPANION_SYSTEM, message)
            .await?;
        Ok(text.trim().to_string())
    }
}
