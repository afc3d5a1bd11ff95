//! Prompt templates sent to the text-generation backend.

use crate::severity::SeverityLevel;
use crate::types::AnsweredQuestion;

/// The four ways the backend is asked for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Classification,
    Empathy,
    Summary,
    Companion,
}

impl PromptKind {
    /// Identify which template produced `prompt`.
    pub fn detect(prompt: &str) -> Self {
        if prompt.contains(CLASSIFICATION_MARKER) {
            PromptKind::Classification
        } else if prompt.contains(EMPATHY_MARKER) {
            PromptKind::Empathy
        } else if prompt.contains(SUMMARY_MARKER) {
            PromptKind::Summary
        } else {
            PromptKind::Companion
        }
    }
}

const CLASSIFICATION_MARKER: &str = "evaluating a user's response to a PHQ-9 depression question";
const EMPATHY_MARKER: &str = "Write one brief, warm sentence validating what they shared.";
const SUMMARY_MARKER: &str = "Their total PHQ-9 score is";

/// System instruction for free-form replies to users who have not started
/// the assessment.
pub const COMPANION_SYSTEM: &str = "You are a friendly mental health assistant. \
If the user seems sad, anxious, or overwhelmed, gently guide them through a PHQ-9 assessment. \
Otherwise, chat naturally like a supportive friend.";

/// Ask for exactly one canonical severity label.
pub fn classification(question: &str, response: &str) -> String {
    let options = SeverityLevel::ALL
        .iter()
        .map(|level| format!("- {}", level.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a mental health assistant {CLASSIFICATION_MARKER}.\n\n\
         Question:\n{question}\n\n\
         Response:\n{response}\n\n\
         Choose one of:\n{options}\n\n\
         If the response is clearly positive or denies the symptom, classify as \"{not_at_all}\".\n\
         Only reply with one of the options above.\n",
        not_at_all = SeverityLevel::NotAtAll.label(),
    )
}

/// Ask for one short validating sentence.
pub fn empathy(question: &str, response: &str) -> String {
    format!("After reading this:\nQ: {question}\nA: {response}\n\n{EMPATHY_MARKER}\n")
}

/// Ask for a severity-labelled supportive paragraph.
pub fn summary(answers: &[AnsweredQuestion], total_score: u32) -> String {
    let transcript = answers
        .iter()
        .map(|a| format!("Q: {}\nA: {}", a.question, a.response))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "The user shared:\n{transcript}\n\n\
         {SUMMARY_MARKER} {total_score}.\n\
         Write a short, supportive message starting with:\n\
         \"Depression severity: ...\"\n\
         Then a warm paragraph (under 100 words) offering empathy and encouragement.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(q: &str, a: &str) -> AnsweredQuestion {
        AnsweredQuestion {
            question: q.to_string(),
            response: a.to_string(),
            classification: SeverityLevel::SeveralDays,
        }
    }

    #[test]
    fn test_classification_prompt_embeds_inputs_and_labels() {
        let prompt = classification("How is your sleep?", "pretty bad lately");
        assert!(prompt.contains("How is your sleep?"));
        assert!(prompt.contains("pretty bad lately"));
        for level in SeverityLevel::ALL {
            assert!(prompt.contains(&format!("- {}", level.label())));
        }
        assert!(prompt.contains("classify as \"Not at all\""));
    }

    #[test]
    fn test_summary_prompt_lists_answers_and_score() {
        let answers = vec![answer("Q one", "A one"), answer("Q two", "A two")];
        let prompt = summary(&answers, 7);
        assert!(prompt.contains("Q: Q one\nA: A one\nQ: Q two\nA: A two"));
        assert!(prompt.contains("Their total PHQ-9 score is 7."));
        assert!(prompt.contains("Depression severity: ..."));
    }

    #[test]
    fn test_detect_each_template() {
        assert_eq!(
            PromptKind::detect(&classification("q", "a")),
            PromptKind::Classification
        );
        assert_eq!(PromptKind::detect(&empathy("q", "a")), PromptKind::Empathy);
        assert_eq!(
            PromptKind::detect(&summary(&[answer("q", "a")], 1)),
            PromptKind::Summary
        );
        assert_eq!(
            PromptKind::detect(&format!("{COMPANION_SYSTEM}\n\nhi")),
            PromptKind::Companion
        );
    }

    #[test]
    fn test_detect_prefers_template_over_user_text() {
        let prompt = classification(
            "q",
            "Write one brief, warm sentence validating what they shared.",
        );
        assert_eq!(PromptKind::detect(&prompt), PromptKind::Classification);
    }
}
