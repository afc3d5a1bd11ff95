//! The fixed PHQ-9 question sequence and the static prompts around it.

/// Number of questions in the assessment.
pub const QUESTION_COUNT: usize = 9;

/// PHQ-9 items in the order they are asked.
pub const QUESTIONS: [&str; QUESTION_COUNT] = [
    "Starting the First Question.Over the last 2 weeks, how often have you had little interest or pleasure in doing things?",
    "Over the last 2 weeks, how often have you been feeling down, depressed, or hopeless?",
    "Over the last 2 weeks, how often have you had trouble falling or staying asleep, or sleeping too much?",
    "Over the last 2 weeks, how often have you felt tired or had little energy?",
    "Over the last 2 weeks, how often have you had poor appetite or been overeating?",
    "Over the last 2 weeks, how often have you felt bad about yourself \u{2014} or that you are a failure or have let yourself or your family down?",
    "Over the last 2 weeks, how often have you had trouble concentrating on things, such as reading or watching TV?",
    "Over the last 2 weeks, how often have you been moving or speaking so slowly that other people could have noticed? Or the opposite \u{2014} being so fidgety or restless that you\u{2019}ve been moving around a lot more than usual?",
    "Over the last 2 weeks, how often have you had thoughts that you would be better off dead or of hurting yourself in some way?",
];

/// Utterances that begin the assessment (compared after trim + lowercase).
pub const START_PHRASES: [&str; 2] = ["start", "start the assessment"];

/// Returned while idle when the user has not asked to start.
pub const ONBOARDING_PROMPT: &str =
    "Hello! You can start speaking to begin. Please say 'start the assessment' to begin the test.";

/// Returned when the questionnaire has already been completed.
pub const COMPLETED_MESSAGE: &str = "You've completed the test!";

/// Label preceding the summary in the final reply.
pub const FINAL_MESSAGE_LABEL: &str = "\u{1f9e0} Final message:";

/// Whether `input` asks to start the assessment.
pub fn is_start_phrase(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    START_PHRASES.contains(&normalized.as_str())
}
