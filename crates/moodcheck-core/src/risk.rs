//! High-risk language detection.
//!
//! Scans free text for self-harm and suicide phrases. A match is only
//! flagged when no negation appears anywhere in the same text, so
//! "I never wanted to hurt myself" is not flagged while "I want to die" is.
//! The heuristic is intentionally coarse and only produces a signal; what to
//! do with it is up to the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Self-harm phrases matched as substrings of the case-folded text.
pub const RISK_PHRASES: &[&str] = &[
    "suicidal",
    "kill myself",
    "want to die",
    "don't want to live",
    "hurt myself",
    "end my life",
    "better off dead",
    "took pills",
    "took sleeping pills",
];

/// Negations that suppress a phrase match when present anywhere in the text.
pub const NEGATIONS: &[&str] = &[
    "not", "never", "no", "don't", "do not", "didn't", "did not",
];

// Whole-word so that "know" or "nothing" do not count as "no"/"not".
static NEGATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = NEGATIONS
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternatives)).expect("Invalid negation regex")
});

/// Outcome of scanning one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskSignal {
    /// First risk phrase found, if any.
    pub matched_phrase: Option<&'static str>,
    /// Whether a negation co-occurred with the match.
    pub negated: bool,
}

impl RiskSignal {
    /// True when a risk phrase matched and nothing negated it.
    pub fn is_high_risk(&self) -> bool {
        self.matched_phrase.is_some() && !self.negated
    }
}

/// Scan `text` and report which phrase matched and whether it was negated.
pub fn scan(text: &str) -> RiskSignal {
    let folded = fold(text);
    let matched_phrase = RISK_PHRASES
        .iter()
        .copied()
        .find(|phrase| folded.contains(phrase));

    // Phrases are blanked first: "don't want to live" carries its own "don't".
    let negated = matched_phrase.is_some() && {
        let rest = RISK_PHRASES
            .iter()
            .fold(folded.clone(), |acc, phrase| acc.replace(phrase, " "));
        NEGATION_RE.is_match(&rest)
    };

    RiskSignal {
        matched_phrase,
        negated,
    }
}

/// Returns `true` if `text` contains un-negated self-harm language.
pub fn is_high_risk(text: &str) -> bool {
    scan(text).is_high_risk()
}

/// Lowercase and normalize typographic apostrophes so "don’t" matches "don't".
fn fold(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}
