//! Confirmation phrasing shown after each classified answer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::severity::SeverityLevel;

/// Chooses one phrase out of several candidates.
pub trait PhrasePicker: Send + Sync {
    /// Index into a non-empty candidate list of length `len`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniformly random choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl PhrasePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Always the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl PhrasePicker for FirstPicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Cycles through candidates in order, shared across calls.
#[derive(Debug, Default)]
pub struct RoundRobinPicker {
    next: AtomicUsize,
}

impl PhrasePicker for RoundRobinPicker {
    fn pick(&self, len: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % len
    }
}

/// Phrase table keyed by severity, plus the strategy that picks from it.
pub struct Confirmations {
    phrases: HashMap<SeverityLevel, Vec<String>>,
    picker: Box<dyn PhrasePicker>,
}

impl Confirmations {
    /// Default English phrase table.
    pub fn new(picker: impl PhrasePicker + 'static) -> Self {
        Self::with_phrases(default_phrases(), picker)
    }

    /// Custom phrase table. Levels without phrases get the templated fallback.
    pub fn with_phrases(
        phrases: HashMap<SeverityLevel, Vec<String>>,
        picker: impl PhrasePicker + 'static,
    ) -> Self {
        Self {
            phrases,
            picker: Box::new(picker),
        }
    }

    /// Confirmation for `level`: a picked phrase, or "Marked as {level}".
    pub fn confirm(&self, level: SeverityLevel) -> String {
        match self.phrases.get(&level) {
            Some(candidates) if !candidates.is_empty() => {
                let idx = self.picker.pick(candidates.len()).min(candidates.len() - 1);
                candidates[idx].clone()
            }
            _ => format!("Marked as {}", level),
        }
    }
}

impl Default for Confirmations {
    fn default() -> Self {
        Self::new(RandomPicker)
    }
}

fn default_phrases() -> HashMap<SeverityLevel, Vec<String>> {
    let table: [(SeverityLevel, &[&str]); 4] = [
        (
            SeverityLevel::NotAtAll,
            &["I'll note that as 'not at all'.", "Thanks, marking 'not at all'."],
        ),
        (
            SeverityLevel::SeveralDays,
            &["Noted as 'several days'.", "I'll mark that down."],
        ),
        (
            SeverityLevel::MoreThanHalfTheDays,
            &["Noted: more than half the days."],
        ),
        (
            SeverityLevel::NearlyEveryDay,
            &["Thanks for your honesty. Marking as 'nearly every day'."],
        ),
    ];

    table
        .into_iter()
        .map(|(level, phrases)| (level, phrases.iter().map(|p| p.to_string()).collect()))
        .collect()
}
