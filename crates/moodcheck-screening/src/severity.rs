//! Ordinal severity buckets and their score mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How often a symptom occurred over the last two weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    #[serde(rename = "Not at all")]
    NotAtAll,
    #[serde(rename = "Several days")]
    SeveralDays,
    #[serde(rename = "More than half the days")]
    MoreThanHalfTheDays,
    #[serde(rename = "Nearly every day")]
    NearlyEveryDay,
}

impl SeverityLevel {
    /// All levels in ascending order.
    pub const ALL: [SeverityLevel; 4] = [
        SeverityLevel::NotAtAll,
        SeverityLevel::SeveralDays,
        SeverityLevel::MoreThanHalfTheDays,
        SeverityLevel::NearlyEveryDay,
    ];

    /// Canonical label the backend is asked to reply with.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityLevel::NotAtAll => "Not at all",
            SeverityLevel::SeveralDays => "Several days",
            SeverityLevel::MoreThanHalfTheDays => "More than half the days",
            SeverityLevel::NearlyEveryDay => "Nearly every day",
        }
    }

    /// PHQ-9 item score (0-3).
    pub fn score(&self) -> u32 {
        match self {
            SeverityLevel::NotAtAll => 0,
            SeverityLevel::SeveralDays => 1,
            SeverityLevel::MoreThanHalfTheDays => 2,
            SeverityLevel::NearlyEveryDay => 3,
        }
    }

    /// Exact lookup of a canonical label. No trimming or case folding.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_ordinal() {
        let scores: Vec<u32> = SeverityLevel::ALL.iter().map(|l| l.score()).collect();
        assert_eq!(scores, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_from_label_exact() {
        assert_eq!(
            SeverityLevel::from_label("Several days"),
            Some(SeverityLevel::SeveralDays)
        );
        assert_eq!(
            SeverityLevel::from_label("More than half the days"),
            Some(SeverityLevel::MoreThanHalfTheDays)
        );
        assert_eq!(
            SeverityLevel::from_label("Nearly every day"),
            Some(SeverityLevel::NearlyEveryDay)
        );
    }

    #[test]
    fn test_from_label_rejects_variants() {
        assert_eq!(SeverityLevel::from_label("several days"), None);
        assert_eq!(SeverityLevel::from_label("Several days."), None);
        assert_eq!(SeverityLevel::from_label("Sometimes"), None);
        assert_eq!(SeverityLevel::from_label(""), None);
    }

    #[test]
    fn test_display_matches_label() {
        for level in SeverityLevel::ALL {
            assert_eq!(level.to_string(), level.label());
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&SeverityLevel::MoreThanHalfTheDays).unwrap();
        assert_eq!(json, "\"More than half the days\"");
        let back: SeverityLevel = serde_json::from_str("\"Not at all\"").unwrap();
        assert_eq!(back, SeverityLevel::NotAtAll);
    }
}
