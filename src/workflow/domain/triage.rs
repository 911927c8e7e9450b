//! Triage recommendation derived from a quality score.

use std::fmt;

/// Suggested next step for a processed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriageRecommendation {
    /// Ready for promotion to a permanent note.
    PromoteToPermanent,
    /// Worth keeping but needs more work.
    FurtherDevelopment,
    /// Needs substantial rework before it is useful.
    NeedsSignificantWork,
}

impl TriageRecommendation {
    /// Score at or above which promotion is recommended.
    pub const PROMOTE_THRESHOLD: f64 = 0.7;
    /// Score at or above which further development is recommended.
    pub const DEVELOP_THRESHOLD: f64 = 0.4;

    /// Derives a recommendation from a quality score.
    #[must_use]
    pub const fn from_score(score: f64) -> Self {
        if score >= Self::PROMOTE_THRESHOLD {
            Self::PromoteToPermanent
        } else if score >= Self::DEVELOP_THRESHOLD {
            Self::FurtherDevelopment
        } else {
            Self::NeedsSignificantWork
        }
    }

    /// Returns the canonical recommendation string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PromoteToPermanent => "promote_to_permanent",
            Self::FurtherDevelopment => "further_development",
            Self::NeedsSignificantWork => "needs_significant_work",
        }
    }
}

impl fmt::Display for TriageRecommendation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.95, TriageRecommendation::PromoteToPermanent)]
    #[case(0.7, TriageRecommendation::PromoteToPermanent)]
    #[case(0.55, TriageRecommendation::FurtherDevelopment)]
    #[case(0.4, TriageRecommendation::FurtherDevelopment)]
    #[case(0.1, TriageRecommendation::NeedsSignificantWork)]
    fn score_bands_map_to_recommendations(
        #[case] score: f64,
        #[case] expected: TriageRecommendation,
    ) {
        assert_eq!(TriageRecommendation::from_score(score), expected);
    }
}
