//! Outcome of an AI enrichment attempt.

use camino::Utf8PathBuf;
use serde::Serialize;
use std::fmt;

/// Tier that produced an enrichment result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementSource {
    /// Tier 1, normally local inference.
    Primary,
    /// Tier 2, normally an external API.
    Secondary,
    /// Tier 3, the neutral default after both services failed.
    Degraded,
}

impl EnhancementSource {
    /// Returns the canonical source name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for EnhancementSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Why enrichment was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EnhancementSkip {
    /// The run was a dry run.
    DryRun,
    /// The cost gate rejected the note.
    QualityTooLow {
        /// Observed quality score.
        score: f64,
        /// Gate threshold.
        threshold: f64,
    },
    /// An earlier fatal error stopped the pipeline.
    PipelineStopped,
}

impl EnhancementSkip {
    /// Returns the canonical skip reason.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::DryRun => "dry_run",
            Self::QualityTooLow { .. } => "quality_too_low",
            Self::PipelineStopped => "pipeline_stopped",
        }
    }
}

/// Failure of one enrichment tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierFailure {
    /// Tier that failed.
    pub tier: EnhancementSource,
    /// Whether the failure was a transient service condition.
    pub transient: bool,
    /// Failure detail.
    pub message: String,
}

/// Result of enriching one note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancementResult {
    /// Whether enrichment produced content.
    pub success: bool,
    /// Normalised tags.
    pub tags: Vec<String>,
    /// Generated summary.
    pub summary: String,
    /// Tier that produced the result; `None` when skipped.
    pub source: Option<EnhancementSource>,
    /// Whether a tier other than the primary was used.
    pub fallback: bool,
    /// Whether the request was a dry run.
    pub dry_run: bool,
    /// Why enrichment was skipped.
    pub skip: Option<EnhancementSkip>,
    /// Failures of the tiers that were tried.
    pub failures: Vec<TierFailure>,
    /// Location of the bug report filed on degradation.
    pub bug_report: Option<Utf8PathBuf>,
}

impl EnhancementResult {
    const fn empty() -> Self {
        Self {
            success: false,
            tags: Vec::new(),
            summary: String::new(),
            source: None,
            fallback: false,
            dry_run: false,
            skip: None,
            failures: Vec::new(),
            bug_report: None,
        }
    }

    /// Creates a successful result from `source`.
    #[must_use]
    pub fn enriched(
        source: EnhancementSource,
        tags: Vec<String>,
        summary: String,
        failures: Vec<TierFailure>,
    ) -> Self {
        Self {
            success: true,
            tags,
            summary,
            source: Some(source),
            fallback: source != EnhancementSource::Primary,
            failures,
            ..Self::empty()
        }
    }

    /// Creates the neutral degraded result.
    #[must_use]
    pub fn degraded(failures: Vec<TierFailure>) -> Self {
        Self {
            source: Some(EnhancementSource::Degraded),
            fallback: true,
            failures,
            ..Self::empty()
        }
    }

    /// Creates a skipped result that made no calls.
    #[must_use]
    pub fn skipped(skip: EnhancementSkip) -> Self {
        Self {
            dry_run: matches!(skip, EnhancementSkip::DryRun),
            skip: Some(skip),
            ..Self::empty()
        }
    }

    /// Returns whether enrichment was not attempted.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }

    /// Returns the skip reason, if any.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&'static str> {
        self.skip.map(EnhancementSkip::reason)
    }

    /// Joins tier failure messages for error reporting.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        if self.failures.is_empty() {
            return "enhancement produced no result".to_owned();
        }
        self.failures
            .iter()
            .map(|failure| format!("{}: {}", failure.tier, failure.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
