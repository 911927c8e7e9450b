//! Aggregate result of one pipeline run.

use super::{
    EnhancementResult, EnhancementSkip, StageError, StageErrorKind, TriageRecommendation,
    WorkflowStage,
};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::time::Duration;

/// Quality score backfilled when an assessment omits one.
pub const DEFAULT_QUALITY_SCORE: f64 = 0.5;

/// Score used when the assessment failed outright.
pub const FAILED_QUALITY_SCORE: f64 = 0.0;

/// A link suggested between two notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    /// Linked note name.
    pub target: String,
    /// Relevance score.
    pub score: f64,
    /// Why the notes are related.
    pub reason: String,
}

impl Connection {
    /// Returns the wiki-link form stored in `suggested_links`.
    #[must_use]
    pub fn wiki_link(&self) -> String {
        format!("[[{}]]", self.target)
    }
}

/// Outcome of the analytics stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    /// Whether the assessment succeeded.
    pub success: bool,
    /// Quality score in `0.0..=1.0`.
    pub quality_score: f64,
    /// Triage recommendation for the note.
    pub triage_recommendation: String,
}

/// Outcome of the connection discovery stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionsResult {
    /// Whether discovery ran.
    pub attempted: bool,
    /// Whether discovery succeeded.
    pub success: bool,
    /// Discovered connections.
    pub connections: Vec<Connection>,
}

impl ConnectionsResult {
    /// Result for a stage that did not run.
    #[must_use]
    pub const fn not_run() -> Self {
        Self {
            attempted: false,
            success: false,
            connections: Vec::new(),
        }
    }
}

/// Per-run aggregate returned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowResult {
    /// Processed note.
    pub note: Utf8PathBuf,
    /// Whether the run completed without a fatal error.
    pub success: bool,
    /// Analytics stage outcome.
    pub analytics: AnalyticsResult,
    /// Enrichment stage outcome.
    pub ai_enhancement: EnhancementResult,
    /// Connection stage outcome.
    pub connections: ConnectionsResult,
    /// Stage errors in occurrence order.
    pub errors: Vec<StageError>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// Whether the note status was advanced.
    pub status_updated: bool,
    /// Location of the cascading-failure report, when one was filed.
    pub bug_report: Option<Utf8PathBuf>,
    /// Whether the run was a dry run.
    pub dry_run: bool,
}

impl WorkflowResult {
    /// Builds the result of a run stopped by a fatal error.
    #[must_use]
    pub fn stopped(note: &Utf8Path, error: StageError, dry_run: bool) -> Self {
        Self {
            note: note.to_path_buf(),
            success: false,
            analytics: AnalyticsResult {
                success: false,
                quality_score: FAILED_QUALITY_SCORE,
                triage_recommendation: TriageRecommendation::from_score(FAILED_QUALITY_SCORE)
                    .to_string(),
            },
            ai_enhancement: EnhancementResult::skipped(EnhancementSkip::PipelineStopped),
            connections: ConnectionsResult::not_run(),
            errors: vec![error],
            warnings: Vec::new(),
            status_updated: false,
            bug_report: None,
            dry_run,
        }
    }

    /// Returns whether any error entry is fatal.
    #[must_use]
    pub fn has_fatal_error(&self) -> bool {
        self.errors.iter().any(|error| error.kind.is_fatal())
    }

    /// Returns the errors recorded for `stage`.
    pub fn errors_for(&self, stage: WorkflowStage) -> impl Iterator<Item = &StageError> {
        self.errors.iter().filter(move |error| error.stage == stage)
    }

    /// Returns whether an error of `kind` was recorded for `stage`.
    #[must_use]
    pub fn has_error(&self, stage: WorkflowStage, kind: StageErrorKind) -> bool {
        self.errors_for(stage).any(|error| error.kind == kind)
    }
}

/// Outcome of processing several notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowBatchResult {
    /// Per-note results in input order.
    pub results: Vec<WorkflowResult>,
    /// Number of successful runs.
    pub succeeded: usize,
    /// Number of failed runs.
    pub failed: usize,
    /// Number of runs that tripped the circuit breaker.
    pub cascading_failures: usize,
    /// Wall-clock duration of the batch.
    pub processing_time: Duration,
    /// Whether the batch was a dry run.
    pub dry_run: bool,
}
