//! Diagnostic reports filed for human review.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Timestamp format used in report names.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Kind of failure a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BugReportKind {
    /// Every enrichment tier failed.
    AiFailure,
    /// A pipeline run accumulated cascading stage errors.
    WorkflowFailure,
}

impl BugReportKind {
    /// Returns the report kind prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AiFailure => "AI_FAILURE",
            Self::WorkflowFailure => "WORKFLOW_FAILURE",
        }
    }
}

impl fmt::Display for BugReportKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Report severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Degraded behaviour that needs attention.
    High,
    /// Cascading failure.
    Critical,
}

impl Severity {
    /// Returns the severity label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failure detail recorded in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedFailure {
    /// Stage or tier name.
    pub source: String,
    /// Failure detail.
    pub message: String,
}

impl ReportedFailure {
    /// Creates a failure entry.
    #[must_use]
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Append-only diagnostic artefact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugReport {
    /// Report kind.
    pub kind: BugReportKind,
    /// Report severity.
    pub severity: Severity,
    /// Affected note.
    pub note: Utf8PathBuf,
    /// Failure details in occurrence order.
    pub failures: Vec<ReportedFailure>,
    /// Checklist for the reviewer.
    pub actions: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl BugReport {
    /// Builds the report filed when every enrichment tier fails.
    #[must_use]
    pub fn ai_failure(
        note: impl Into<Utf8PathBuf>,
        failures: Vec<ReportedFailure>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: BugReportKind::AiFailure,
            severity: Severity::High,
            note: note.into(),
            failures,
            actions: [
                "Check that the primary inference service is running and reachable",
                "Verify credentials and quota for the secondary enrichment service",
                "Re-run processing for the note once a service is available",
            ]
            .map(str::to_owned)
            .to_vec(),
            created_at,
        }
    }

    /// Builds the report filed when a run trips the circuit breaker.
    #[must_use]
    pub fn workflow_failure(
        note: impl Into<Utf8PathBuf>,
        failures: Vec<ReportedFailure>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: BugReportKind::WorkflowFailure,
            severity: Severity::Critical,
            note: note.into(),
            failures,
            actions: [
                "Inspect every failing stage listed above",
                "Confirm the note file is readable and its header is well formed",
                "Check collaborator service health before reprocessing",
                "Reprocess the note after the failures are resolved",
            ]
            .map(str::to_owned)
            .to_vec(),
            created_at,
        }
    }

    /// Returns the report name, `<KIND>_<timestamp>`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            self.kind,
            self.created_at.format(REPORT_TIMESTAMP_FORMAT)
        )
    }
}
