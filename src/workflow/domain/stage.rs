//! Pipeline stage names and stage error entries.

use serde::Serialize;
use std::fmt;

/// Stage of a workflow run that can record an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    /// Quality assessment.
    Analytics,
    /// AI enrichment through the fallback controller.
    AiEnhancement,
    /// Connection discovery.
    Connections,
    /// Per-note session acquisition.
    Session,
}

impl WorkflowStage {
    /// Returns the canonical stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analytics => "analytics",
            Self::AiEnhancement => "ai_enhancement",
            Self::Connections => "connections",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Classification of a stage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageErrorKind {
    /// Malformed input; stops the pipeline.
    Validation,
    /// Missing note; stops the pipeline.
    NotFound,
    /// A collaborator failed; absorbed at the stage boundary.
    ServiceFailure,
    /// Another session holds the note.
    Conflict,
}

impl StageErrorKind {
    /// Returns the canonical kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::ServiceFailure => "service_failure",
            Self::Conflict => "conflict",
        }
    }

    /// Returns whether errors of this kind stop the pipeline.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Validation | Self::NotFound | Self::Conflict)
    }
}

impl fmt::Display for StageErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One entry in a run's ordered error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageError {
    /// Stage that failed.
    pub stage: WorkflowStage,
    /// Error classification.
    #[serde(rename = "type")]
    pub kind: StageErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl StageError {
    /// Creates a stage error entry.
    #[must_use]
    pub fn new(stage: WorkflowStage, kind: StageErrorKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}/{}] {}", self.stage, self.kind, self.message)
    }
}
