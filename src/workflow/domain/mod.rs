//! Domain model for workflow runs.
//!
//! Stage names, stage errors, enrichment outcomes, bug reports, and the
//! per-run aggregate live here as tagged types. Collaborator calls stay
//! behind the ports.

mod enhancement;
mod report;
mod result;
mod stage;
mod tags;
mod triage;

pub use enhancement::{EnhancementResult, EnhancementSkip, EnhancementSource, TierFailure};
pub use report::{BugReport, BugReportKind, REPORT_TIMESTAMP_FORMAT, ReportedFailure, Severity};
pub use result::{
    AnalyticsResult, Connection, ConnectionsResult, DEFAULT_QUALITY_SCORE, FAILED_QUALITY_SCORE,
    WorkflowBatchResult, WorkflowResult,
};
pub use stage::{StageError, StageErrorKind, WorkflowStage};
pub use tags::{merge_tags, normalize_tag, normalize_tags};
pub use triage::TriageRecommendation;
