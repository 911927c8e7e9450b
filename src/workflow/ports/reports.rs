//! Bug report filing port.

use crate::workflow::domain::BugReport;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for bug report operations.
pub type BugReportResult<T> = Result<T, BugReportError>;

/// Errors returned while filing a report.
#[derive(Debug, Clone, Error)]
pub enum BugReportError {
    /// The report template could not be rendered.
    #[error("cannot render bug report: {0}")]
    Render(String),

    /// The report could not be written.
    #[error("cannot write bug report: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl BugReportError {
    /// Wraps an infrastructure error.
    #[must_use]
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Destination for diagnostic reports.
#[async_trait]
pub trait BugReportSink: Send + Sync {
    /// Files `report` and returns where it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`BugReportError`] when the report cannot be rendered or
    /// written.
    async fn file(&self, report: &BugReport) -> BugReportResult<Utf8PathBuf>;
}
