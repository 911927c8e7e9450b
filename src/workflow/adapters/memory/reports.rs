//! In-memory bug report sink.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};

use crate::workflow::{
    domain::{BugReport, BugReportKind},
    ports::{BugReportError, BugReportResult, BugReportSink},
};

/// Sink that keeps filed reports in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBugReportSink {
    state: Arc<RwLock<InMemoryReportState>>,
}

#[derive(Debug, Default)]
struct InMemoryReportState {
    reports: Vec<BugReport>,
    failure: Option<String>,
}

impl InMemoryBugReportSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink whose every call fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let state = InMemoryReportState {
            reports: Vec::new(),
            failure: Some(message.into()),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns every report filed so far.
    ///
    /// # Errors
    ///
    /// Returns [`BugReportError::Io`] when lock acquisition fails.
    pub fn reports(&self) -> BugReportResult<Vec<BugReport>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.reports.clone())
    }

    /// Returns the filed reports of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`BugReportError::Io`] when lock acquisition fails.
    pub fn reports_of(&self, kind: BugReportKind) -> BugReportResult<Vec<BugReport>> {
        Ok(self
            .reports()?
            .into_iter()
            .filter(|report| report.kind == kind)
            .collect())
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> BugReportError {
    BugReportError::io(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BugReportSink for InMemoryBugReportSink {
    async fn file(&self, report: &BugReport) -> BugReportResult<Utf8PathBuf> {
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(message) = &state.failure {
            return Err(BugReportError::io(std::io::Error::other(message.clone())));
        }
        state.reports.push(report.clone());
        Ok(Utf8PathBuf::from(format!(
            "memory-reports/{}-{}",
            report.file_stem(),
            state.reports.len()
        )))
    }
}
