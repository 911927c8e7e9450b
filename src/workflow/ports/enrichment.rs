//! AI enrichment ports.

use crate::note::domain::NoteRecord;
use crate::workflow::domain::EnhancementResult;
use async_trait::async_trait;
use thiserror::Error;

/// Raw response from an enrichment service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentPayload {
    /// Suggested tags, unnormalised.
    pub tags: Option<Vec<String>>,
    /// Generated summary.
    pub summary: Option<String>,
}

/// Errors returned by enrichment services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    /// Connection loss, timeout, or temporary unavailability.
    #[error("enrichment service unavailable: {0}")]
    Transient(String),

    /// The service refused or could not process the request.
    #[error("enrichment request rejected: {0}")]
    Rejected(String),
}

impl EnrichmentError {
    /// Returns whether the failure is a transient service condition.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// One enrichment service tier.
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    /// Produces tags and a summary for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Transient`] on connection loss or timeout and
    /// [`EnrichmentError::Rejected`] otherwise.
    async fn enrich(&self, text: &str) -> Result<EnrichmentPayload, EnrichmentError>;
}

/// Enrichment entry point used by the orchestrator.
///
/// Implementations absorb their own failures: the returned result is always
/// populated, with `success == false` when nothing could be produced.
#[async_trait]
pub trait NoteEnhancer: Send + Sync {
    /// Enriches `note`, making no calls when `dry_run` is set.
    async fn enhance(&self, note: &NoteRecord, dry_run: bool) -> EnhancementResult;
}
