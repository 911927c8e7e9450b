//! Three-tier AI enrichment with a neutral degraded outcome.
//!
//! Tier 1 runs under a timeout. Only a transient failure (connection loss or
//! timeout) falls through to tier 2; any other tier 1 failure, or a tier 2
//! failure, ends in the degraded tier, which returns empty content and files
//! an `AI_FAILURE` report.

use crate::config::WorkflowConfig;
use crate::note::domain::NoteRecord;
use crate::workflow::{
    domain::{
        BugReport, EnhancementResult, EnhancementSkip, EnhancementSource, ReportedFailure,
        TierFailure, normalize_tags,
    },
    ports::{BugReportSink, EnrichmentClient, EnrichmentError, EnrichmentPayload, NoteEnhancer},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Enrichment controller falling back from primary to secondary to degraded.
#[derive(Clone)]
pub struct EnhancementFallbackController<P, S, R, C>
where
    P: EnrichmentClient,
    S: EnrichmentClient,
    R: BugReportSink,
    C: Clock + Send + Sync,
{
    primary: Arc<P>,
    secondary: Arc<S>,
    reports: Arc<R>,
    clock: Arc<C>,
    primary_timeout: Duration,
    max_tags: usize,
}

impl<P, S, R, C> EnhancementFallbackController<P, S, R, C>
where
    P: EnrichmentClient,
    S: EnrichmentClient,
    R: BugReportSink,
    C: Clock + Send + Sync,
{
    /// Creates a controller using the timeout and tag limit from `config`.
    #[must_use]
    pub const fn new(
        primary: Arc<P>,
        secondary: Arc<S>,
        reports: Arc<R>,
        clock: Arc<C>,
        config: &WorkflowConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            reports,
            clock,
            primary_timeout: config.primary_timeout(),
            max_tags: config.max_tags,
        }
    }

    /// Overrides the tier 1 timeout.
    #[must_use]
    pub const fn with_primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = timeout;
        self
    }

    async fn call_primary(&self, text: &str) -> Result<EnrichmentPayload, EnrichmentError> {
        tokio::time::timeout(self.primary_timeout, self.primary.enrich(text))
            .await
            .unwrap_or_else(|_| {
                Err(EnrichmentError::Transient(format!(
                    "primary enrichment timed out after {}s",
                    self.primary_timeout.as_secs_f64()
                )))
            })
    }

    fn accept(
        &self,
        source: EnhancementSource,
        payload: EnrichmentPayload,
        failures: Vec<TierFailure>,
    ) -> EnhancementResult {
        let tags = normalize_tags(payload.tags.unwrap_or_default(), self.max_tags);
        let summary = payload.summary.unwrap_or_default().trim().to_owned();
        EnhancementResult::enriched(source, tags, summary, failures)
    }

    async fn degrade(&self, note: &NoteRecord, failures: Vec<TierFailure>) -> EnhancementResult {
        let mut result = EnhancementResult::degraded(failures);
        let report = BugReport::ai_failure(
            note.path(),
            result
                .failures
                .iter()
                .map(|failure| ReportedFailure::new(failure.tier.as_str(), &failure.message))
                .collect(),
            self.clock.utc(),
        );
        match self.reports.file(&report).await {
            Ok(location) => result.bug_report = Some(location),
            Err(err) => tracing::error!(
                note = %note.path(),
                error = %err,
                "failed to file AI failure report"
            ),
        }
        tracing::warn!(
            note = %note.path(),
            failures = result.failures.len(),
            "all enrichment tiers failed; returning degraded result"
        );
        result
    }
}

fn tier_failure(tier: EnhancementSource, err: &EnrichmentError) -> TierFailure {
    TierFailure {
        tier,
        transient: err.is_transient(),
        message: err.to_string(),
    }
}

#[async_trait]
impl<P, S, R, C> NoteEnhancer for EnhancementFallbackController<P, S, R, C>
where
    P: EnrichmentClient,
    S: EnrichmentClient,
    R: BugReportSink,
    C: Clock + Send + Sync,
{
    async fn enhance(&self, note: &NoteRecord, dry_run: bool) -> EnhancementResult {
        if dry_run {
            return EnhancementResult::skipped(EnhancementSkip::DryRun);
        }

        let primary_error = match self.call_primary(note.body()).await {
            Ok(payload) => {
                tracing::debug!(note = %note.path(), "primary enrichment succeeded");
                return self.accept(EnhancementSource::Primary, payload, Vec::new());
            }
            Err(err) => err,
        };
        let mut failures = vec![tier_failure(EnhancementSource::Primary, &primary_error)];
        if !primary_error.is_transient() {
            return self.degrade(note, failures).await;
        }

        tracing::info!(
            note = %note.path(),
            error = %primary_error,
            "primary enrichment unavailable; falling back to secondary"
        );
        match self.secondary.enrich(note.body()).await {
            Ok(payload) => self.accept(EnhancementSource::Secondary, payload, failures),
            Err(err) => {
                failures.push(tier_failure(EnhancementSource::Secondary, &err));
                self.degrade(note, failures).await
            }
        }
    }
}
