//! Pipeline coordinating assessment, enrichment, and connection discovery.
//!
//! A run moves through analytics, the cost gate, enrichment, connection
//! discovery, result validation, persistence, and the lifecycle hook. Only a
//! malformed or missing note stops the run; every other stage failure is
//! recorded and replaced with a neutral default.

use crate::config::WorkflowConfig;
use crate::note::{
    domain::{NoteRecord, NoteStatus, fields},
    ports::{NoteStore, NoteStoreError},
    services::{NoteLifecycleService, NoteSessionTable, SessionKind, StatusUpdateRequest},
};
use crate::workflow::{
    domain::{
        AnalyticsResult, BugReport, ConnectionsResult, DEFAULT_QUALITY_SCORE, EnhancementResult,
        EnhancementSkip, FAILED_QUALITY_SCORE, ReportedFailure, StageError, StageErrorKind,
        TriageRecommendation, WorkflowBatchResult, WorkflowResult, WorkflowStage, merge_tags,
    },
    ports::{
        AssessmentError, BugReportSink, ConnectionDiscoverer, NoteEnhancer, QualityAssessment,
        QualityAssessor,
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Workflow orchestrator for single notes and batches.
#[derive(Clone)]
pub struct WorkflowOrchestrator<S, Q, E, D, R, C>
where
    S: NoteStore,
    Q: QualityAssessor,
    E: NoteEnhancer,
    D: ConnectionDiscoverer,
    R: BugReportSink,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    assessor: Arc<Q>,
    enhancer: Arc<E>,
    discoverer: Arc<D>,
    reports: Arc<R>,
    clock: Arc<C>,
    lifecycle: NoteLifecycleService<S, C>,
    sessions: NoteSessionTable,
    config: WorkflowConfig,
}

/// Stage outcomes gathered before result validation.
struct StageOutcomes {
    assessment: Option<QualityAssessment>,
    ai_enhancement: EnhancementResult,
    connections: ConnectionsResult,
    errors: Vec<StageError>,
    warnings: Vec<String>,
}

impl<S, Q, E, D, R, C> WorkflowOrchestrator<S, Q, E, D, R, C>
where
    S: NoteStore,
    Q: QualityAssessor,
    E: NoteEnhancer,
    D: ConnectionDiscoverer,
    R: BugReportSink,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator with a private session table.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        assessor: Arc<Q>,
        enhancer: Arc<E>,
        discoverer: Arc<D>,
        reports: Arc<R>,
        clock: Arc<C>,
        config: WorkflowConfig,
    ) -> Self {
        let lifecycle = NoteLifecycleService::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            assessor,
            enhancer,
            discoverer,
            reports,
            clock,
            lifecycle,
            sessions: NoteSessionTable::new(),
            config,
        }
    }

    /// Shares `sessions` with other services working on the same vault.
    #[must_use]
    pub fn with_sessions(mut self, sessions: NoteSessionTable) -> Self {
        self.lifecycle = self.lifecycle.with_sessions(sessions.clone());
        self.sessions = sessions;
        self
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Runs the full pipeline for one note.
    ///
    /// The returned result is always populated; failures are reported through
    /// its `errors` and `warnings` rather than as an `Err`.
    pub async fn process(&self, path: &Utf8Path, dry_run: bool) -> WorkflowResult {
        let _session = match self.sessions.begin(path, SessionKind::Processing, &*self.clock) {
            Ok(guard) => guard,
            Err(busy) => {
                tracing::warn!(note = %path, held_by = %busy.held_by, "note is busy");
                return WorkflowResult::stopped(
                    path,
                    StageError::new(
                        WorkflowStage::Session,
                        StageErrorKind::Conflict,
                        busy.to_string(),
                    ),
                    dry_run,
                );
            }
        };

        let note = match self.store.load(path).await {
            Ok(note) => note,
            Err(err) => {
                let kind = match err {
                    NoteStoreError::NotFound(_) => StageErrorKind::NotFound,
                    NoteStoreError::Malformed { .. } => StageErrorKind::Validation,
                    NoteStoreError::AlreadyExists(_) | NoteStoreError::Io(_) => {
                        StageErrorKind::ServiceFailure
                    }
                };
                let error = StageError::new(WorkflowStage::Analytics, kind, err.to_string());
                return Self::stop(path, error, dry_run);
            }
        };

        let outcomes = match self.run_stages(&note, dry_run).await {
            Ok(outcomes) => outcomes,
            Err(fatal) => return Self::stop(path, fatal, dry_run),
        };
        let mut result = Self::validate(path, outcomes, dry_run);

        if !dry_run {
            let persist_warning = self.persist(note, &result).await;
            result.warnings.extend(persist_warning);
            self.advance_status(&mut result).await;
        }
        self.trip_circuit_breaker(&mut result).await;

        tracing::info!(
            note = %path,
            success = result.success,
            quality_score = result.analytics.quality_score,
            enhancement_source = ?result.ai_enhancement.source,
            connections = result.connections.connections.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            dry_run,
            "workflow run finished"
        );
        result
    }

    /// Runs [`Self::process`] for each path in order.
    pub async fn process_batch(&self, paths: &[Utf8PathBuf], dry_run: bool) -> WorkflowBatchResult {
        let started = Instant::now();
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.process(path, dry_run).await);
        }
        let succeeded = results.iter().filter(|result| result.success).count();
        let cascading_failures = results
            .iter()
            .filter(|result| result.errors.len() >= self.config.circuit_breaker_threshold)
            .count();
        let processing_time = started.elapsed();

        tracing::info!(
            notes = results.len(),
            succeeded,
            cascading_failures,
            elapsed_ms = u64::try_from(processing_time.as_millis()).unwrap_or(u64::MAX),
            dry_run,
            "workflow batch finished"
        );
        WorkflowBatchResult {
            failed: results.len() - succeeded,
            results,
            succeeded,
            cascading_failures,
            processing_time,
            dry_run,
        }
    }

    fn stop(path: &Utf8Path, error: StageError, dry_run: bool) -> WorkflowResult {
        tracing::warn!(
            note = %path,
            stage = %error.stage,
            kind = %error.kind,
            message = %error.message,
            "workflow stopped"
        );
        WorkflowResult::stopped(path, error, dry_run)
    }

    async fn run_stages(
        &self,
        note: &NoteRecord,
        dry_run: bool,
    ) -> Result<StageOutcomes, StageError> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let assessment = match self.assessor.assess(note).await {
            Ok(assessment) => Some(check_score(assessment)?),
            Err(AssessmentError::Validation(message)) => {
                return Err(StageError::new(
                    WorkflowStage::Analytics,
                    StageErrorKind::Validation,
                    message,
                ));
            }
            Err(AssessmentError::NotFound(message)) => {
                return Err(StageError::new(
                    WorkflowStage::Analytics,
                    StageErrorKind::NotFound,
                    message,
                ));
            }
            Err(err @ AssessmentError::Failed(_)) => {
                errors.push(StageError::new(
                    WorkflowStage::Analytics,
                    StageErrorKind::ServiceFailure,
                    err.to_string(),
                ));
                None
            }
        };

        let threshold = self.config.quality_gate_threshold;
        let gated_score = assessment
            .as_ref()
            .and_then(|assessed| assessed.quality_score)
            .filter(|score| *score < threshold);
        let ai_enhancement = if let Some(score) = gated_score {
            tracing::info!(
                note = %note.path(),
                quality_score = score,
                threshold,
                "cost gate skipped AI enhancement"
            );
            warnings.push(format!(
                "AI enhancement skipped: quality score {score:.2} is below threshold {threshold:.2}"
            ));
            EnhancementResult::skipped(EnhancementSkip::QualityTooLow { score, threshold })
        } else {
            let enhancement = self.enhancer.enhance(note, dry_run).await;
            if !enhancement.success && !enhancement.is_skipped() {
                errors.push(StageError::new(
                    WorkflowStage::AiEnhancement,
                    StageErrorKind::ServiceFailure,
                    enhancement.failure_summary(),
                ));
            }
            enhancement
        };

        let connections = match self.discoverer.discover(note).await {
            Ok(connections) => ConnectionsResult {
                attempted: true,
                success: true,
                connections,
            },
            Err(err) => {
                errors.push(StageError::new(
                    WorkflowStage::Connections,
                    StageErrorKind::ServiceFailure,
                    err.to_string(),
                ));
                ConnectionsResult {
                    attempted: true,
                    success: false,
                    connections: Vec::new(),
                }
            }
        };

        Ok(StageOutcomes {
            assessment,
            ai_enhancement,
            connections,
            errors,
            warnings,
        })
    }

    fn validate(path: &Utf8Path, outcomes: StageOutcomes, dry_run: bool) -> WorkflowResult {
        let StageOutcomes {
            assessment,
            ai_enhancement,
            connections,
            errors,
            warnings,
        } = outcomes;

        let analytics = match assessment {
            Some(assessed) => {
                let quality_score = assessed.quality_score.unwrap_or(DEFAULT_QUALITY_SCORE);
                let triage_recommendation = assessed
                    .triage_recommendation
                    .filter(|recommendation| !recommendation.trim().is_empty())
                    .unwrap_or_else(|| {
                        TriageRecommendation::from_score(quality_score).to_string()
                    });
                AnalyticsResult {
                    success: true,
                    quality_score,
                    triage_recommendation,
                }
            }
            None => AnalyticsResult {
                success: false,
                quality_score: FAILED_QUALITY_SCORE,
                triage_recommendation: TriageRecommendation::from_score(FAILED_QUALITY_SCORE)
                    .to_string(),
            },
        };

        let mut result = WorkflowResult {
            note: path.to_path_buf(),
            success: true,
            analytics,
            ai_enhancement,
            connections,
            errors,
            warnings,
            status_updated: false,
            bug_report: None,
            dry_run,
        };
        result.success = !result.has_fatal_error();
        result
    }

    async fn persist(
        &self,
        mut note: NoteRecord,
        result: &WorkflowResult,
    ) -> Option<String> {
        let existing_tags = note.metadata().tags();
        let header = note.metadata_mut();
        if result.analytics.success {
            header.set(fields::QUALITY_SCORE, result.analytics.quality_score);
            header.set(
                fields::TRIAGE_RECOMMENDATION,
                result.analytics.triage_recommendation.clone(),
            );
        }
        if result.ai_enhancement.success {
            let tags = merge_tags(&existing_tags, &result.ai_enhancement.tags);
            header.set(fields::TAGS, tags);
            if !result.ai_enhancement.summary.is_empty() {
                header.set(fields::AI_SUMMARY, result.ai_enhancement.summary.clone());
            }
        }
        if result.connections.success {
            let links: Vec<Value> = result
                .connections
                .connections
                .iter()
                .map(|connection| Value::String(connection.wiki_link()))
                .collect();
            header.set(fields::SUGGESTED_LINKS, links);
        }

        match self.store.save(&note).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(
                    note = %note.path(),
                    error = %err,
                    "failed to persist workflow results"
                );
                Some(format!("Failed to persist workflow results: {err}"))
            }
        }
    }

    async fn advance_status(&self, result: &mut WorkflowResult) {
        if !result.success {
            return;
        }
        let error_count = result.errors.len();
        if !result.analytics.success || error_count >= self.config.circuit_breaker_threshold {
            tracing::debug!(
                note = %result.note,
                analytics = result.analytics.success,
                errors = error_count,
                "status left unchanged without a usable quality signal"
            );
            return;
        }
        let transition = self
            .lifecycle
            .apply(StatusUpdateRequest::new(
                result.note.clone(),
                NoteStatus::Promoted.as_str(),
                "workflow processing complete",
            ))
            .await;
        match transition.error {
            None => result.status_updated = true,
            Some(err) => result
                .warnings
                .push(format!("Lifecycle status update failed: {err}")),
        }
    }

    async fn trip_circuit_breaker(&self, result: &mut WorkflowResult) {
        let error_count = result.errors.len();
        if error_count < self.config.circuit_breaker_threshold {
            return;
        }
        result.warnings.push(format!(
            "Total workflow failure: {error_count} stage errors in one run"
        ));
        tracing::error!(
            note = %result.note,
            errors = error_count,
            "workflow circuit breaker tripped"
        );
        if result.dry_run {
            return;
        }

        let report = BugReport::workflow_failure(
            result.note.clone(),
            result
                .errors
                .iter()
                .map(|error| {
                    ReportedFailure::new(
                        format!("{}/{}", error.stage, error.kind),
                        error.message.clone(),
                    )
                })
                .collect(),
            self.clock.utc(),
        );
        match self.reports.file(&report).await {
            Ok(location) => result.bug_report = Some(location),
            Err(err) => {
                tracing::error!(
                    note = %result.note,
                    error = %err,
                    "failed to file workflow report"
                );
                result
                    .warnings
                    .push(format!("Failed to file workflow failure report: {err}"));
            }
        }
    }
}

fn check_score(assessment: QualityAssessment) -> Result<QualityAssessment, StageError> {
    match assessment.quality_score {
        Some(score) if !(0.0..=1.0).contains(&score) => Err(StageError::new(
            WorkflowStage::Analytics,
            StageErrorKind::Validation,
            format!("quality score {score} is outside 0.0..=1.0"),
        )),
        _ => Ok(assessment),
    }
}
