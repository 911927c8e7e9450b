//! Promotion engine relocating eligible notes behind a safety backup.
//!
//! A promotion runs in a fixed order: eligibility checks (no I/O beyond
//! reads), backup, relocation, then the lifecycle transition to `promoted`.
//! Nothing destructive happens before the backup receipt exists, and a failed
//! transition moves the note back to where it came from.

use super::{
    NoteBusyError, NoteLifecycleService, NoteSessionTable, SessionKind, StatusUpdateRequest,
};
use crate::config::{VaultLayout, ZettelflowConfig};
use crate::note::{
    domain::{
        LIFECYCLE_TIMESTAMP_FORMAT, NoteDomainError, NoteMetadata, NoteRecord, NoteStatus,
        NoteType, fields,
    },
    ports::{BackupReceipt, BackupScope, BackupService, NoteStore, NoteStoreError},
};
use camino::{Utf8Path, Utf8PathBuf};
use mockable::Clock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Minimum quality score for promotion when none is configured.
pub const DEFAULT_PROMOTION_THRESHOLD: f64 = 0.7;

/// Request payload for promoting a single note.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRequest {
    path: Utf8PathBuf,
    target_type: NoteType,
    threshold: Option<f64>,
    dry_run: bool,
}

impl PromotionRequest {
    /// Creates a request promoting the note at `path` to `target_type`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, target_type: NoteType) -> Self {
        Self {
            path: path.into(),
            target_type,
            threshold: None,
            dry_run: false,
        }
    }

    /// Overrides the engine's minimum quality score for this request.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Plans the promotion without backing up or moving anything.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// Planned relocation of one note.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionPlan {
    /// Type the note will carry after promotion.
    pub target_type: NoteType,
    /// Directory the note moves into.
    pub destination_directory: Utf8PathBuf,
    /// Full destination path.
    pub destination: Utf8PathBuf,
    /// Backup taken before relocation, when one was taken.
    pub backup_path: Option<Utf8PathBuf>,
    /// Threshold the note was checked against.
    pub quality_threshold: f64,
    /// Whether the plan was only previewed.
    pub preview: bool,
}

/// Reason a promotion did not happen.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PromotionFailure {
    /// The note does not exist.
    #[error("note not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The note header has no `type` field.
    #[error("note has no type field")]
    MissingType,

    /// The note header could not be interpreted.
    #[error("note metadata is invalid: {0}")]
    InvalidMetadata(String),

    /// The quality score is absent or below the threshold.
    #[error("quality score {} is below the promotion threshold {threshold}", display_score(.score))]
    BelowThreshold {
        /// Observed score, if any.
        score: Option<f64>,
        /// Required minimum.
        threshold: f64,
    },

    /// The current status cannot move to `promoted`.
    #[error("cannot promote a note with status '{0}'")]
    InvalidTransition(NoteStatus),

    /// Another note already occupies the destination.
    #[error("destination already exists: {0}")]
    DestinationOccupied(Utf8PathBuf),

    /// The note is being worked on by another session.
    #[error(transparent)]
    Busy(#[from] NoteBusyError),

    /// The safety backup could not be created.
    #[error("backup failed: {0}")]
    Backup(String),

    /// The store failed while reading or moving the note.
    #[error("note storage failed: {0}")]
    Storage(String),

    /// The lifecycle transition failed after relocation; the move was undone.
    #[error("status update failed: {0}")]
    StatusUpdate(String),
}

fn display_score(score: &Option<f64>) -> String {
    score.map_or_else(|| "(missing)".to_owned(), |value| format!("{value:.2}"))
}

/// Outcome of a single-note promotion.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionResult {
    /// Whether the note is promoted (or would be, for a dry run).
    pub success: bool,
    /// Path the note was read from.
    pub source: Utf8PathBuf,
    /// Path the note now lives at.
    pub destination: Option<Utf8PathBuf>,
    /// Type the note carries after promotion.
    pub note_type: Option<NoteType>,
    /// Whether the note was already promoted and left untouched.
    pub already_promoted: bool,
    /// Plan that was executed or previewed.
    pub plan: Option<PromotionPlan>,
    /// Whether the promotion was only planned.
    pub dry_run: bool,
    /// Failure detail.
    pub error: Option<PromotionFailure>,
}

impl PromotionResult {
    fn failed(source: &Utf8Path, error: PromotionFailure, dry_run: bool) -> Self {
        Self {
            success: false,
            source: source.to_path_buf(),
            destination: None,
            note_type: None,
            already_promoted: false,
            plan: None,
            dry_run,
            error: Some(error),
        }
    }

    fn unchanged(note: &NoteRecord, dry_run: bool) -> Self {
        Self {
            success: true,
            source: note.path().to_path_buf(),
            destination: Some(note.path().to_path_buf()),
            note_type: note.metadata().note_type().ok().flatten(),
            already_promoted: true,
            plan: None,
            dry_run,
            error: None,
        }
    }

    fn completed(source: &Utf8Path, plan: PromotionPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            source: source.to_path_buf(),
            destination: Some(plan.destination.clone()),
            note_type: Some(plan.target_type),
            already_promoted: false,
            plan: Some(plan),
            dry_run,
            error: None,
        }
    }
}

/// Per-note outcome within a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchNoteOutcome {
    /// The note was promoted to `destination`.
    Promoted {
        /// New location.
        destination: Utf8PathBuf,
    },
    /// The note would be promoted to `destination` (preview mode).
    Previewed {
        /// Planned location.
        destination: Utf8PathBuf,
    },
    /// The note is not a candidate.
    Skipped {
        /// Why the note was passed over.
        reason: String,
    },
    /// The note was a candidate but its promotion failed.
    Failed {
        /// Failure detail.
        error: PromotionFailure,
    },
}

/// Report line for one scanned note.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchNoteReport {
    /// Scanned note.
    pub path: Utf8PathBuf,
    /// Quality score read from the note.
    pub quality_score: Option<f64>,
    /// What happened to the note.
    pub outcome: BatchNoteOutcome,
}

/// Outcome of a batch promotion sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPromotionResult {
    /// Whether the sweep only previewed.
    pub preview: bool,
    /// Threshold candidates were checked against.
    pub threshold: f64,
    /// Number of notes scanned.
    pub scanned: usize,
    /// Number of notes eligible for promotion.
    pub candidates: usize,
    /// Number of notes promoted.
    pub promoted: usize,
    /// The single backup taken for the sweep.
    pub backup: Option<BackupReceipt>,
    /// Per-note outcomes in scan order.
    pub notes: Vec<BatchNoteReport>,
    /// Wall-clock duration of the sweep.
    pub processing_time: Duration,
    /// Sweep-level failure that stopped all promotions.
    pub error: Option<PromotionFailure>,
}

impl BatchPromotionResult {
    /// Returns how many candidate promotions failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.notes
            .iter()
            .filter(|report| matches!(report.outcome, BatchNoteOutcome::Failed { .. }))
            .count()
    }
}

enum Eligibility {
    AlreadyPromoted,
    Eligible(PromotionPlan),
}

/// Engine performing safety-checked note promotions.
#[derive(Clone)]
pub struct PromotionEngine<S, B, C>
where
    S: NoteStore,
    B: BackupService,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    backups: Arc<B>,
    lifecycle: NoteLifecycleService<S, C>,
    layout: VaultLayout,
    threshold: f64,
    sessions: NoteSessionTable,
    clock: Arc<C>,
}

impl<S, B, C> PromotionEngine<S, B, C>
where
    S: NoteStore,
    B: BackupService,
    C: Clock + Send + Sync,
{
    /// Creates a promotion engine with a private session table.
    #[must_use]
    pub fn new(store: Arc<S>, backups: Arc<B>, clock: Arc<C>, layout: VaultLayout) -> Self {
        let lifecycle = NoteLifecycleService::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            backups,
            lifecycle,
            layout,
            threshold: DEFAULT_PROMOTION_THRESHOLD,
            sessions: NoteSessionTable::new(),
            clock,
        }
    }

    /// Creates a promotion engine using the configured layout and
    /// `promotion_threshold`.
    #[must_use]
    pub fn configured(
        store: Arc<S>,
        backups: Arc<B>,
        clock: Arc<C>,
        config: &ZettelflowConfig,
    ) -> Self {
        Self::new(store, backups, clock, config.layout.clone())
            .with_threshold(config.workflow.promotion_threshold)
    }

    /// Sets the minimum quality score used when a request names none.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the default minimum quality score.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Shares `sessions` with other services working on the same vault.
    #[must_use]
    pub fn with_sessions(mut self, sessions: NoteSessionTable) -> Self {
        self.lifecycle = self.lifecycle.with_sessions(sessions.clone());
        self.sessions = sessions;
        self
    }

    /// Promotes one note.
    ///
    /// A note already promoted into the target directory with the target type
    /// is reported as such and left untouched.
    pub async fn promote_note(&self, request: PromotionRequest) -> PromotionResult {
        let PromotionRequest {
            path,
            target_type,
            threshold,
            dry_run,
        } = request;
        let threshold = threshold.unwrap_or(self.threshold);

        let _session = match self.sessions.begin(&path, SessionKind::Promotion, &*self.clock) {
            Ok(guard) => guard,
            Err(busy) => return PromotionResult::failed(&path, busy.into(), dry_run),
        };
        let note = match self.load(&path).await {
            Ok(note) => note,
            Err(err) => return PromotionResult::failed(&path, err, dry_run),
        };

        let mut plan = match self.evaluate(&note, target_type, threshold, dry_run).await {
            Ok(Eligibility::AlreadyPromoted) => {
                tracing::debug!(note = %path, "note already promoted");
                return PromotionResult::unchanged(&note, dry_run);
            }
            Ok(Eligibility::Eligible(plan)) => plan,
            Err(err) => return PromotionResult::failed(&path, err, dry_run),
        };
        if dry_run {
            return PromotionResult::completed(&path, plan, dry_run);
        }

        let receipt = match self
            .backups
            .create_backup(&BackupScope::single("promotion", &path))
            .await
        {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::warn!(note = %path, error = %err, "promotion aborted: backup failed");
                return PromotionResult::failed(
                    &path,
                    PromotionFailure::Backup(err.to_string()),
                    dry_run,
                );
            }
        };
        plan.backup_path = Some(receipt.location);

        match self.execute(&path, &plan).await {
            Ok(()) => PromotionResult::completed(&path, plan, dry_run),
            Err(err) => PromotionResult::failed(&path, err, dry_run),
        }
    }

    /// Runs [`Self::promote_fleeting_notes_batch`] with the engine's threshold.
    pub async fn promote_fleeting_notes(&self, preview_mode: bool) -> BatchPromotionResult {
        self.promote_fleeting_notes_batch(self.threshold, preview_mode)
            .await
    }

    /// Promotes every eligible fleeting note to a permanent note.
    ///
    /// Exactly one backup covering all candidates is taken before the first
    /// mutation. In preview mode the sweep scans and validates only.
    pub async fn promote_fleeting_notes_batch(
        &self,
        threshold: f64,
        preview_mode: bool,
    ) -> BatchPromotionResult {
        let started = Instant::now();
        let mut result = BatchPromotionResult {
            preview: preview_mode,
            threshold,
            scanned: 0,
            candidates: 0,
            promoted: 0,
            backup: None,
            notes: Vec::new(),
            processing_time: Duration::ZERO,
            error: None,
        };

        let paths = match self.store.list(&self.layout.fleeting_dir).await {
            Ok(paths) => paths,
            Err(err) => {
                result.error = Some(PromotionFailure::Storage(err.to_string()));
                result.processing_time = started.elapsed();
                return result;
            }
        };
        result.scanned = paths.len();

        let mut candidates = Vec::new();
        for path in paths {
            let (score, eligibility) = match self.load(&path).await {
                Ok(note) => (
                    note.metadata().quality_score().ok().flatten(),
                    self.evaluate_fleeting(&note, threshold).await,
                ),
                Err(err) => (None, Err(err)),
            };
            let outcome = match eligibility {
                Ok(Eligibility::Eligible(plan)) => {
                    candidates.push((result.notes.len(), plan.clone()));
                    BatchNoteOutcome::Previewed {
                        destination: plan.destination,
                    }
                }
                Ok(Eligibility::AlreadyPromoted) => BatchNoteOutcome::Skipped {
                    reason: "already promoted".to_owned(),
                },
                Err(err) => BatchNoteOutcome::Skipped {
                    reason: err.to_string(),
                },
            };
            result.notes.push(BatchNoteReport {
                path,
                quality_score: score,
                outcome,
            });
        }
        result.candidates = candidates.len();

        if preview_mode || candidates.is_empty() {
            result.processing_time = started.elapsed();
            return result;
        }

        let scope = BackupScope::new(
            "batch-promotion",
            candidates
                .iter()
                .filter_map(|(index, _)| result.notes.get(*index))
                .map(|report| report.path.clone()),
        );
        let receipt = match self.backups.create_backup(&scope).await {
            Ok(receipt) => receipt,
            Err(err) => {
                let failure = PromotionFailure::Backup(err.to_string());
                tracing::warn!(error = %err, "batch promotion aborted: backup failed");
                for (index, _) in &candidates {
                    if let Some(report) = result.notes.get_mut(*index) {
                        report.outcome = BatchNoteOutcome::Failed {
                            error: failure.clone(),
                        };
                    }
                }
                result.error = Some(failure);
                result.processing_time = started.elapsed();
                return result;
            }
        };

        for (index, mut plan) in candidates {
            let Some(report) = result.notes.get_mut(index) else {
                continue;
            };
            plan.backup_path = Some(receipt.location.clone());
            let outcome = match self
                .sessions
                .begin(&report.path, SessionKind::Promotion, &*self.clock)
            {
                Ok(_session) => self.execute(&report.path, &plan).await,
                Err(busy) => Err(busy.into()),
            };
            report.outcome = match outcome {
                Ok(()) => {
                    result.promoted += 1;
                    BatchNoteOutcome::Promoted {
                        destination: plan.destination,
                    }
                }
                Err(error) => BatchNoteOutcome::Failed { error },
            };
        }
        result.backup = Some(receipt);
        result.processing_time = started.elapsed();

        tracing::info!(
            scanned = result.scanned,
            candidates = result.candidates,
            promoted = result.promoted,
            failed = result.failed(),
            elapsed_ms = u64::try_from(result.processing_time.as_millis()).unwrap_or(u64::MAX),
            "batch promotion finished"
        );
        result
    }

    async fn load(&self, path: &Utf8Path) -> Result<NoteRecord, PromotionFailure> {
        self.store.load(path).await.map_err(|err| match err {
            NoteStoreError::NotFound(missing) => PromotionFailure::NotFound(missing),
            NoteStoreError::Malformed { .. } => PromotionFailure::InvalidMetadata(err.to_string()),
            other => PromotionFailure::Storage(other.to_string()),
        })
    }

    async fn evaluate_fleeting(
        &self,
        note: &NoteRecord,
        threshold: f64,
    ) -> Result<Eligibility, PromotionFailure> {
        match note.metadata().note_type() {
            Ok(Some(NoteType::Fleeting)) | Err(_) | Ok(None) => {}
            Ok(Some(other)) => {
                return Err(PromotionFailure::InvalidMetadata(format!(
                    "expected a fleeting note, found '{other}'"
                )));
            }
        }
        self.evaluate(note, NoteType::Permanent, threshold, false)
            .await
    }

    async fn evaluate(
        &self,
        note: &NoteRecord,
        target_type: NoteType,
        threshold: f64,
        preview: bool,
    ) -> Result<Eligibility, PromotionFailure> {
        let metadata = note.metadata();
        let invalid = |err: NoteDomainError| {
            PromotionFailure::InvalidMetadata(err.to_string())
        };

        let status = metadata.status().map_err(invalid)?;
        let note_type = metadata.note_type().map_err(invalid)?;
        let destination_directory = self.layout.directory_for(target_type).to_path_buf();
        if status == NoteStatus::Promoted
            && note_type == Some(target_type)
            && note.path().parent() == Some(destination_directory.as_path())
        {
            return Ok(Eligibility::AlreadyPromoted);
        }
        if note_type.is_none() {
            return Err(PromotionFailure::MissingType);
        }
        let score = metadata.quality_score().map_err(invalid)?;
        if score.is_none_or(|value| value < threshold) {
            return Err(PromotionFailure::BelowThreshold { score, threshold });
        }
        // A promoted note outside its target directory is relocated and
        // re-stamped.
        if status != NoteStatus::Promoted && !status.can_transition_to(NoteStatus::Promoted) {
            return Err(PromotionFailure::InvalidTransition(status));
        }

        let file_name = note.file_name().ok_or_else(|| {
            PromotionFailure::InvalidMetadata(format!("{} has no file name", note.path()))
        })?;
        let destination = destination_directory.join(file_name);
        if destination != note.path()
            && self
                .store
                .exists(&destination)
                .await
                .map_err(|err| PromotionFailure::Storage(err.to_string()))?
        {
            return Err(PromotionFailure::DestinationOccupied(destination));
        }

        Ok(Eligibility::Eligible(PromotionPlan {
            target_type,
            destination_directory,
            destination,
            backup_path: None,
            quality_threshold: threshold,
            preview,
        }))
    }

    async fn execute(&self, source: &Utf8Path, plan: &PromotionPlan) -> Result<(), PromotionFailure> {
        let moved = plan.destination != source;
        if moved {
            self.store
                .relocate(source, &plan.destination)
                .await
                .map_err(|err| PromotionFailure::Storage(err.to_string()))?;
        }

        let mut metadata = NoteMetadata::new();
        metadata.set(fields::TYPE, plan.target_type.as_str());
        metadata.set(
            fields::PROMOTED_DATE,
            self.clock
                .utc()
                .format(LIFECYCLE_TIMESTAMP_FORMAT)
                .to_string(),
        );
        let transition = self
            .lifecycle
            .apply(
                StatusUpdateRequest::new(
                    plan.destination.clone(),
                    NoteStatus::Promoted.as_str(),
                    format!("promoted to {}", plan.target_type),
                )
                .with_metadata(metadata),
            )
            .await;

        if let Some(error) = transition.error {
            if moved {
                if let Err(rollback) = self.store.relocate(&plan.destination, source).await {
                    tracing::error!(
                        note = %source,
                        destination = %plan.destination,
                        error = %rollback,
                        "failed to roll back promotion; restore from backup"
                    );
                }
            }
            return Err(PromotionFailure::StatusUpdate(error.to_string()));
        }

        tracing::info!(
            note = %source,
            destination = %plan.destination,
            note_type = %plan.target_type,
            "note promoted"
        );
        Ok(())
    }
}
