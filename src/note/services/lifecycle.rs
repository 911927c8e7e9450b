//! Service layer applying validated status transitions to stored notes.

use super::{NoteBusyError, NoteSessionTable, SessionKind};
use crate::note::{
    domain::{
        LIFECYCLE_TIMESTAMP_FORMAT, NoteMetadata, NoteStatus, TransitionCheck, TransitionRecord,
        fields, validate_transition,
    },
    ports::{NoteStore, NoteStoreError},
};
use camino::{Utf8Path, Utf8PathBuf};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for changing a note's status.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdateRequest {
    path: Utf8PathBuf,
    target_status: String,
    reason: String,
    metadata: NoteMetadata,
    dry_run: bool,
}

impl StatusUpdateRequest {
    /// Creates a request moving the note at `path` to `target_status`.
    #[must_use]
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        target_status: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            target_status: target_status.into(),
            reason: reason.into(),
            metadata: NoteMetadata::new(),
            dry_run: false,
        }
    }

    /// Sets extra metadata merged into the header alongside the status.
    #[must_use]
    pub fn with_metadata(mut self, metadata: NoteMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Validates and computes the update without writing it.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Returns the note path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// Reason a status update was not applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionFailure {
    /// The note does not exist.
    #[error("note not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The target status is unknown or the transition is not allowed.
    #[error("status transition rejected: {0}")]
    ValidationFailed(String),

    /// The store could not persist the update.
    #[error("status update could not be stored: {0}")]
    Storage(String),

    /// Another service is working on the note.
    #[error(transparent)]
    Busy(#[from] NoteBusyError),
}

/// Outcome of a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Whether the note on disk now carries the new status.
    pub status_updated: bool,
    /// Whether the transition passed validation.
    pub validation_passed: bool,
    /// Lifecycle timestamp stamped into the note.
    pub timestamp: Option<String>,
    /// The applied (or, for dry runs, computed) transition.
    pub record: Option<TransitionRecord>,
    /// Whether the update was computed without being written.
    pub dry_run: bool,
    /// Failure detail when the update was not applied.
    pub error: Option<TransitionFailure>,
}

impl TransitionResult {
    fn failed(error: TransitionFailure, validation_passed: bool, dry_run: bool) -> Self {
        Self {
            status_updated: false,
            validation_passed,
            timestamp: None,
            record: None,
            dry_run,
            error: Some(error),
        }
    }

    /// Returns whether the update was applied, or would be for a dry run.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Note lifecycle state machine bound to a note store.
#[derive(Clone)]
pub struct NoteLifecycleService<S, C>
where
    S: NoteStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    sessions: NoteSessionTable,
}

impl<S, C> NoteLifecycleService<S, C>
where
    S: NoteStore,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service with a private session table.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            sessions: NoteSessionTable::new(),
        }
    }

    /// Shares `sessions` with other services working on the same vault.
    #[must_use]
    pub fn with_sessions(mut self, sessions: NoteSessionTable) -> Self {
        self.sessions = sessions;
        self
    }

    /// Checks a raw `(from, to)` pair against the transition table.
    #[must_use]
    pub fn validate_transition(&self, from: &str, to: &str) -> TransitionCheck {
        validate_transition(from, to)
    }

    /// Applies a status change to a stored note.
    ///
    /// Supplied metadata is merged first; then `status` is set and exactly
    /// one lifecycle date field is stamped. Re-applying the current status
    /// overwrites that date field in place rather than adding a second one.
    /// Failures never mutate the note.
    ///
    /// The update holds the note's session for its duration, so it is refused
    /// with [`TransitionFailure::Busy`] while a pipeline run or promotion
    /// sharing the same session table is in flight.
    pub async fn update_status(&self, request: StatusUpdateRequest) -> TransitionResult {
        let _session = match self
            .sessions
            .begin(&request.path, SessionKind::StatusUpdate, &*self.clock)
        {
            Ok(guard) => guard,
            Err(busy) => return TransitionResult::failed(busy.into(), false, request.dry_run),
        };
        self.apply(request).await
    }

    /// Applies a status change for a caller that already holds the note's
    /// session.
    pub(crate) async fn apply(&self, request: StatusUpdateRequest) -> TransitionResult {
        let StatusUpdateRequest {
            path,
            target_status,
            reason,
            metadata,
            dry_run,
        } = request;

        let mut note = match self.store.load(&path).await {
            Ok(note) => note,
            Err(NoteStoreError::NotFound(missing)) => {
                return TransitionResult::failed(TransitionFailure::NotFound(missing), false, dry_run);
            }
            Err(err @ NoteStoreError::Malformed { .. }) => {
                return TransitionResult::failed(
                    TransitionFailure::ValidationFailed(err.to_string()),
                    false,
                    dry_run,
                );
            }
            Err(err) => {
                return TransitionResult::failed(
                    TransitionFailure::Storage(err.to_string()),
                    false,
                    dry_run,
                );
            }
        };

        let target = match NoteStatus::try_from(target_status.as_str()) {
            Ok(target) => target,
            Err(err) => {
                return TransitionResult::failed(
                    TransitionFailure::ValidationFailed(err.to_string()),
                    false,
                    dry_run,
                );
            }
        };
        let current = match note.metadata().status() {
            Ok(current) => current,
            Err(err) => {
                return TransitionResult::failed(
                    TransitionFailure::ValidationFailed(err.to_string()),
                    false,
                    dry_run,
                );
            }
        };
        if current != target {
            let check = validate_transition(current.as_str(), target.as_str());
            if !check.is_valid() {
                return TransitionResult::failed(
                    TransitionFailure::ValidationFailed(check.reason().to_owned()),
                    false,
                    dry_run,
                );
            }
        }

        let timestamp = self
            .clock
            .utc()
            .format(LIFECYCLE_TIMESTAMP_FORMAT)
            .to_string();
        let header = note.metadata_mut();
        header.merge(metadata);
        header.set(fields::STATUS, target.as_str());
        header.set(target.lifecycle_date_field(), timestamp.clone());

        let record = TransitionRecord {
            note: path.clone(),
            from: current,
            to: target,
            reason,
            timestamp: timestamp.clone(),
        };

        if !dry_run {
            if let Err(err) = self.store.save(&note).await {
                return TransitionResult::failed(
                    TransitionFailure::Storage(err.to_string()),
                    true,
                    dry_run,
                );
            }
            tracing::info!(
                note = %record.note,
                from = %record.from,
                to = %record.to,
                reason = %record.reason,
                timestamp = %record.timestamp,
                reapplied = record.is_reapplication(),
                "note status transition"
            );
        }

        TransitionResult {
            status_updated: !dry_run,
            validation_passed: true,
            timestamp: Some(timestamp),
            record: Some(record),
            dry_run,
            error: None,
        }
    }
}
