//! Backup port guarding destructive note operations.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Result type for backup operations.
pub type BackupResult<T> = Result<T, BackupError>;

/// Set of notes a single backup must capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupScope {
    label: String,
    notes: Vec<Utf8PathBuf>,
}

impl BackupScope {
    /// Creates a scope covering `notes`.
    #[must_use]
    pub fn new(label: impl Into<String>, notes: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        Self {
            label: label.into(),
            notes: notes.into_iter().collect(),
        }
    }

    /// Creates a scope covering one note.
    #[must_use]
    pub fn single(label: impl Into<String>, note: &Utf8Path) -> Self {
        Self::new(label, [note.to_path_buf()])
    }

    /// Returns the label used to name the backup.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the notes in scope.
    #[must_use]
    pub fn notes(&self) -> &[Utf8PathBuf] {
        &self.notes
    }
}

/// Proof that a backup exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReceipt {
    /// Vault-relative location of the backup.
    pub location: Utf8PathBuf,
    /// Number of notes captured.
    pub note_count: usize,
}

/// Backup contract.
#[async_trait]
pub trait BackupService: Send + Sync {
    /// Captures every note in `scope`.
    ///
    /// A receipt is only returned once the backup is durable.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] when any note cannot be captured.
    async fn create_backup(&self, scope: &BackupScope) -> BackupResult<BackupReceipt>;
}

/// Errors returned by backup implementations.
#[derive(Debug, Clone, Error)]
pub enum BackupError {
    /// A note in scope does not exist.
    #[error("cannot back up missing note: {0}")]
    MissingNote(Utf8PathBuf),

    /// Filesystem or lock failure.
    #[error("backup I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl BackupError {
    /// Wraps an infrastructure error.
    #[must_use]
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
