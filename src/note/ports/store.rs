//! Storage port for note documents.

use crate::note::domain::NoteRecord;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Result type for note store operations.
pub type NoteStoreResult<T> = Result<T, NoteStoreError>;

/// Note persistence contract.
///
/// Paths are vault-relative.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Loads a note.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError::NotFound`] when no note exists at `path` and
    /// [`NoteStoreError::Malformed`] when its header cannot be decoded.
    async fn load(&self, path: &Utf8Path) -> NoteStoreResult<NoteRecord>;

    /// Writes a note, replacing any existing document at its path.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError::Io`] when the write fails.
    async fn save(&self, note: &NoteRecord) -> NoteStoreResult<()>;

    /// Returns whether a note exists at `path`.
    async fn exists(&self, path: &Utf8Path) -> NoteStoreResult<bool>;

    /// Moves a note, creating the destination directory when needed.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError::NotFound`] when the source is missing and
    /// [`NoteStoreError::AlreadyExists`] when the destination is occupied.
    async fn relocate(&self, from: &Utf8Path, to: &Utf8Path) -> NoteStoreResult<()>;

    /// Lists the notes directly inside `directory`, sorted by path.
    ///
    /// A missing directory yields an empty list.
    async fn list(&self, directory: &Utf8Path) -> NoteStoreResult<Vec<Utf8PathBuf>>;
}

/// Errors returned by note store implementations.
#[derive(Debug, Clone, Error)]
pub enum NoteStoreError {
    /// No note exists at the path.
    #[error("note not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The destination of a move is already occupied.
    #[error("note already exists: {0}")]
    AlreadyExists(Utf8PathBuf),

    /// The note header could not be decoded.
    #[error("malformed note {path}: {reason}")]
    Malformed {
        /// Note path.
        path: Utf8PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Filesystem or lock failure.
    #[error("note store I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl NoteStoreError {
    /// Wraps an infrastructure error.
    #[must_use]
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
