//! In-memory backup service recording every requested scope.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};

use crate::note::ports::{BackupError, BackupReceipt, BackupResult, BackupScope, BackupService};

/// Backup service that records scopes instead of copying files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackupService {
    state: Arc<RwLock<InMemoryBackupState>>,
}

#[derive(Debug, Default)]
struct InMemoryBackupState {
    scopes: Vec<BackupScope>,
    failure: Option<String>,
}

impl InMemoryBackupService {
    /// Creates a backup service that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backup service whose every call fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let state = InMemoryBackupState {
            scopes: Vec::new(),
            failure: Some(message.into()),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns every scope passed to `create_backup`, failed calls included.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Io`] when lock acquisition fails.
    pub fn recorded_scopes(&self) -> BackupResult<Vec<BackupScope>> {
        let state = self
            .state
            .read()
            .map_err(|err| BackupError::io(std::io::Error::other(err.to_string())))?;
        Ok(state.scopes.clone())
    }

    /// Returns how many backup calls were made.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Io`] when lock acquisition fails.
    pub fn call_count(&self) -> BackupResult<usize> {
        Ok(self.recorded_scopes()?.len())
    }
}

#[async_trait]
impl BackupService for InMemoryBackupService {
    async fn create_backup(&self, scope: &BackupScope) -> BackupResult<BackupReceipt> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BackupError::io(std::io::Error::other(err.to_string())))?;
        state.scopes.push(scope.clone());
        if let Some(message) = &state.failure {
            return Err(BackupError::io(std::io::Error::other(message.clone())));
        }
        let sequence = state.scopes.len();
        Ok(BackupReceipt {
            location: Utf8PathBuf::from(format!("memory-backups/{}-{sequence}", scope.label())),
            note_count: scope.notes().len(),
        })
    }
}
