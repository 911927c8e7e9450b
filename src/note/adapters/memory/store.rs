//! In-memory note store for lifecycle and workflow tests.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::note::{
    domain::NoteRecord,
    ports::{NoteStore, NoteStoreError, NoteStoreResult},
};

/// Thread-safe in-memory note store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteStore {
    state: Arc<RwLock<InMemoryNoteState>>,
}

#[derive(Debug, Default)]
struct InMemoryNoteState {
    notes: BTreeMap<Utf8PathBuf, NoteRecord>,
    write_count: usize,
}

impl InMemoryNoteStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `notes`.
    ///
    /// Seeding does not count towards [`Self::write_count`].
    #[must_use]
    pub fn with_notes(notes: impl IntoIterator<Item = NoteRecord>) -> Self {
        let state = InMemoryNoteState {
            notes: notes
                .into_iter()
                .map(|note| (note.path().to_path_buf(), note))
                .collect(),
            write_count: 0,
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns a stored note without going through the port.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError::Io`] when lock acquisition fails.
    pub fn snapshot(&self, path: &Utf8Path) -> NoteStoreResult<Option<NoteRecord>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.notes.get(path).cloned())
    }

    /// Returns how many mutating calls (`save`, `relocate`) succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError::Io`] when lock acquisition fails.
    pub fn write_count(&self) -> NoteStoreResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.write_count)
    }
}

fn lock_error<E: std::fmt::Display>(err: E) -> NoteStoreError {
    NoteStoreError::io(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn load(&self, path: &Utf8Path) -> NoteStoreResult<NoteRecord> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .notes
            .get(path)
            .cloned()
            .ok_or_else(|| NoteStoreError::NotFound(path.to_path_buf()))
    }

    async fn save(&self, note: &NoteRecord) -> NoteStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.notes.insert(note.path().to_path_buf(), note.clone());
        state.write_count += 1;
        Ok(())
    }

    async fn exists(&self, path: &Utf8Path) -> NoteStoreResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.notes.contains_key(path))
    }

    async fn relocate(&self, from: &Utf8Path, to: &Utf8Path) -> NoteStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.notes.contains_key(to) {
            return Err(NoteStoreError::AlreadyExists(to.to_path_buf()));
        }
        let note = state
            .notes
            .remove(from)
            .ok_or_else(|| NoteStoreError::NotFound(from.to_path_buf()))?;
        state.notes.insert(to.to_path_buf(), note.relocated(to));
        state.write_count += 1;
        Ok(())
    }

    async fn list(&self, directory: &Utf8Path) -> NoteStoreResult<Vec<Utf8PathBuf>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .notes
            .keys()
            .filter(|path| path.parent() == Some(directory))
            .cloned()
            .collect())
    }
}
