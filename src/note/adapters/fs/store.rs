//! Filesystem note store scoped to a vault directory capability.
//!
//! File access is synchronous `cap-std` I/O run on the blocking thread pool.

use super::{frontmatter, run_blocking};
use crate::note::{
    domain::NoteRecord,
    ports::{NoteStore, NoteStoreError, NoteStoreResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

const NOTE_EXTENSION: &str = "md";

/// Note store reading and writing Markdown files beneath a vault root.
///
/// Every path handed to the store is resolved relative to the root
/// capability, so no operation can escape the vault.
#[derive(Debug, Clone)]
pub struct FsNoteStore {
    root: Arc<Dir>,
}

impl FsNoteStore {
    /// Opens the vault rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteStoreError::Io`] when the directory cannot be opened.
    pub fn open(root: &Utf8Path) -> NoteStoreResult<Self> {
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(NoteStoreError::io)?;
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already-open vault directory.
    #[must_use]
    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Returns the vault directory capability for sibling adapters.
    #[must_use]
    pub fn root_dir(&self) -> Arc<Dir> {
        Arc::clone(&self.root)
    }
}

fn staging_path(path: &Utf8Path) -> Utf8PathBuf {
    let name = path.file_name().unwrap_or("note");
    path.with_file_name(format!(".{name}.tmp"))
}

fn ensure_parent(root: &Dir, path: &Utf8Path) -> NoteStoreResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            root.create_dir_all(parent).map_err(NoteStoreError::io)
        }
        _ => Ok(()),
    }
}

fn load_note(root: &Dir, path: &Utf8Path) -> NoteStoreResult<NoteRecord> {
    let text = match root.read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(NoteStoreError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(NoteStoreError::io(err)),
    };
    let (metadata, body) = frontmatter::decode(path, &text)?;
    Ok(NoteRecord::new(path, metadata, body))
}

fn write_note(root: &Dir, path: &Utf8Path, rendered: &str) -> NoteStoreResult<()> {
    ensure_parent(root, path)?;
    let staging = staging_path(path);
    root.write(&staging, rendered.as_bytes())
        .map_err(NoteStoreError::io)?;
    root.rename(&staging, root, path).map_err(NoteStoreError::io)
}

fn move_note(root: &Dir, from: &Utf8Path, to: &Utf8Path) -> NoteStoreResult<()> {
    if !root.exists(from) {
        return Err(NoteStoreError::NotFound(from.to_path_buf()));
    }
    if root.exists(to) {
        return Err(NoteStoreError::AlreadyExists(to.to_path_buf()));
    }
    ensure_parent(root, to)?;
    root.rename(from, root, to).map_err(NoteStoreError::io)
}

fn list_notes(root: &Dir, directory: &Utf8Path) -> NoteStoreResult<Vec<Utf8PathBuf>> {
    let scan_root = if directory.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        directory
    };
    if !root.exists(scan_root) {
        return Ok(Vec::new());
    }

    let mut notes = Vec::new();
    for entry_result in root.read_dir(scan_root).map_err(NoteStoreError::io)? {
        let entry = entry_result.map_err(NoteStoreError::io)?;
        if !entry.file_type().map_err(NoteStoreError::io)?.is_file() {
            continue;
        }
        let name = entry.file_name().map_err(NoteStoreError::io)?;
        let candidate = directory.join(&name);
        if name.starts_with('.') || candidate.extension() != Some(NOTE_EXTENSION) {
            continue;
        }
        notes.push(candidate);
    }
    notes.sort();
    Ok(notes)
}

#[async_trait]
impl NoteStore for FsNoteStore {
    async fn load(&self, path: &Utf8Path) -> NoteStoreResult<NoteRecord> {
        let root = self.root_dir();
        let target = path.to_path_buf();
        run_blocking(move || load_note(&root, &target), NoteStoreError::io).await
    }

    async fn save(&self, note: &NoteRecord) -> NoteStoreResult<()> {
        let rendered = frontmatter::encode(note.path(), note.metadata(), note.body())?;
        let root = self.root_dir();
        let target = note.path().to_path_buf();
        run_blocking(
            move || write_note(&root, &target, &rendered),
            NoteStoreError::io,
        )
        .await
    }

    async fn exists(&self, path: &Utf8Path) -> NoteStoreResult<bool> {
        let root = self.root_dir();
        let target = path.to_path_buf();
        run_blocking(move || Ok(root.exists(&target)), NoteStoreError::io).await
    }

    async fn relocate(&self, from: &Utf8Path, to: &Utf8Path) -> NoteStoreResult<()> {
        let root = self.root_dir();
        let (source, destination) = (from.to_path_buf(), to.to_path_buf());
        run_blocking(
            move || move_note(&root, &source, &destination),
            NoteStoreError::io,
        )
        .await
    }

    async fn list(&self, directory: &Utf8Path) -> NoteStoreResult<Vec<Utf8PathBuf>> {
        let root = self.root_dir();
        let target = directory.to_path_buf();
        run_blocking(move || list_notes(&root, &target), NoteStoreError::io).await
    }
}
