//! Note record aggregate.

use super::NoteMetadata;
use camino::{Utf8Path, Utf8PathBuf};

/// A note document: a metadata header plus a free-text body.
///
/// The vault-relative path is the note's identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    path: Utf8PathBuf,
    metadata: NoteMetadata,
    body: String,
}

impl NoteRecord {
    /// Creates a note record.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, metadata: NoteMetadata, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            metadata,
            body: body.into(),
        }
    }

    /// Returns the vault-relative path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the file name component of the path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }

    /// Returns the metadata header.
    #[must_use]
    pub const fn metadata(&self) -> &NoteMetadata {
        &self.metadata
    }

    /// Returns the metadata header for in-place edits.
    pub const fn metadata_mut(&mut self) -> &mut NoteMetadata {
        &mut self.metadata
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns a copy of this note located at `path`.
    #[must_use]
    pub fn relocated(&self, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: self.metadata.clone(),
            body: self.body.clone(),
        }
    }
}
