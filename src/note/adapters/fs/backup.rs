//! Filesystem backup service writing a digest manifest per backup.

use super::run_blocking;
use crate::note::ports::{BackupError, BackupReceipt, BackupResult, BackupScope, BackupService};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use mockable::Clock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

const MANIFEST_FILE: &str = "MANIFEST.json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Copies notes into a timestamped directory under the vault's backup root.
pub struct FsBackupService<C>
where
    C: Clock + Send + Sync,
{
    root: Arc<Dir>,
    backup_dir: Utf8PathBuf,
    clock: Arc<C>,
}

#[derive(Debug, Serialize)]
struct BackupManifest {
    label: String,
    created_at: String,
    entries: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    path: Utf8PathBuf,
    bytes: usize,
    sha256: String,
}

impl<C> FsBackupService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a backup service writing beneath `backup_dir` of `root`.
    #[must_use]
    pub fn new(root: Arc<Dir>, backup_dir: impl Into<Utf8PathBuf>, clock: Arc<C>) -> Self {
        Self {
            root,
            backup_dir: backup_dir.into(),
            clock,
        }
    }
}

fn unique_location(root: &Dir, backup_dir: &Utf8Path, label: &str, stamp: &str) -> Utf8PathBuf {
    let base = backup_dir.join(format!("{label}-{stamp}"));
    if !root.exists(&base) {
        return base;
    }
    (1_usize..)
        .map(|suffix| backup_dir.join(format!("{label}-{stamp}-{suffix}")))
        .find(|candidate| !root.exists(candidate))
        .unwrap_or(base)
}

fn copy_note(root: &Dir, note: &Utf8Path, location: &Utf8Path) -> BackupResult<ManifestEntry> {
    if !root.exists(note) {
        return Err(BackupError::MissingNote(note.to_path_buf()));
    }
    let contents = root.read(note).map_err(BackupError::io)?;
    let target = location.join(note);
    if let Some(parent) = target.parent() {
        root.create_dir_all(parent).map_err(BackupError::io)?;
    }
    root.write(&target, &contents).map_err(BackupError::io)?;
    Ok(ManifestEntry {
        path: note.to_path_buf(),
        bytes: contents.len(),
        sha256: format!("{:x}", Sha256::digest(&contents)),
    })
}

fn write_backup(
    root: &Dir,
    backup_dir: &Utf8Path,
    scope: &BackupScope,
    stamp: &str,
    created_at: String,
) -> BackupResult<BackupReceipt> {
    let location = unique_location(root, backup_dir, scope.label(), stamp);
    root.create_dir_all(&location).map_err(BackupError::io)?;

    let entries = scope
        .notes()
        .iter()
        .map(|note| copy_note(root, note, &location))
        .collect::<BackupResult<Vec<_>>>()?;
    let note_count = entries.len();

    let manifest = BackupManifest {
        label: scope.label().to_owned(),
        created_at,
        entries,
    };
    let encoded = serde_json::to_vec_pretty(&manifest).map_err(BackupError::io)?;
    root.write(location.join(MANIFEST_FILE), encoded)
        .map_err(BackupError::io)?;
    Ok(BackupReceipt {
        location,
        note_count,
    })
}

#[async_trait]
impl<C> BackupService for FsBackupService<C>
where
    C: Clock + Send + Sync,
{
    async fn create_backup(&self, scope: &BackupScope) -> BackupResult<BackupReceipt> {
        let now = self.clock.utc();
        let stamp = now.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let root = Arc::clone(&self.root);
        let backup_dir = self.backup_dir.clone();
        let owned_scope = scope.clone();
        let receipt = run_blocking(
            move || write_backup(&root, &backup_dir, &owned_scope, &stamp, now.to_rfc3339()),
            BackupError::io,
        )
        .await?;

        tracing::info!(
            backup = %receipt.location,
            notes = receipt.note_count,
            "created note backup"
        );
        Ok(receipt)
    }
}
