//! Explicit table of in-flight note sessions.
//!
//! A session is created when a service starts working on a note and evicted
//! when its guard drops. Holding a session is the per-note lock: a second
//! session for the same path is refused until the first one ends.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use uuid::Uuid;

/// Kind of work holding a note session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// A workflow pipeline run.
    Processing,
    /// A promotion (relocation) of the note.
    Promotion,
    /// A standalone status change.
    StatusUpdate,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Processing => "processing",
            Self::Promotion => "promotion",
            Self::StatusUpdate => "status_update",
        })
    }
}

/// Details of an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    /// Session identifier.
    pub id: Uuid,
    /// Work being performed.
    pub kind: SessionKind,
    /// Session start time.
    pub started_at: DateTime<Utc>,
}

/// Error returned when a note already has an active session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("note {path} is busy with {held_by}")]
pub struct NoteBusyError {
    /// Contended note.
    pub path: Utf8PathBuf,
    /// Kind of the session holding the note.
    pub held_by: SessionKind,
}

/// Shared table of active sessions keyed by note path.
#[derive(Debug, Clone, Default)]
pub struct NoteSessionTable {
    sessions: Arc<Mutex<HashMap<Utf8PathBuf, SessionInfo>>>,
}

impl NoteSessionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned table still holds consistent entries: every mutation is a
    // single insert or remove.
    fn entries(&self) -> MutexGuard<'_, HashMap<Utf8PathBuf, SessionInfo>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a session for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteBusyError`] when the note already has an active session.
    pub fn begin(
        &self,
        path: &Utf8Path,
        kind: SessionKind,
        clock: &impl Clock,
    ) -> Result<NoteSessionGuard, NoteBusyError> {
        let mut entries = self.entries();
        if let Some(existing) = entries.get(path) {
            return Err(NoteBusyError {
                path: path.to_path_buf(),
                held_by: existing.kind,
            });
        }
        let info = SessionInfo {
            id: Uuid::new_v4(),
            kind,
            started_at: clock.utc(),
        };
        entries.insert(path.to_path_buf(), info);
        Ok(NoteSessionGuard {
            table: self.clone(),
            path: path.to_path_buf(),
            id: info.id,
        })
    }

    /// Returns whether `path` has an active session.
    #[must_use]
    pub fn is_active(&self, path: &Utf8Path) -> bool {
        self.entries().contains_key(path)
    }

    /// Returns a snapshot of all active sessions.
    #[must_use]
    pub fn active(&self) -> Vec<(Utf8PathBuf, SessionInfo)> {
        let mut sessions: Vec<_> = self
            .entries()
            .iter()
            .map(|(path, info)| (path.clone(), *info))
            .collect();
        sessions.sort_by(|left, right| left.0.cmp(&right.0));
        sessions
    }

    fn end(&self, path: &Utf8Path, id: Uuid) {
        let mut entries = self.entries();
        if entries.get(path).is_some_and(|info| info.id == id) {
            entries.remove(path);
        }
    }
}

/// Guard evicting its session from the table on drop.
#[derive(Debug)]
pub struct NoteSessionGuard {
    table: NoteSessionTable,
    path: Utf8PathBuf,
    id: Uuid,
}

impl NoteSessionGuard {
    /// Returns the guarded note path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for NoteSessionGuard {
    fn drop(&mut self) {
        self.table.end(&self.path, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::DefaultClock;
    use rstest::rstest;

    #[rstest]
    fn second_session_for_same_note_is_refused() {
        let table = NoteSessionTable::new();
        let path = Utf8Path::new("Inbox/a.md");
        let _guard = table
            .begin(path, SessionKind::Processing, &DefaultClock)
            .expect("first session opens");

        let second = table.begin(path, SessionKind::Promotion, &DefaultClock);

        assert_eq!(
            second.map(|guard| guard.path().to_path_buf()),
            Err(NoteBusyError {
                path: path.to_path_buf(),
                held_by: SessionKind::Processing,
            })
        );
    }

    #[rstest]
    fn dropping_the_guard_evicts_the_session() {
        let table = NoteSessionTable::new();
        let path = Utf8Path::new("Inbox/a.md");
        {
            let _guard = table
                .begin(path, SessionKind::Processing, &DefaultClock)
                .expect("session opens");
            assert!(table.is_active(path));
        }
        assert!(!table.is_active(path));
        assert!(table.active().is_empty());
    }

    #[rstest]
    fn sessions_for_different_notes_coexist() {
        let table = NoteSessionTable::new();
        let _first = table
            .begin(Utf8Path::new("a.md"), SessionKind::Processing, &DefaultClock)
            .expect("first opens");
        let _second = table
            .begin(Utf8Path::new("b.md"), SessionKind::Promotion, &DefaultClock)
            .expect("second opens");

        let active = table.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active.first().map(|entry| entry.1.kind), Some(SessionKind::Processing));
    }
}
