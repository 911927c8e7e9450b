//! Records describing applied status changes.

use super::NoteStatus;
use camino::Utf8PathBuf;
use serde::Serialize;

/// Format used for lifecycle date fields (minute resolution).
pub const LIFECYCLE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One applied status change, emitted to the log at each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    /// Note whose status changed.
    pub note: Utf8PathBuf,
    /// Status before the change.
    pub from: NoteStatus,
    /// Status after the change.
    pub to: NoteStatus,
    /// Caller-supplied reason.
    pub reason: String,
    /// Minute-resolution timestamp stamped into the note.
    pub timestamp: String,
}

impl TransitionRecord {
    /// Returns whether this record re-applied the current status.
    #[must_use]
    pub fn is_reapplication(&self) -> bool {
        self.from == self.to
    }
}
