//! In-memory adapters for note storage and backups.

mod backup;
mod store;

pub use backup::InMemoryBackupService;
pub use store::InMemoryNoteStore;
