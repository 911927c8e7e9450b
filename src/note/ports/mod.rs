//! Port contracts for note storage and safety backups.
//!
//! Ports define infrastructure-agnostic interfaces used by note services.

pub mod backup;
pub mod store;

pub use backup::{BackupError, BackupReceipt, BackupResult, BackupScope, BackupService};
pub use store::{NoteStore, NoteStoreError, NoteStoreResult};
