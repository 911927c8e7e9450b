//! Filesystem adapters backed by a `cap-std` vault directory.

mod backup;
mod blocking;
mod frontmatter;
mod store;

pub use backup::FsBackupService;
pub(crate) use blocking::run_blocking;
pub use store::FsNoteStore;
