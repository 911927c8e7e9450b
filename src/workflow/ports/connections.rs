//! Connection discovery port.

use crate::note::domain::NoteRecord;
use crate::workflow::domain::Connection;
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by connection discoverers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("connection discovery failed: {0}")]
pub struct DiscoveryError(pub String);

/// Finds notes related to a given note.
#[async_trait]
pub trait ConnectionDiscoverer: Send + Sync {
    /// Returns connections for `note`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the index cannot be queried.
    async fn discover(&self, note: &NoteRecord) -> Result<Vec<Connection>, DiscoveryError>;
}
