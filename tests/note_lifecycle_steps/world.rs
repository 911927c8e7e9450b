//! Shared world state for note lifecycle BDD scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use mockable::DefaultClock;
use rstest::fixture;
use zettelflow::config::VaultLayout;
use zettelflow::note::{
    adapters::memory::{InMemoryBackupService, InMemoryNoteStore},
    services::{NoteLifecycleService, PromotionEngine, PromotionResult, TransitionResult},
};

/// Lifecycle service type used by the BDD world.
pub type TestLifecycleService = NoteLifecycleService<InMemoryNoteStore, DefaultClock>;

/// Promotion engine type used by the BDD world.
pub type TestPromotionEngine =
    PromotionEngine<InMemoryNoteStore, InMemoryBackupService, DefaultClock>;

/// Scenario world for note lifecycle behaviour tests.
pub struct NoteLifecycleWorld {
    pub store: InMemoryNoteStore,
    pub backups: InMemoryBackupService,
    pub lifecycle: TestLifecycleService,
    pub promotion: TestPromotionEngine,
    pub note_path: Option<Utf8PathBuf>,
    pub last_transition: Option<TransitionResult>,
    pub last_promotion: Option<PromotionResult>,
}

impl NoteLifecycleWorld {
    /// Creates a world over an empty vault.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryNoteStore::new();
        let backups = InMemoryBackupService::new();
        let clock = Arc::new(DefaultClock);
        let lifecycle = NoteLifecycleService::new(Arc::new(store.clone()), Arc::clone(&clock));
        let promotion = PromotionEngine::new(
            Arc::new(store.clone()),
            Arc::new(backups.clone()),
            clock,
            VaultLayout::default(),
        );

        Self {
            store,
            backups,
            lifecycle,
            promotion,
            note_path: None,
            last_transition: None,
            last_promotion: None,
        }
    }

    /// Returns the path of the note under test.
    pub fn note_path(&self) -> Result<Utf8PathBuf, eyre::Report> {
        self.note_path
            .clone()
            .ok_or_else(|| eyre::eyre!("missing note path in scenario world"))
    }
}

impl Default for NoteLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> NoteLifecycleWorld {
    NoteLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
