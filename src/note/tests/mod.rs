//! Unit tests for the note lifecycle context.

mod state_transition_tests;

use crate::note::domain::{NoteMetadata, NoteRecord};
use serde_json::Value;

/// Builds a note whose header holds `header` in order.
pub(crate) fn note_with(path: &str, header: &[(&str, Value)], body: &str) -> NoteRecord {
    let mut metadata = NoteMetadata::new();
    for (key, value) in header {
        metadata.set(*key, value.clone());
    }
    NoteRecord::new(path, metadata, body)
}
