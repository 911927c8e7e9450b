//! Behaviour tests for note status transitions and promotion.

#[path = "note_lifecycle_steps/mod.rs"]
mod note_lifecycle_steps_defs;

use note_lifecycle_steps_defs::world::{NoteLifecycleWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Promote an inbox note"
)]
#[tokio::test(flavor = "multi_thread")]
async fn promote_inbox_note(world: NoteLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Reject publishing an inbox note"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_publishing_inbox_note(world: NoteLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Reject an unknown status"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_unknown_status(world: NoteLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Re-applying a status keeps a single date field"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reapplying_status_keeps_single_date(world: NoteLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Reactivate an archived note"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reactivate_archived_note(world: NoteLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Promote a qualifying fleeting note"
)]
#[tokio::test(flavor = "multi_thread")]
async fn promote_qualifying_fleeting_note(world: NoteLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/note_lifecycle.feature",
    name = "Refuse promotion below the threshold"
)]
#[tokio::test(flavor = "multi_thread")]
async fn refuse_promotion_below_threshold(world: NoteLifecycleWorld) {
    let _ = world;
}
