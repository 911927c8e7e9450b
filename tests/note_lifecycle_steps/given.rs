//! Given steps for note lifecycle BDD scenarios.

use super::world::{NoteLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use zettelflow::note::{
    domain::{NoteMetadata, NoteRecord, fields},
    ports::NoteStore,
};

fn seed(world: &mut NoteLifecycleWorld, note: &NoteRecord) -> Result<(), eyre::Report> {
    run_async(world.store.save(note)).wrap_err("seed note for scenario")?;
    world.note_path = Some(note.path().to_path_buf());
    Ok(())
}

#[given(r#"an inbox note "{path}""#)]
fn inbox_note(world: &mut NoteLifecycleWorld, path: String) -> Result<(), eyre::Report> {
    let mut metadata = NoteMetadata::new();
    metadata.set("title", "Idea");
    metadata.set(fields::STATUS, "inbox");
    metadata.set(fields::TYPE, "fleeting");
    seed(world, &NoteRecord::new(path, metadata, "A passing thought."))
}

#[given(r#"a fleeting note "{path}" with quality {quality:f64}"#)]
fn fleeting_note(
    world: &mut NoteLifecycleWorld,
    path: String,
    quality: f64,
) -> Result<(), eyre::Report> {
    let mut metadata = NoteMetadata::new();
    metadata.set(fields::STATUS, "inbox");
    metadata.set(fields::TYPE, "fleeting");
    metadata.set(fields::QUALITY_SCORE, json!(quality));
    seed(world, &NoteRecord::new(path, metadata, "A developed thought."))
}
