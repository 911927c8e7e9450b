//! When steps for note lifecycle BDD scenarios.

use super::world::{NoteLifecycleWorld, run_async};
use rstest_bdd_macros::when;
use zettelflow::note::{
    domain::NoteType,
    services::{PromotionRequest, StatusUpdateRequest},
};

#[when(r#"the note status is set to "{status}""#)]
fn set_status(world: &mut NoteLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let path = world.note_path()?;
    let result = run_async(world.lifecycle.update_status(StatusUpdateRequest::new(
        path,
        status,
        "scenario step",
    )));
    world.last_transition = Some(result);
    Ok(())
}

#[when(r#"the note is promoted to "{note_type}""#)]
fn promote(world: &mut NoteLifecycleWorld, note_type: String) -> Result<(), eyre::Report> {
    let target = NoteType::try_from(note_type.as_str())
        .map_err(|err| eyre::eyre!("invalid note type in scenario: {err}"))?;
    let path = world.note_path()?;
    let result = run_async(
        world
            .promotion
            .promote_note(PromotionRequest::new(path, target)),
    );
    if let Some(destination) = &result.destination {
        world.note_path = Some(destination.clone());
    }
    world.last_promotion = Some(result);
    Ok(())
}
