//! Then steps for note lifecycle BDD scenarios.

use super::world::NoteLifecycleWorld;
use camino::Utf8Path;
use rstest_bdd_macros::then;
use zettelflow::note::{
    domain::{NoteRecord, NoteStatus},
    services::{PromotionResult, TransitionFailure, TransitionResult},
};

fn stored_note(world: &NoteLifecycleWorld) -> Result<NoteRecord, eyre::Report> {
    let path = world.note_path()?;
    world
        .store
        .snapshot(&path)?
        .ok_or_else(|| eyre::eyre!("no note stored at {path}"))
}

fn last_transition(world: &NoteLifecycleWorld) -> Result<&TransitionResult, eyre::Report> {
    world
        .last_transition
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))
}

fn last_promotion(world: &NoteLifecycleWorld) -> Result<&PromotionResult, eyre::Report> {
    world
        .last_promotion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing promotion result"))
}

#[then("the status update succeeds")]
fn status_update_succeeds(world: &NoteLifecycleWorld) -> Result<(), eyre::Report> {
    let result = last_transition(world)?;
    if !result.is_success() || !result.status_updated {
        return Err(eyre::eyre!("expected a successful update, got {result:?}"));
    }
    Ok(())
}

#[then("the status update is rejected")]
fn status_update_rejected(world: &NoteLifecycleWorld) -> Result<(), eyre::Report> {
    let result = last_transition(world)?;
    if !matches!(result.error, Some(TransitionFailure::ValidationFailed(_))) {
        return Err(eyre::eyre!("expected ValidationFailed, got {result:?}"));
    }
    if result.status_updated {
        return Err(eyre::eyre!("rejected update must not be applied"));
    }
    Ok(())
}

fn check_status(world: &NoteLifecycleWorld, status: &str) -> Result<(), eyre::Report> {
    let expected = NoteStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = stored_note(world)?.metadata().status()?;
    if actual != expected {
        return Err(eyre::eyre!("expected status {expected}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the note status is "{status}""#)]
fn note_status_is(world: &NoteLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    check_status(world, &status)
}

#[then(r#"the note header has a "{field}" field"#)]
fn header_has_field(world: &NoteLifecycleWorld, field: String) -> Result<(), eyre::Report> {
    if !stored_note(world)?.metadata().contains(&field) {
        return Err(eyre::eyre!("header has no {field} field"));
    }
    Ok(())
}

#[then("the note header has {count:u64} fields")]
fn header_has_count(world: &NoteLifecycleWorld, count: u64) -> Result<(), eyre::Report> {
    let actual = stored_note(world)?.metadata().len();
    if u64::try_from(actual)? != count {
        return Err(eyre::eyre!("expected {count} header fields, found {actual}"));
    }
    Ok(())
}

#[then("the promotion succeeds")]
fn promotion_succeeds(world: &NoteLifecycleWorld) -> Result<(), eyre::Report> {
    let result = last_promotion(world)?;
    if !result.success {
        return Err(eyre::eyre!("expected promotion to succeed, got {result:?}"));
    }
    Ok(())
}

#[then("the promotion fails")]
fn promotion_fails(world: &NoteLifecycleWorld) -> Result<(), eyre::Report> {
    let result = last_promotion(world)?;
    if result.success || result.error.is_none() {
        return Err(eyre::eyre!("expected promotion to fail, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the note now lives at "{path}" with status "{status}""#)]
fn note_lives_at(
    world: &NoteLifecycleWorld,
    path: String,
    status: String,
) -> Result<(), eyre::Report> {
    let result = last_promotion(world)?;
    if result.destination.as_deref() != Some(Utf8Path::new(&path)) {
        return Err(eyre::eyre!(
            "expected destination {path}, got {:?}",
            result.destination
        ));
    }
    check_status(world, &status)
}

#[then("exactly one backup was taken")]
fn one_backup(world: &NoteLifecycleWorld) -> Result<(), eyre::Report> {
    let calls = world.backups.call_count()?;
    if calls != 1 {
        return Err(eyre::eyre!("expected one backup, found {calls}"));
    }
    Ok(())
}

#[then("no backup was taken")]
fn no_backup(world: &NoteLifecycleWorld) -> Result<(), eyre::Report> {
    let calls = world.backups.call_count()?;
    if calls != 0 {
        return Err(eyre::eyre!("expected no backups, found {calls}"));
    }
    Ok(())
}
