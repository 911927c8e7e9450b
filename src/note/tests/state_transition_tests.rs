//! Unit tests for note status transition validation.

use crate::note::domain::{NoteStatus, fields, validate_transition};
use rstest::rstest;

#[rstest]
#[case(NoteStatus::Inbox, NoteStatus::Inbox, false)]
#[case(NoteStatus::Inbox, NoteStatus::Promoted, true)]
#[case(NoteStatus::Inbox, NoteStatus::Published, false)]
#[case(NoteStatus::Inbox, NoteStatus::Archived, true)]
#[case(NoteStatus::Promoted, NoteStatus::Inbox, false)]
#[case(NoteStatus::Promoted, NoteStatus::Promoted, false)]
#[case(NoteStatus::Promoted, NoteStatus::Published, true)]
#[case(NoteStatus::Promoted, NoteStatus::Archived, true)]
#[case(NoteStatus::Published, NoteStatus::Inbox, false)]
#[case(NoteStatus::Published, NoteStatus::Promoted, false)]
#[case(NoteStatus::Published, NoteStatus::Published, false)]
#[case(NoteStatus::Published, NoteStatus::Archived, true)]
#[case(NoteStatus::Archived, NoteStatus::Inbox, true)]
#[case(NoteStatus::Archived, NoteStatus::Promoted, false)]
#[case(NoteStatus::Archived, NoteStatus::Published, false)]
#[case(NoteStatus::Archived, NoteStatus::Archived, false)]
fn validate_transition_matches_table(
    #[case] from: NoteStatus,
    #[case] to: NoteStatus,
    #[case] expected: bool,
) {
    let check = validate_transition(from.as_str(), to.as_str());

    assert_eq!(check.is_valid(), expected);
    assert_eq!(from.can_transition_to(to), expected);
    assert_eq!(check.reason().is_empty(), expected);
}

#[rstest]
#[case("inbox", "draft")]
#[case("pending", "promoted")]
#[case("", "archived")]
fn unknown_status_values_are_rejected_with_reason(#[case] from: &str, #[case] to: &str) {
    let check = validate_transition(from, to);

    assert!(!check.is_valid());
    assert!(check.reason().contains("invalid"));
}

#[rstest]
fn status_parsing_is_case_and_whitespace_insensitive() {
    assert_eq!(NoteStatus::try_from(" Promoted "), Ok(NoteStatus::Promoted));
    assert!(NoteStatus::try_from("done").is_err());
}

#[rstest]
#[case(NoteStatus::Inbox, fields::REACTIVATED_DATE)]
#[case(NoteStatus::Promoted, fields::PROCESSED_DATE)]
#[case(NoteStatus::Published, fields::PUBLISHED_DATE)]
#[case(NoteStatus::Archived, fields::ARCHIVED_DATE)]
fn every_status_stamps_its_own_date_field(#[case] status: NoteStatus, #[case] field: &str) {
    assert_eq!(status.lifecycle_date_field(), field);
}
