//! Note lifecycle status and the closed transition table.

use super::{ParseNoteStatusError, fields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStatus {
    /// Note has been captured but not yet processed.
    Inbox,
    /// Note passed quality review and was promoted.
    Promoted,
    /// Note has been published.
    Published,
    /// Note has been retired from active use.
    Archived,
}

impl NoteStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Inbox, Self::Promoted, Self::Published, Self::Archived];

    /// Returns the canonical header representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Promoted => "promoted",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Returns whether transition to `target` is in the allowed table.
    ///
    /// Re-applying the current status is not a transition and is rejected
    /// here; callers that support idempotent re-application check for it
    /// first.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Inbox, Self::Promoted | Self::Archived)
                | (Self::Promoted, Self::Published)
                | (Self::Promoted | Self::Published, Self::Archived)
                | (Self::Archived, Self::Inbox)
        )
    }

    /// Returns the metadata field stamped when a note enters this status.
    #[must_use]
    pub const fn lifecycle_date_field(self) -> &'static str {
        match self {
            Self::Inbox => fields::REACTIVATED_DATE,
            Self::Promoted => fields::PROCESSED_DATE,
            Self::Published => fields::PUBLISHED_DATE,
            Self::Archived => fields::ARCHIVED_DATE,
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NoteStatus {
    type Error = ParseNoteStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "inbox" => Ok(Self::Inbox),
            "promoted" => Ok(Self::Promoted),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseNoteStatusError(value.to_owned())),
        }
    }
}

/// Outcome of checking a `(from, to)` pair against the transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCheck {
    valid: bool,
    reason: String,
}

impl TransitionCheck {
    /// Creates an accepting check with an empty reason.
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            valid: true,
            reason: String::new(),
        }
    }

    /// Creates a rejecting check with the given explanation.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
        }
    }

    /// Returns whether the transition is allowed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the rejection reason, empty when the transition is allowed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Validates a raw `(from, to)` status pair.
///
/// Unknown status strings on either side are rejected with an explanation.
#[must_use]
pub fn validate_transition(from: &str, to: &str) -> TransitionCheck {
    let source = match NoteStatus::try_from(from) {
        Ok(status) => status,
        Err(err) => return TransitionCheck::rejected(format!("invalid source status: {err}")),
    };
    let target = match NoteStatus::try_from(to) {
        Ok(status) => status,
        Err(err) => return TransitionCheck::rejected(format!("invalid target status: {err}")),
    };
    if source.can_transition_to(target) {
        TransitionCheck::allowed()
    } else {
        TransitionCheck::rejected(format!(
            "transition from '{source}' to '{target}' is not allowed"
        ))
    }
}
