//! Note type classification.

use super::ParseNoteTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of knowledge-base entry a note represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    /// Quick capture awaiting development.
    Fleeting,
    /// Developed, self-contained idea.
    Permanent,
    /// Notes taken on an external source.
    Literature,
}

impl NoteType {
    /// Returns the canonical header representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fleeting => "fleeting",
            Self::Permanent => "permanent",
            Self::Literature => "literature",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NoteType {
    type Error = ParseNoteTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "fleeting" => Ok(Self::Fleeting),
            "permanent" => Ok(Self::Permanent),
            "literature" => Ok(Self::Literature),
            _ => Err(ParseNoteTypeError(value.to_owned())),
        }
    }
}
