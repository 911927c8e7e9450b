//! Note metadata header model.
//!
//! The header is kept as an insertion-ordered map so that fields this crate
//! does not own survive every rewrite untouched and in their original order.

use super::{NoteDomainError, NoteStatus, NoteType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata keys read or written by the workflow core.
pub mod fields {
    /// Lifecycle status.
    pub const STATUS: &str = "status";
    /// Note type.
    pub const TYPE: &str = "type";
    /// Automatically computed quality signal.
    pub const QUALITY_SCORE: &str = "quality_score";
    /// Tag list.
    pub const TAGS: &str = "tags";
    /// Creation timestamp written at intake.
    pub const CREATED: &str = "created";
    /// Stamped when a note is promoted.
    pub const PROCESSED_DATE: &str = "processed_date";
    /// Stamped by the promotion engine when a note changes type.
    pub const PROMOTED_DATE: &str = "promoted_date";
    /// Stamped when a note is published.
    pub const PUBLISHED_DATE: &str = "published_date";
    /// Stamped when a note is archived.
    pub const ARCHIVED_DATE: &str = "archived_date";
    /// Stamped when an archived note returns to the inbox.
    pub const REACTIVATED_DATE: &str = "reactivated_date";
    /// Triage recommendation derived from quality assessment.
    pub const TRIAGE_RECOMMENDATION: &str = "triage_recommendation";
    /// Wiki-links proposed by connection discovery.
    pub const SUGGESTED_LINKS: &str = "suggested_links";
    /// Summary produced by AI enrichment.
    pub const AI_SUMMARY: &str = "ai_summary";
}

/// Ordered metadata header of a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteMetadata(Map<String, Value>);

impl NoteMetadata {
    /// Creates an empty header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing ordered map.
    #[must_use]
    pub const fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the underlying ordered map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the header and returns the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the header has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a field as a string slice when it holds a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns whether a field is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets a field.
    ///
    /// An existing field keeps its position and has its value replaced; a new
    /// field is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Overlays every field of `other` onto this header.
    pub fn merge(&mut self, other: Self) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Returns the lifecycle status, reading a missing field as `inbox`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDomainError`] when the field is not a string or names an
    /// unknown status.
    pub fn status(&self) -> Result<NoteStatus, NoteDomainError> {
        match self.0.get(fields::STATUS) {
            None | Some(Value::Null) => Ok(NoteStatus::Inbox),
            Some(Value::String(raw)) => Ok(NoteStatus::try_from(raw.as_str())?),
            Some(other) => Err(malformed(fields::STATUS, other)),
        }
    }

    /// Returns the note type, or `None` when the field is absent.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDomainError`] when the field is not a string or names an
    /// unknown type.
    pub fn note_type(&self) -> Result<Option<NoteType>, NoteDomainError> {
        match self.0.get(fields::TYPE) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => Ok(Some(NoteType::try_from(raw.as_str())?)),
            Some(other) => Err(malformed(fields::TYPE, other)),
        }
    }

    /// Returns the quality score, or `None` when the field is absent.
    ///
    /// Numeric strings are accepted because hand-edited headers often quote
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`NoteDomainError`] when the value is not numeric or lies
    /// outside `0.0..=1.0`.
    pub fn quality_score(&self) -> Result<Option<f64>, NoteDomainError> {
        let score = match self.0.get(fields::QUALITY_SCORE) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        let Some(value) = score else {
            return Err(NoteDomainError::MalformedField {
                field: fields::QUALITY_SCORE.to_owned(),
                reason: "expected a number".to_owned(),
            });
        };
        if !(0.0..=1.0).contains(&value) {
            return Err(NoteDomainError::QualityScoreOutOfRange(value));
        }
        Ok(Some(value))
    }

    /// Returns the tag list.
    ///
    /// Accepts either a sequence of strings or a single comma-separated
    /// string; anything else yields an empty list.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self.0.get(fields::TAGS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_owned)
                .collect(),
            Some(Value::String(raw)) => raw
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for NoteMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn malformed(field: &str, value: &Value) -> NoteDomainError {
    NoteDomainError::MalformedField {
        field: field.to_owned(),
        reason: format!("expected a string, found {value}"),
    }
}
