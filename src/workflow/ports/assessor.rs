//! Quality assessment port.

use crate::note::domain::NoteRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Cheap quality signal computed for a note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityAssessment {
    /// Quality score in `0.0..=1.0`, when the assessor produced one.
    pub quality_score: Option<f64>,
    /// Assessor-provided triage recommendation.
    pub triage_recommendation: Option<String>,
    /// Word count of the body, when measured.
    pub word_count: Option<usize>,
}

impl QualityAssessment {
    /// Creates an assessment carrying only a score.
    #[must_use]
    pub const fn scored(quality_score: f64) -> Self {
        Self {
            quality_score: Some(quality_score),
            triage_recommendation: None,
            word_count: None,
        }
    }
}

/// Errors returned by quality assessors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssessmentError {
    /// The note content is malformed.
    #[error("assessment rejected the note: {0}")]
    Validation(String),

    /// The note could not be found.
    #[error("note to assess was not found: {0}")]
    NotFound(String),

    /// The assessor failed for another reason.
    #[error("assessment failed: {0}")]
    Failed(String),
}

/// Computes the quality signal for a note.
#[async_trait]
pub trait QualityAssessor: Send + Sync {
    /// Assesses `note`.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::Validation`] or [`AssessmentError::NotFound`]
    /// for conditions that stop processing, and [`AssessmentError::Failed`]
    /// for anything else.
    async fn assess(&self, note: &NoteRecord) -> Result<QualityAssessment, AssessmentError>;
}
