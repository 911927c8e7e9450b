//! Unit tests for the workflow context.

mod enhancement_tests;

use crate::note::domain::{NoteRecord, fields};
use crate::note::tests::note_with;
use crate::workflow::ports::{
    AssessmentError, EnrichmentClient, EnrichmentError, EnrichmentPayload, QualityAssessment,
    QualityAssessor,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Enrichment client replaying one scripted response.
#[derive(Debug)]
pub(crate) struct ScriptedClient {
    response: Result<EnrichmentPayload, EnrichmentError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub(crate) fn answering(tags: &[&str], summary: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(EnrichmentPayload {
                tags: Some(tags.iter().map(|tag| (*tag).to_owned()).collect()),
                summary: Some(summary.to_owned()),
            }),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing(error: EnrichmentError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn stalled(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(EnrichmentPayload::default()),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnrichmentClient for ScriptedClient {
    async fn enrich(&self, _text: &str) -> Result<EnrichmentPayload, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }
}

/// Assessor returning one scripted outcome.
#[derive(Debug)]
pub(crate) struct StubAssessor {
    outcome: Result<QualityAssessment, AssessmentError>,
    calls: AtomicUsize,
}

impl StubAssessor {
    pub(crate) fn scoring(score: f64) -> Arc<Self> {
        Self::returning(Ok(QualityAssessment::scored(score)))
    }

    pub(crate) fn returning(outcome: Result<QualityAssessment, AssessmentError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QualityAssessor for StubAssessor {
    async fn assess(&self, _note: &NoteRecord) -> Result<QualityAssessment, AssessmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Fleeting inbox note used by the workflow tests.
pub(crate) fn inbox_note(path: &str) -> NoteRecord {
    note_with(
        path,
        &[
            ("title", json!("Spaced repetition")),
            (fields::STATUS, json!("inbox")),
            (fields::TYPE, json!("fleeting")),
            (fields::TAGS, json!(["learning"])),
        ],
        "Spaced repetition schedules reviews at growing intervals.",
    )
}
