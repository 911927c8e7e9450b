//! Collaborator contracts consumed by the workflow services.

pub mod assessor;
pub mod connections;
pub mod enrichment;
pub mod reports;

pub use assessor::{AssessmentError, QualityAssessment, QualityAssessor};
pub use connections::{ConnectionDiscoverer, DiscoveryError};
pub use enrichment::{EnrichmentClient, EnrichmentError, EnrichmentPayload, NoteEnhancer};
pub use reports::{BugReportError, BugReportResult, BugReportSink};
