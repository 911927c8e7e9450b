//! Application services for workflow runs.

mod enhancement;
mod orchestrator;

pub use enhancement::EnhancementFallbackController;
pub use orchestrator::WorkflowOrchestrator;
