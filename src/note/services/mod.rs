//! Application services for the note lifecycle.

mod lifecycle;
mod promotion;
mod sessions;

pub use lifecycle::{
    NoteLifecycleService, StatusUpdateRequest, TransitionFailure, TransitionResult,
};
pub use promotion::{
    BatchNoteOutcome, BatchNoteReport, BatchPromotionResult, DEFAULT_PROMOTION_THRESHOLD,
    PromotionEngine, PromotionFailure, PromotionPlan, PromotionRequest, PromotionResult,
};
pub use sessions::{NoteBusyError, NoteSessionGuard, NoteSessionTable, SessionInfo, SessionKind};
