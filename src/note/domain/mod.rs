//! Domain model for notes and their lifecycle.
//!
//! The note domain models lifecycle status, note type, the ordered metadata
//! header, and the transition records produced by status changes. Storage and
//! filesystem concerns stay outside of the domain boundary.

mod error;
mod kind;
mod metadata;
mod note;
mod status;
mod transition;

pub use error::{NoteDomainError, ParseNoteStatusError, ParseNoteTypeError};
pub use kind::NoteType;
pub use metadata::{NoteMetadata, fields};
pub use note::NoteRecord;
pub use status::{NoteStatus, TransitionCheck, validate_transition};
pub use transition::{LIFECYCLE_TIMESTAMP_FORMAT, TransitionRecord};
