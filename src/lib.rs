//! Zettelflow: note workflow orchestration core.
//!
//! This crate moves Markdown notes through their lifecycle (inbox, promoted,
//! published, archived). It validates status transitions, runs the
//! processing pipeline that combines quality assessment, tiered AI
//! enrichment, and connection discovery, and relocates notes that pass
//! promotion criteria behind a safety backup.
//!
//! # Architecture
//!
//! Zettelflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (filesystem, in-memory)
//!
//! # Modules
//!
//! - [`note`]: Status state machine, note storage, backups, and promotion
//! - [`workflow`]: Processing pipeline and the enrichment fallback chain
//! - [`config`]: Thresholds, limits, and vault layout

pub mod config;
pub mod note;
pub mod workflow;
