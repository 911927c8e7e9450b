//! Note processing workflow.
//!
//! This module coordinates quality assessment, tiered AI enrichment, and
//! connection discovery into one pipeline run per note. It follows the same
//! hexagonal layout as [`crate::note`]:
//!
//! - Domain types in [`domain`]
//! - Collaborator contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
