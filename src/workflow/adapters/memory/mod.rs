//! In-memory workflow adapters.

mod reports;

pub use reports::InMemoryBugReportSink;
