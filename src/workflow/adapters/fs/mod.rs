//! Filesystem adapters backed by a `cap-std` vault directory.

mod review_queue;

pub use review_queue::ReviewQueueSink;
