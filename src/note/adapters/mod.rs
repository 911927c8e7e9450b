//! Adapter implementations for note storage and backup ports.

pub mod fs;
pub mod memory;
