//! crates/oslog-sink/src/error.rs
//! Failures reported by sinks.

use std::io;

use thiserror::Error;

/// Error returned when a sink fails to accept a record.
///
/// Callers above the sink boundary do not interpret these; they are handed
/// back to whoever issued the log call.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("failed to write log record: {0}")]
    Io(#[from] io::Error),
    /// The record text contains a NUL byte and cannot cross a C API boundary.
    #[error("log record contains an interior NUL byte")]
    InteriorNul,
    /// A writer panicked while holding the sink lock.
    #[error("log sink lock poisoned by a panicked writer")]
    Poisoned,
}
