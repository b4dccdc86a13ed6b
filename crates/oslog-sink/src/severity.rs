//! crates/oslog-sink/src/severity.rs
//! Severity scale understood by the platform sink.

use std::fmt;

/// Log types accepted by the platform sink.
///
/// The variants mirror the unified logging `OSLogType` values. Every sink in
/// this crate receives one of these; the finer-grained façade severities are
/// collapsed onto this scale before a record reaches a sink.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PlatformSeverity {
    /// Debug-only records, usually not persisted.
    Debug,
    /// Informational records.
    Info,
    /// The platform's default type, used for notable but normal events.
    Default,
    /// Errors.
    Error,
    /// Faults: bugs or unrecoverable conditions.
    Fault,
}

impl PlatformSeverity {
    /// Every platform severity in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Default,
        Self::Error,
        Self::Fault,
    ];

    /// Returns the lowercase name used when rendering records as text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Default => "default",
            Self::Error => "error",
            Self::Fault => "fault",
        }
    }
}

impl fmt::Display for PlatformSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
