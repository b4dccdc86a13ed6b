//! crates/oslog-sink/src/oslog.rs
//! Unified logging (os_log) sink for macOS.
//!
//! View records with:
//!   log stream --predicate 'subsystem == "com.example.app"'

use oslog::{Level, OsLog};

use crate::error::SinkError;
use crate::payload::{Disclosure, Redaction};
use crate::severity::PlatformSeverity;
use crate::sink::RecordSink;

/// Single-class sink backed by an `os_log_t` handle.
///
/// The binding formats every record as one public argument, so privacy cannot
/// be tagged per segment. Records classified [`Disclosure::Private`] are
/// therefore redacted as a whole unless the sink is configured with
/// [`Redaction::Reveal`].
pub struct OsLogSink {
    log: OsLog,
    redaction: Redaction,
}

impl OsLogSink {
    /// Creates a handle for `subsystem` and `category`.
    #[must_use]
    pub fn new(subsystem: &str, category: &str) -> Self {
        Self {
            log: OsLog::new(subsystem, category),
            redaction: Redaction::default(),
        }
    }

    /// Selects how private records are printed.
    #[must_use]
    pub fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = redaction;
        self
    }
}

const fn level_for(severity: PlatformSeverity) -> Level {
    match severity {
        PlatformSeverity::Debug => Level::Debug,
        PlatformSeverity::Info => Level::Info,
        PlatformSeverity::Default => Level::Default,
        PlatformSeverity::Error => Level::Error,
        PlatformSeverity::Fault => Level::Fault,
    }
}

impl RecordSink for OsLogSink {
    fn write_record(
        &self,
        severity: PlatformSeverity,
        text: &str,
        disclosure: Disclosure,
    ) -> Result<(), SinkError> {
        if text.contains('\0') {
            return Err(SinkError::InteriorNul);
        }
        self.log
            .with_level(level_for(severity), self.redaction.apply(text, disclosure));
        Ok(())
    }
}

impl std::fmt::Debug for OsLogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsLogSink")
            .field("redaction", &self.redaction)
            .finish_non_exhaustive()
    }
}
