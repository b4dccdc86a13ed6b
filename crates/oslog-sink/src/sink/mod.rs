//! crates/oslog-sink/src/sink/mod.rs
//! Sink capabilities and the strategy enum selected at handler construction.

use std::fmt;
use std::sync::Arc;

use crate::error::SinkError;
use crate::payload::{Disclosure, EmissionPayload, Segment};
use crate::severity::PlatformSeverity;

mod capture;
mod writer_sink;

pub use capture::{CaptureSink, CapturedRecord};
pub use writer_sink::{LineMode, WriterSink};

/// A sink that keeps the disclosure class of every segment.
///
/// This is the "modern" capability: private segments can be redacted
/// individually while the rest of the record stays readable.
pub trait SegmentedSink: Send + Sync {
    /// Accepts one record.
    fn write_segments(
        &self,
        severity: PlatformSeverity,
        segments: &[Segment],
    ) -> Result<(), SinkError>;
}

/// A sink that accepts a single disclosure class per record.
///
/// This is the "legacy" capability. The record text arrives already joined;
/// the class is private whenever any part of the record was private.
pub trait RecordSink: Send + Sync {
    /// Accepts one record.
    fn write_record(
        &self,
        severity: PlatformSeverity,
        text: &str,
        disclosure: Disclosure,
    ) -> Result<(), SinkError>;
}

/// The platform sink a handler writes to, chosen once at construction.
///
/// Both variants expose the same entry point, [`Sink::emit`]; the variant
/// only decides how a multi-segment [`EmissionPayload`] crosses the boundary.
///
/// # Examples
///
/// ```
/// use oslog_sink::{CaptureSink, Disclosure, EmissionPayload, PlatformSeverity, Segment, Sink};
///
/// let capture = CaptureSink::new();
/// let sink = Sink::legacy(capture.clone());
///
/// let payload = EmissionPayload::from(Segment::public("login"))
///     .with_segment(Segment::private(" token"));
/// sink.emit(PlatformSeverity::Info, &payload)?;
///
/// let records = capture.records();
/// assert_eq!(records[0].disclosure(), Disclosure::Private);
/// assert_eq!(records[0].text(), "login token");
/// # Ok::<(), oslog_sink::SinkError>(())
/// ```
#[derive(Clone)]
pub enum Sink {
    /// Segment-aware sink.
    Modern(Arc<dyn SegmentedSink>),
    /// Single-class sink.
    Legacy(Arc<dyn RecordSink>),
}

impl Sink {
    /// Wraps a segment-aware sink.
    pub fn modern(sink: impl SegmentedSink + 'static) -> Self {
        Self::Modern(Arc::new(sink))
    }

    /// Wraps a single-class sink.
    pub fn legacy(sink: impl RecordSink + 'static) -> Self {
        Self::Legacy(Arc::new(sink))
    }

    /// Reports whether this sink keeps per-segment disclosure.
    #[must_use]
    pub const fn is_modern(&self) -> bool {
        matches!(self, Self::Modern(_))
    }

    /// Hands one record to the underlying sink.
    ///
    /// A legacy sink receives the joined text classified by
    /// [`EmissionPayload::disclosure`], so private content is never
    /// downgraded to public. Errors from the sink are returned unchanged.
    pub fn emit(
        &self,
        severity: PlatformSeverity,
        payload: &EmissionPayload,
    ) -> Result<(), SinkError> {
        match self {
            Self::Modern(sink) => sink.write_segments(severity, payload.segments()),
            Self::Legacy(sink) => {
                sink.write_record(severity, &payload.joined(), payload.disclosure())
            }
        }
    }

    /// Selects the native sink for the running platform.
    ///
    /// macOS uses the unified logging system through the os_log sink;
    /// other Unix systems use syslog with the subsystem as ident; anything
    /// else falls back to a [`WriterSink`] on standard error.
    #[must_use]
    pub fn platform_default(subsystem: &str, category: &str) -> Self {
        #[cfg(target_os = "macos")]
        {
            tracing::debug!(subsystem, category, "selected os_log sink");
            Self::legacy(crate::oslog::OsLogSink::new(subsystem, category))
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            tracing::debug!(subsystem, category, "selected syslog sink");
            let config = crate::syslog::SyslogConfig::new(
                crate::syslog::SyslogFacility::User,
                subsystem,
            );
            Self::modern(crate::syslog::SyslogSink::open(config, category))
        }

        #[cfg(not(unix))]
        {
            tracing::debug!(subsystem, category, "selected stderr writer sink");
            Self::modern(WriterSink::new(std::io::stderr()).with_label(subsystem, category))
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modern(_) => f.write_str("Sink::Modern(..)"),
            Self::Legacy(_) => f.write_str("Sink::Legacy(..)"),
        }
    }
}

impl From<CaptureSink> for Sink {
    fn from(capture: CaptureSink) -> Self {
        Self::modern(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_part_payload() -> EmissionPayload {
        EmissionPayload::from(Segment::public("msg"))
            .with_segment(Segment::public("\n  ▷ pub.a: \"1\""))
            .with_segment(Segment::public("\n  ▷ "))
            .with_segment(Segment::private("b: \"2\""))
    }

    #[test]
    fn modern_sink_receives_segments_unchanged() {
        let capture = CaptureSink::new();
        let sink = Sink::modern(capture.clone());
        assert!(sink.is_modern());

        let payload = three_part_payload();
        sink.emit(PlatformSeverity::Error, &payload).expect("emit");

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity(), PlatformSeverity::Error);
        assert_eq!(records[0].segments(), payload.segments());
    }

    #[test]
    fn legacy_sink_receives_joined_private_record() {
        let capture = CaptureSink::new();
        let sink = Sink::legacy(capture.clone());
        assert!(!sink.is_modern());

        sink.emit(PlatformSeverity::Info, &three_part_payload())
            .expect("emit");

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segments().len(), 1);
        assert_eq!(records[0].disclosure(), Disclosure::Private);
        assert_eq!(records[0].text(), "msg\n  ▷ pub.a: \"1\"\n  ▷ b: \"2\"");
    }

    #[test]
    fn legacy_sink_keeps_public_records_public() {
        let capture = CaptureSink::new();
        let sink = Sink::legacy(capture.clone());
        let payload = EmissionPayload::from(Segment::public("only public"));
        sink.emit(PlatformSeverity::Debug, &payload).expect("emit");
        assert_eq!(capture.records()[0].disclosure(), Disclosure::Public);
    }

    #[test]
    fn debug_names_the_variant() {
        assert_eq!(format!("{:?}", Sink::from(CaptureSink::new())), "Sink::Modern(..)");
        assert_eq!(
            format!("{:?}", Sink::legacy(CaptureSink::new())),
            "Sink::Legacy(..)"
        );
    }
}
