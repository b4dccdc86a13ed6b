#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/oslog-sink/src/lib.rs
//!
//! # Overview
//!
//! `oslog-sink` is the boundary between the oslog logger's formatting engine
//! and the platform's log store. A formatted record arrives as an
//! [`EmissionPayload`]: an ordered list of text [`Segment`]s, each tagged
//! [`Disclosure::Public`] or [`Disclosure::Private`], together with a
//! [`PlatformSeverity`].
//!
//! # Design
//!
//! Sinks come in two capabilities. A [`SegmentedSink`] keeps per-segment
//! disclosure, so it can redact private segments individually. A
//! [`RecordSink`] accepts one disclosure class per record. The [`Sink`] enum
//! wraps either one and is chosen once, when the handler is built;
//! [`Sink::platform_default`] picks os_log on macOS and syslog on other Unix
//! systems.
//!
//! # Invariants
//!
//! - Private content is never downgraded: a single-class sink receives
//!   [`Disclosure::Private`] whenever any segment of the record is private.
//! - Sinks that print text themselves ([`WriterSink`], the syslog sink, the
//!   os_log sink) replace private content with [`PRIVATE_PLACEHOLDER`] unless
//!   explicitly configured with [`Redaction::Reveal`].
//!
//! # Errors
//!
//! Sinks report failures as [`SinkError`]. Nothing in this crate retries or
//! suppresses them.
//!
//! # Examples
//!
//! ```
//! use oslog_sink::{EmissionPayload, PlatformSeverity, Segment, Sink, WriterSink};
//!
//! let sink = Sink::modern(WriterSink::new(std::io::sink()));
//! let payload = EmissionPayload::from(Segment::public("ready"));
//! sink.emit(PlatformSeverity::Info, &payload)?;
//! # Ok::<(), oslog_sink::SinkError>(())
//! ```

mod error;
mod payload;
mod severity;
mod sink;

#[cfg(target_os = "macos")]
pub mod oslog;
#[cfg(unix)]
#[allow(unsafe_code)]
pub mod syslog;

pub use error::SinkError;
#[cfg(target_os = "macos")]
pub use oslog::OsLogSink;
pub use payload::{
    Disclosure, EmissionPayload, PRIVATE_PLACEHOLDER, Redaction, Segment, render_segments,
};
pub use severity::PlatformSeverity;
pub use sink::{
    CaptureSink, CapturedRecord, LineMode, RecordSink, SegmentedSink, Sink, WriterSink,
};
