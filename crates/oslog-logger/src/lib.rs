#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `oslog_logger` turns leveled log calls with structured metadata into
//! records for the platform log. Each record is one message followed by its
//! metadata, one `key: value` line per entry, with every line classified as
//! public or private. Keys starting with `pub.` are public; everything else is
//! private and is redacted by the platform unless the viewer is privileged.
//!
//! # Design
//!
//! A [`Handler`] holds three things that shape a record:
//!
//! - persistent metadata, set on the handler and replaced as a whole or per
//!   key;
//! - an optional [`MetadataProvider`], asked for a fresh snapshot per record;
//! - a threshold below which records are dropped.
//!
//! [`Handler::emit`] layers persistent, provided and explicit metadata with
//! [`merge`] (explicit wins, then provided), renders and splits the result
//! with [`partition`], joins it after the message with [`compose`], maps the
//! [`Severity`] onto the platform scale and hands the payload to its
//! [`Sink`](oslog_sink::Sink).
//!
//! The flattening of the persistent metadata is rendered when the metadata
//! changes, not per record. A record with no provided or explicit metadata
//! reuses it without rendering anything.
//!
//! # Invariants
//!
//! - Rendered metadata lines are in ascending key order within each class.
//! - A key's class depends on the key alone.
//! - Rendered text is printable ASCII; newlines inside values are escaped, so
//!   a value can never start a new line of its own.
//! - Private lines are never passed to a sink as public text. Sinks that take
//!   one class per record receive the whole record as private.
//!
//! # Errors
//!
//! Formatting cannot fail. [`Handler::emit`] returns the sink's
//! [`SinkError`](oslog_sink::SinkError) unchanged and never retries.
//!
//! # Examples
//!
//! ```
//! use oslog_logger::{Handler, HandlerConfig, Severity, call_site, metadata};
//! use oslog_sink::{CaptureSink, PlatformSeverity, Sink};
//!
//! let capture = CaptureSink::new();
//! let handler = Handler::new(
//!     HandlerConfig::from_label("com.example.app:net"),
//!     Sink::from(capture.clone()),
//! )
//! .without_provider()
//! .with_metadata(metadata! { "pub.build" => "release" });
//!
//! handler.emit(Severity::Warning, "retrying", Some(&metadata! { "host" => "db1" }), call_site!())?;
//!
//! let record = &capture.records()[0];
//! assert_eq!(record.severity(), PlatformSeverity::Error);
//! assert_eq!(record.text(), "retrying\n  ▷ pub.build: \"release\"\n  ▷ host: \"db1\"");
//! # Ok::<(), oslog_sink::SinkError>(())
//! ```
//!
//! # See also
//!
//! - [`oslog_sink`] for the sink capabilities and concrete sinks.
//! - [`OsLogLayer`] to route `tracing` events through a handler.

mod compose;
mod config;
mod handler;
mod label;
mod macros;
pub mod metadata;
pub mod provider;
mod severity;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use compose::{LINE_MARKER, compose};
pub use config::HandlerConfig;
pub use handler::{CallSite, Handler, ORIGIN_KEY};
pub use label::{Label, NO_CATEGORY};
pub use metadata::{
    FlattenedMetadata, Metadata, MetadataValue, PUBLIC_PREFIX, format_pair, merge, partition,
    render_value,
};
pub use provider::{MetadataProvider, ThreadLocalProvider};
pub use severity::{ParseSeverityError, Severity, map_severity};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{OsLogLayer, init_tracing, init_tracing_with_filter};
