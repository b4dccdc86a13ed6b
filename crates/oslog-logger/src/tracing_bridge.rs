//! crates/oslog-logger/src/tracing_bridge.rs
//! Bridge from the tracing crate to a [`Handler`].
//!
//! [`OsLogLayer`] is a tracing-subscriber layer that turns every event into
//! one handler record, so code instrumented with the standard tracing macros
//! (trace!, debug!, info!, warn!, error!) ends up in the platform log with its
//! fields as metadata.
//!
//! # Mapping
//!
//! - The event level picks the severity. A `severity` field naming a
//!   [`Severity`] overrides it, which is how `notice` and `critical` are
//!   reached. The field may be a string, `%severity` or `?severity`.
//! - The `message` field becomes the record message.
//! - Every other field becomes explicit metadata. Use a `pub.` prefix in the
//!   field name (`"pub.user" = name`) to make it public.
//! - The target, file, module path and line become the [`CallSite`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oslog_logger::{Handler, init_tracing};
//!
//! init_tracing(Arc::new(Handler::with_label("com.example.app:main")))?;
//! tracing::info!(user = "alice", "signed in");
//! tracing::warn!(severity = "critical", "disk full");
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::handler::{CallSite, Handler};
use crate::metadata::{Metadata, MetadataValue};
use crate::severity::Severity;

const MESSAGE_FIELD: &str = "message";
const SEVERITY_FIELD: &str = "severity";
const UNKNOWN: &str = "<unknown>";

/// A tracing layer that forwards events to a [`Handler`].
///
/// A layer has no caller to return sink errors to. Records the sink rejects
/// are counted instead; see [`OsLogLayer::dropped_records`]. Clones share
/// the counter.
#[derive(Clone, Debug)]
pub struct OsLogLayer {
    handler: Arc<Handler>,
    dropped: Arc<AtomicU64>,
}

impl OsLogLayer {
    /// Creates a layer forwarding to `handler`.
    #[must_use]
    pub fn new(handler: Arc<Handler>) -> Self {
        Self {
            handler,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The handler events are forwarded to.
    pub const fn handler(&self) -> &Arc<Handler> {
        &self.handler
    }

    /// Number of events whose record the sink failed to accept.
    pub fn dropped_records(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Map a tracing level to a severity.
    const fn level_to_severity(level: &Level) -> Severity {
        match *level {
            Level::TRACE => Severity::Trace,
            Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            Level::ERROR => Severity::Error,
        }
    }
}

impl<S> Layer<S> for OsLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let severity = visitor
            .severity
            .unwrap_or_else(|| Self::level_to_severity(metadata.level()));
        if !self.handler.is_enabled(severity) {
            return;
        }

        let call_site = CallSite::new(
            metadata.target(),
            metadata.file().unwrap_or(UNKNOWN),
            metadata.module_path().unwrap_or(UNKNOWN),
            metadata.line().unwrap_or(0),
        );
        let explicit = (!visitor.fields.is_empty()).then_some(&visitor.fields);
        let message = visitor.message.as_deref().unwrap_or_default();

        if self
            .handler
            .emit(severity, message, explicit, call_site)
            .is_err()
        {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Collects the message, severity override and remaining fields of an event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    severity: Option<Severity>,
    fields: Metadata,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: MetadataValue) {
        self.fields.insert(field.name().to_owned(), value);
    }

    /// Unparsable values stay as ordinary metadata.
    fn record_severity(&mut self, field: &Field, text: &str, value: MetadataValue) {
        match text.parse() {
            Ok(severity) => self.severity = Some(severity),
            Err(_) => self.insert(field, value),
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        match field.name() {
            MESSAGE_FIELD => self.message = Some(text),
            SEVERITY_FIELD => {
                let value = MetadataValue::describing(text.clone());
                self.record_severity(field, &text, value);
            }
            _ => self.insert(field, MetadataValue::describing(text)),
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            MESSAGE_FIELD => self.message = Some(value.to_owned()),
            SEVERITY_FIELD => self.record_severity(field, value, value.into()),
            _ => self.insert(field, value.into()),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }
}

/// Installs a global subscriber that forwards every event to `handler`.
///
/// Fails if a global subscriber is already set.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use oslog_logger::{Handler, init_tracing};
///
/// init_tracing(Arc::new(Handler::with_label("com.example.app:main")))?;
/// tracing::info!("ready");
/// ```
pub fn init_tracing(handler: Arc<Handler>) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(OsLogLayer::new(handler))
        .try_init()
}

/// Installs a global subscriber with an additional filter layer in front of
/// the handler, for example an `EnvFilter`.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use oslog_logger::{Handler, init_tracing_with_filter};
/// use tracing_subscriber::EnvFilter;
///
/// let handler = Arc::new(Handler::with_label("com.example.app:main"));
/// init_tracing_with_filter(handler, EnvFilter::from_default_env())?;
/// ```
pub fn init_tracing_with_filter<F>(handler: Arc<Handler>, filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(OsLogLayer::new(handler))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerConfig;
    use oslog_sink::{CaptureSink, PlatformSeverity, Sink};
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(min: Severity) -> (Arc<Handler>, CaptureSink) {
        let capture = CaptureSink::new();
        let handler = Handler::new(
            HandlerConfig::new("com.example.tests", "bridge").with_min_severity(min),
            Sink::from(capture.clone()),
        )
        .without_provider();
        (Arc::new(handler), capture)
    }

    fn with_layer(handler: &Arc<Handler>, f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(OsLogLayer::new(Arc::clone(handler)));
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_level_to_severity() {
        assert_eq!(OsLogLayer::level_to_severity(&Level::TRACE), Severity::Trace);
        assert_eq!(OsLogLayer::level_to_severity(&Level::DEBUG), Severity::Debug);
        assert_eq!(OsLogLayer::level_to_severity(&Level::INFO), Severity::Info);
        assert_eq!(OsLogLayer::level_to_severity(&Level::WARN), Severity::Warning);
        assert_eq!(OsLogLayer::level_to_severity(&Level::ERROR), Severity::Error);
    }

    #[test]
    fn message_and_fields_are_forwarded() {
        let (handler, capture) = capture(Severity::Info);
        with_layer(&handler, || {
            tracing::info!("pub.user" = "alice", attempts = 3_u64, "signed in");
        });

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity(), PlatformSeverity::Info);
        assert_eq!(
            records[0].redacted(),
            "signed in\n  ▷ pub.user: \"alice\"\n  ▷ <private>"
        );
        assert_eq!(
            records[0].text(),
            "signed in\n  ▷ pub.user: \"alice\"\n  ▷ attempts: \"3\""
        );
    }

    #[test]
    fn severity_field_overrides_level() {
        let (handler, capture) = capture(Severity::Info);
        with_layer(&handler, || {
            tracing::warn!(severity = "critical", "disk full");
            tracing::debug!(severity = "notice", "promoted");
        });

        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].severity(), PlatformSeverity::Fault);
        assert_eq!(records[0].text(), "disk full");
        assert_eq!(records[1].severity(), PlatformSeverity::Default);
    }

    #[test]
    fn formatted_severity_field_overrides_level() {
        let (handler, capture) = capture(Severity::Info);
        with_layer(&handler, || {
            tracing::warn!(severity = %Severity::Critical, "disk full");
            tracing::info!(severity = ?Severity::Notice, "rotated");
        });

        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].severity(), PlatformSeverity::Fault);
        assert_eq!(records[0].text(), "disk full");
        assert_eq!(records[1].severity(), PlatformSeverity::Default);
        assert_eq!(records[1].text(), "rotated");
    }

    #[test]
    fn unparsable_formatted_severity_is_kept_as_metadata() {
        let (handler, capture) = capture(Severity::Info);
        with_layer(&handler, || {
            tracing::warn!(severity = %"fatal", "odd");
        });
        let records = capture.records();
        assert_eq!(records[0].severity(), PlatformSeverity::Error);
        assert_eq!(records[0].text(), "odd\n  ▷ severity: \"fatal\"");
    }

    #[test]
    fn sink_failures_are_counted() {
        struct Closed;

        impl std::io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let handler = Arc::new(
            Handler::new(
                HandlerConfig::new("com.example.tests", "bridge"),
                Sink::modern(oslog_sink::WriterSink::new(Closed)),
            )
            .without_provider(),
        );
        let layer = OsLogLayer::new(handler);
        let counter = layer.clone();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first");
            tracing::debug!("filtered");
            tracing::error!("second");
        });

        assert_eq!(counter.dropped_records(), 2);
    }

    #[test]
    fn unparsable_severity_field_is_kept_as_metadata() {
        let (handler, capture) = capture(Severity::Info);
        with_layer(&handler, || {
            tracing::error!(severity = "fatal", "odd");
        });
        let records = capture.records();
        assert_eq!(records[0].severity(), PlatformSeverity::Error);
        assert_eq!(records[0].text(), "odd\n  ▷ severity: \"fatal\"");
    }

    #[test]
    fn events_below_threshold_are_dropped() {
        let (handler, capture) = capture(Severity::Warning);
        with_layer(&handler, || {
            tracing::info!("quiet");
            tracing::trace!("quieter");
            tracing::error!("loud");
        });
        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "loud");
    }

    #[test]
    fn debug_formatted_fields_are_rendered_as_text() {
        let (handler, capture) = capture(Severity::Trace);
        with_layer(&handler, || {
            tracing::trace!(path = ?std::path::Path::new("/tmp/x"), "opened");
        });
        assert_eq!(capture.records()[0].text(), "opened\n  ▷ path: \"\\\"/tmp/x\\\"\"");
    }
}
