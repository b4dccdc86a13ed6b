//! crates/oslog-logger/src/handler.rs
//! The log handler: persistent metadata, threshold, provider and sink.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use arc_swap::ArcSwap;
use oslog_sink::{Sink, SinkError};

use crate::compose::compose;
use crate::config::HandlerConfig;
use crate::label::Label;
use crate::metadata::{FlattenedMetadata, Metadata, MetadataValue, merge, partition};
use crate::provider::{self, MetadataProvider, ProviderDebug};
use crate::severity::Severity;

/// Public key under which the call site is recorded when
/// [`HandlerConfig::record_origin`] is set.
pub const ORIGIN_KEY: &str = "pub.__origin";

/// Where a record was produced. All parts are opaque strings supplied by the
/// caller; see [`call_site!`](crate::call_site).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallSite<'a> {
    /// Logical source, usually the module path.
    pub source: &'a str,
    /// Source file.
    pub file: &'a str,
    /// Enclosing function or module.
    pub function: &'a str,
    /// Line within `file`.
    pub line: u32,
}

impl<'a> CallSite<'a> {
    /// Creates a call site.
    pub const fn new(source: &'a str, file: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            source,
            file,
            function,
            line,
        }
    }
}

/// Formats as `source:file:line function`.
impl fmt::Display for CallSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {}",
            self.source, self.file, self.line, self.function
        )
    }
}

/// Persistent metadata and the flattening derived from it, published
/// together so readers never see one without the other.
struct Persistent {
    metadata: Metadata,
    flattened: FlattenedMetadata,
}

impl Persistent {
    fn new(metadata: Metadata) -> Self {
        let flattened = partition(&metadata);
        Self {
            metadata,
            flattened,
        }
    }
}

/// Formats leveled records with structured metadata and hands them to a
/// [`Sink`].
///
/// A handler is shared by reference across threads. Replacing persistent
/// metadata renders the new flattening before publishing it, so a concurrent
/// [`emit`](Self::emit) sees either the old mapping with its old flattening
/// or the new mapping with its new one.
///
/// # Examples
///
/// ```
/// use oslog_logger::{Handler, HandlerConfig, Severity, call_site, metadata};
/// use oslog_sink::{CaptureSink, Sink};
///
/// let capture = CaptureSink::new();
/// let handler = Handler::new(
///     HandlerConfig::new("com.example.app", "auth"),
///     Sink::from(capture.clone()),
/// )
/// .without_provider();
///
/// let explicit = metadata! { "pub.user" => "alice", "token" => "abc\ndef" };
/// handler.emit(Severity::Info, "login", Some(&explicit), call_site!())?;
///
/// let record = &capture.records()[0];
/// assert_eq!(record.redacted(), "login\n  ▷ pub.user: \"alice\"\n  ▷ <private>");
/// # Ok::<(), oslog_sink::SinkError>(())
/// ```
pub struct Handler {
    label: Label,
    sink: Sink,
    provider: Option<Arc<dyn MetadataProvider>>,
    threshold: AtomicU8,
    record_origin: bool,
    persistent: ArcSwap<Persistent>,
}

impl Handler {
    /// Builds a handler writing to `sink`.
    ///
    /// The default provider, if one is installed, is captured now; see
    /// [`provider::install_default`].
    pub fn new(config: HandlerConfig, sink: Sink) -> Self {
        let label = config.label();
        Self {
            label,
            sink,
            provider: provider::default_provider(),
            threshold: AtomicU8::new(config.min_severity as u8),
            record_origin: config.record_origin,
            persistent: ArcSwap::from_pointee(Persistent::new(Metadata::new())),
        }
    }

    /// Builds a handler for a `subsystem:category` label writing to the
    /// platform's default sink.
    pub fn with_label(label: &str) -> Self {
        let config = HandlerConfig::from_label(label);
        let sink = Sink::platform_default(&config.subsystem, &config.category);
        #[cfg(feature = "tracing")]
        tracing::debug!(%label, modern = sink.is_modern(), "built log handler");
        Self::new(config, sink)
    }

    /// Uses `provider` instead of the default provider.
    pub fn with_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Drops any provider, including the default one.
    pub fn without_provider(mut self) -> Self {
        self.provider = None;
        self
    }

    /// Replaces the persistent metadata.
    pub fn with_metadata(self, metadata: Metadata) -> Self {
        self.set_metadata(metadata);
        self
    }

    /// Subsystem and category.
    pub const fn label(&self) -> &Label {
        &self.label
    }

    /// The sink records are handed to.
    pub const fn sink(&self) -> &Sink {
        &self.sink
    }

    /// The provider consulted on every record.
    pub fn provider(&self) -> Option<&Arc<dyn MetadataProvider>> {
        self.provider.as_ref()
    }

    /// Whether records carry the call site under [`ORIGIN_KEY`].
    pub const fn records_origin(&self) -> bool {
        self.record_origin
    }

    /// Current threshold.
    pub fn min_severity(&self) -> Severity {
        Severity::from_repr(self.threshold.load(Ordering::Relaxed))
    }

    /// Changes the threshold.
    pub fn set_min_severity(&self, severity: Severity) {
        self.threshold.store(severity as u8, Ordering::Relaxed);
    }

    /// Returns `true` if a record at `severity` passes the threshold.
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity as u8 >= self.threshold.load(Ordering::Relaxed)
    }

    /// Snapshot of the persistent metadata.
    pub fn metadata(&self) -> Metadata {
        self.persistent.load().metadata.clone()
    }

    /// The cached flattening of the persistent metadata.
    pub fn flattened_metadata(&self) -> FlattenedMetadata {
        self.persistent.load().flattened.clone()
    }

    /// Replaces the persistent metadata and its cached flattening.
    pub fn set_metadata(&self, metadata: Metadata) {
        self.persistent.store(Arc::new(Persistent::new(metadata)));
    }

    /// Reads one persistent metadata entry.
    pub fn metadata_value(&self, key: &str) -> Option<MetadataValue> {
        self.persistent.load().metadata.get(key).cloned()
    }

    /// Sets one persistent metadata entry, or removes it when `value` is
    /// `None`. Concurrent updates of different keys are not lost.
    pub fn set_metadata_value(&self, key: impl Into<String>, value: Option<MetadataValue>) {
        let key = key.into();
        self.persistent.rcu(|current| {
            let mut metadata = current.metadata.clone();
            match &value {
                Some(value) => {
                    metadata.insert(key.clone(), value.clone());
                }
                None => {
                    metadata.remove(&key);
                }
            }
            Persistent::new(metadata)
        });
    }

    /// Formats one record and hands it to the sink.
    ///
    /// Records below the threshold return `Ok(())` without touching the
    /// provider or the sink. When neither the provider nor `metadata`
    /// contributes an entry, the cached flattening is reused. Sink errors are
    /// returned unchanged.
    pub fn emit(
        &self,
        severity: Severity,
        message: &str,
        metadata: Option<&Metadata>,
        call_site: CallSite<'_>,
    ) -> Result<(), SinkError> {
        if !self.is_enabled(severity) {
            return Ok(());
        }

        let provided = self.provider.as_ref().map(|provider| provider.metadata());
        let explicit = if self.record_origin {
            Some(Cow::Owned(with_origin(metadata, call_site)))
        } else {
            metadata.map(Cow::Borrowed)
        };

        let payload = {
            let persistent = self.persistent.load();
            match merge(&persistent.metadata, provided.as_ref(), explicit.as_deref()) {
                Some(effective) => {
                    let flattened = partition(&effective);
                    compose(message, flattened.public(), flattened.private())
                }
                None => compose(
                    message,
                    persistent.flattened.public(),
                    persistent.flattened.private(),
                ),
            }
        };

        self.sink.emit(severity.platform(), &payload)
    }
}

/// Adds the call site unless the caller already supplied [`ORIGIN_KEY`].
fn with_origin(metadata: Option<&Metadata>, call_site: CallSite<'_>) -> Metadata {
    let mut annotated = metadata.cloned().unwrap_or_default();
    annotated
        .entry(ORIGIN_KEY.to_owned())
        .or_insert_with(|| MetadataValue::String(call_site.to_string()));
    annotated
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("label", &self.label)
            .field("sink", &self.sink)
            .field("provider", &ProviderDebug(&self.provider))
            .field("min_severity", &self.min_severity())
            .field("record_origin", &self.record_origin)
            .finish_non_exhaustive()
    }
}
