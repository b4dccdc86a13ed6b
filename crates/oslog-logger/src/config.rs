//! crates/oslog-logger/src/config.rs
//! Handler configuration.

use crate::label::{Label, NO_CATEGORY};
use crate::severity::Severity;

/// Settings fixed when a [`Handler`](crate::Handler) is built.
///
/// With the `serde` feature the struct (de)serializes with every field
/// optional; missing fields take their [`Default`] values.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HandlerConfig {
    /// Reverse-DNS subsystem.
    pub subsystem: String,
    /// Category within the subsystem.
    pub category: String,
    /// Records below this severity are dropped.
    pub min_severity: Severity,
    /// Adds the call site under [`ORIGIN_KEY`](crate::ORIGIN_KEY) to every
    /// record. Disables reuse of the cached flattening.
    pub record_origin: bool,
}

impl HandlerConfig {
    /// Creates a configuration with the default threshold.
    pub fn new(subsystem: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Creates a configuration from a `subsystem:category` label.
    ///
    /// ```
    /// use oslog_logger::{HandlerConfig, Severity};
    ///
    /// let config = HandlerConfig::from_label("com.example.app:db");
    /// assert_eq!(config.subsystem, "com.example.app");
    /// assert_eq!(config.category, "db");
    /// assert_eq!(config.min_severity, Severity::Info);
    /// assert!(!config.record_origin);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = Label::parse(label);
        Self::new(label.subsystem(), label.category())
    }

    /// Sets the threshold.
    pub const fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Enables or disables call-site annotation.
    pub const fn with_record_origin(mut self, record_origin: bool) -> Self {
        self.record_origin = record_origin;
        self
    }

    /// The configured subsystem and category.
    pub fn label(&self) -> Label {
        Label::new(self.subsystem.as_str(), self.category.as_str())
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            subsystem: String::new(),
            category: NO_CATEGORY.to_owned(),
            min_severity: Severity::default(),
            record_origin: false,
        }
    }
}
