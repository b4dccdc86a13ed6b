use std::sync::Mutex;

use super::{LineMode, WriterSink};
use crate::error::SinkError;
use crate::payload::Redaction;

impl<W> WriterSink<W> {
    /// Creates a sink that terminates each record with a newline and redacts
    /// private segments.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            line_mode,
            redaction: Redaction::default(),
            label: None,
        }
    }

    /// Prefixes every record with `subsystem:category`.
    #[must_use]
    pub fn with_label(mut self, subsystem: &str, category: &str) -> Self {
        self.label = Some(format!("{subsystem}:{category}"));
        self
    }

    /// Selects how private segments are printed.
    #[must_use]
    pub fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = redaction;
        self
    }

    /// Returns the configured [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Returns the configured [`Redaction`].
    #[must_use]
    pub const fn redaction(&self) -> Redaction {
        self.redaction
    }

    /// Returns the `subsystem:category` prefix, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Consumes the sink and returns the wrapped writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| SinkError::Poisoned)
    }
}
