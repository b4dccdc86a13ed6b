//! In-memory sink for tests.

use std::sync::{Arc, Mutex, PoisonError};

use super::{RecordSink, SegmentedSink};
use crate::error::SinkError;
use crate::payload::{Disclosure, EmissionPayload, Redaction, Segment, render_segments};
use crate::severity::PlatformSeverity;

/// One record received by a [`CaptureSink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedRecord {
    severity: PlatformSeverity,
    segments: Vec<Segment>,
}

impl CapturedRecord {
    /// Severity the record was emitted with.
    #[must_use]
    pub const fn severity(&self) -> PlatformSeverity {
        self.severity
    }

    /// Segments as received. Records written through the legacy capability
    /// hold exactly one segment.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Full record text, private segments included.
    #[must_use]
    pub fn text(&self) -> String {
        render_segments(&self.segments, Redaction::Reveal)
    }

    /// Record text with private segments replaced by the placeholder.
    #[must_use]
    pub fn redacted(&self) -> String {
        render_segments(&self.segments, Redaction::Redact)
    }

    /// Class of the record as a whole.
    #[must_use]
    pub fn disclosure(&self) -> Disclosure {
        self.segments
            .iter()
            .fold(Disclosure::Public, |acc, s| acc.most_restrictive(s.disclosure()))
    }

    /// Rebuilds the payload this record was written from.
    #[must_use]
    pub fn to_payload(&self) -> EmissionPayload {
        self.segments.iter().cloned().collect()
    }
}

/// A sink that stores every record in memory.
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to a handler. Implements both capabilities: wrap it with
/// [`Sink::modern`](super::Sink::modern) or [`Sink::legacy`](super::Sink::legacy)
/// to observe either boundary.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl CaptureSink {
    /// Creates an empty capture sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record received so far.
    #[must_use]
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records received so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Reports whether no record was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored record.
    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, record: CapturedRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(record);
        Ok(())
    }
}

impl SegmentedSink for CaptureSink {
    fn write_segments(
        &self,
        severity: PlatformSeverity,
        segments: &[Segment],
    ) -> Result<(), SinkError> {
        self.push(CapturedRecord {
            severity,
            segments: segments.to_vec(),
        })
    }
}

impl RecordSink for CaptureSink {
    fn write_record(
        &self,
        severity: PlatformSeverity,
        text: &str,
        disclosure: Disclosure,
    ) -> Result<(), SinkError> {
        self.push(CapturedRecord {
            severity,
            segments: vec![Segment::new(text, disclosure)],
        })
    }
}
