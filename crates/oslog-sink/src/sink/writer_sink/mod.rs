use std::fmt;
use std::sync::Mutex;

use crate::payload::Redaction;

/// Segment-aware sink that renders records into an [`std::io::Write`] target.
///
/// Each record is written as `"<label> <severity>: <text>"` (the label is
/// `subsystem:category` when one was configured) followed by the configured
/// [`LineMode`]. Private segments are printed according to the sink's
/// [`Redaction`], which defaults to [`Redaction::Redact`]. The writer sits
/// behind a mutex so concurrent records never interleave.
///
/// # Examples
///
/// Render a record with a private block into a [`Vec<u8>`]:
///
/// ```
/// use oslog_sink::{PlatformSeverity, Segment, SegmentedSink, WriterSink};
///
/// let sink = WriterSink::new(Vec::new()).with_label("com.example.app", "auth");
/// sink.write_segments(
///     PlatformSeverity::Info,
///     &[Segment::public("login\n  ▷ "), Segment::private("token: \"abc\"")],
/// )?;
///
/// let output = String::from_utf8(sink.into_inner()?).unwrap();
/// assert_eq!(output, "com.example.app:auth info: login\n  ▷ <private>\n");
/// # Ok::<(), oslog_sink::SinkError>(())
/// ```
///
/// Reveal private content and drop the trailing newline:
///
/// ```
/// use oslog_sink::{LineMode, PlatformSeverity, Redaction, Segment, SegmentedSink, WriterSink};
///
/// let sink = WriterSink::with_line_mode(Vec::new(), LineMode::WithoutNewline)
///     .with_redaction(Redaction::Reveal);
/// sink.write_segments(PlatformSeverity::Error, &[Segment::private("secret")])?;
///
/// assert_eq!(sink.into_inner()?, b"error: secret".to_vec());
/// # Ok::<(), oslog_sink::SinkError>(())
/// ```
pub struct WriterSink<W> {
    writer: Mutex<W>,
    line_mode: LineMode,
    redaction: Redaction,
    label: Option<String>,
}

mod constructors;
mod line_mode;
mod mapping;
mod writing;

pub use line_mode::LineMode;

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("line_mode", &self.line_mode)
            .field("redaction", &self.redaction)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
