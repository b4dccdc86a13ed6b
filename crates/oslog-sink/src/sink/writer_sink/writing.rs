use std::io::Write;

use super::WriterSink;
use crate::error::SinkError;
use crate::payload::{Segment, render_segments};
use crate::severity::PlatformSeverity;
use crate::sink::SegmentedSink;

impl<W> WriterSink<W> {
    fn render_record(&self, severity: PlatformSeverity, segments: &[Segment]) -> String {
        let text = render_segments(segments, self.redaction);
        let end = self.line_mode.terminator();
        match &self.label {
            Some(label) => format!("{label} {severity}: {text}{end}"),
            None => format!("{severity}: {text}{end}"),
        }
    }
}

impl<W> WriterSink<W>
where
    W: Write,
{
    /// Flushes the underlying writer.
    pub fn flush(&self) -> Result<(), SinkError> {
        self.writer
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .flush()?;
        Ok(())
    }
}

impl<W> SegmentedSink for WriterSink<W>
where
    W: Write + Send,
{
    fn write_segments(
        &self,
        severity: PlatformSeverity,
        segments: &[Segment],
    ) -> Result<(), SinkError> {
        // Render before locking so the critical section is a single write.
        let line = self.render_record(severity, segments);
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.write_all(line.as_bytes())?;
        Ok(())
    }
}
