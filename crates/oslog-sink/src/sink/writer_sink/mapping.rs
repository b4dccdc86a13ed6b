use std::mem;

use super::WriterSink;
use crate::error::SinkError;

impl<W> WriterSink<W> {
    /// Replaces the underlying writer, returning the previous one.
    ///
    /// Records already written stay in the returned writer so they can be
    /// inspected or flushed before it is dropped. Works through a shared
    /// reference, so a sink already installed in a handler can be redirected,
    /// for example from standard error to a log file.
    #[must_use = "the returned writer contains records produced before the replacement"]
    pub fn replace_writer(&self, mut writer: W) -> Result<W, SinkError> {
        let mut guard = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        mem::swap(&mut *guard, &mut writer);
        Ok(writer)
    }
}
