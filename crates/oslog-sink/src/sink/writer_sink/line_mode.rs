/// How a [`WriterSink`](super::WriterSink) separates one record from the next.
///
/// A record with metadata already spans several lines, one per entry after
/// the line marker. The terminator only closes the record as a whole.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Close every record with `\n`.
    #[default]
    WithNewline,
    /// Write records back to back. Useful when the target frames records itself.
    WithoutNewline,
}

impl LineMode {
    /// Text written after each record.
    ///
    /// ```
    /// use oslog_sink::LineMode;
    ///
    /// assert_eq!(LineMode::WithNewline.terminator(), "\n");
    /// assert_eq!(LineMode::WithoutNewline.terminator(), "");
    /// ```
    #[must_use]
    pub const fn terminator(self) -> &'static str {
        match self {
            Self::WithNewline => "\n",
            Self::WithoutNewline => "",
        }
    }
}
