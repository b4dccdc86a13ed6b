//! crates/oslog-logger/src/label.rs
//! `subsystem:category` labels.

use std::fmt;

/// Category used when a label has no colon.
///
/// A non-empty placeholder keeps such records filterable by category.
pub const NO_CATEGORY: &str = "<none>";

/// Subsystem and category identifying a handler in the platform log.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Label {
    subsystem: String,
    category: String,
}

impl Label {
    /// Creates a label from its parts.
    pub fn new(subsystem: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            category: category.into(),
        }
    }

    /// Splits `label` at its first colon.
    ///
    /// Without a colon the whole label is the subsystem and the category is
    /// [`NO_CATEGORY`]. A subsystem can therefore never contain a colon when
    /// built this way, while a category can.
    ///
    /// ```
    /// use oslog_logger::{Label, NO_CATEGORY};
    ///
    /// let label = Label::parse("com.example.app:net:http");
    /// assert_eq!(label.subsystem(), "com.example.app");
    /// assert_eq!(label.category(), "net:http");
    ///
    /// assert_eq!(Label::parse("com.example.app").category(), NO_CATEGORY);
    /// assert_eq!(Label::parse("com.example.app:").category(), "");
    /// ```
    pub fn parse(label: &str) -> Self {
        match label.split_once(':') {
            Some((subsystem, category)) => Self::new(subsystem, category),
            None => Self::new(label, NO_CATEGORY),
        }
    }

    /// Reverse-DNS subsystem, for example `com.example.app`.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Category within the subsystem.
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl From<&str> for Label {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.subsystem, self.category)
    }
}
