//! crates/oslog-logger/src/severity.rs
//! Extended severity scale and its mapping onto the platform scale.

use std::fmt;
use std::str::FromStr;

use oslog_sink::PlatformSeverity;
use thiserror::Error;

/// Seven-level severity used by callers of the handler.
///
/// Variants are declared from least to most severe, so the derived ordering
/// is the filtering order: a record is emitted when its severity is greater
/// than or equal to the handler's threshold.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[repr(u8)]
pub enum Severity {
    /// Finest-grained tracing output.
    Trace = 0,
    /// Debugging detail.
    Debug = 1,
    /// Informational messages. The default threshold.
    #[default]
    Info = 2,
    /// Normal but significant conditions.
    Notice = 3,
    /// Conditions that may need attention.
    Warning = 4,
    /// Failures of an operation.
    Error = 5,
    /// Failures that need immediate attention.
    Critical = 6,
}

impl Severity {
    /// Every severity, ascending.
    pub const ALL: [Self; 7] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Notice,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Returns the lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Maps onto the coarser platform scale.
    ///
    /// ```
    /// use oslog_logger::Severity;
    /// use oslog_sink::PlatformSeverity;
    ///
    /// assert_eq!(Severity::Trace.platform(), PlatformSeverity::Debug);
    /// assert_eq!(Severity::Notice.platform(), PlatformSeverity::Default);
    /// assert_eq!(Severity::Warning.platform(), PlatformSeverity::Error);
    /// assert_eq!(Severity::Critical.platform(), PlatformSeverity::Fault);
    /// ```
    pub const fn platform(self) -> PlatformSeverity {
        match self {
            Self::Trace | Self::Debug => PlatformSeverity::Debug,
            Self::Info => PlatformSeverity::Info,
            Self::Notice => PlatformSeverity::Default,
            Self::Warning | Self::Error => PlatformSeverity::Error,
            Self::Critical => PlatformSeverity::Fault,
        }
    }

    /// Restores a severity stored as its discriminant. Values past the end of
    /// the scale saturate to [`Severity::Critical`].
    pub(crate) const fn from_repr(raw: u8) -> Self {
        match raw {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Notice,
            4 => Self::Warning,
            5 => Self::Error,
            _ => Self::Critical,
        }
    }
}

/// Free-function form of [`Severity::platform`].
pub const fn map_severity(severity: Severity) -> PlatformSeverity {
    severity.platform()
}

impl From<Severity> for PlatformSeverity {
    fn from(severity: Severity) -> Self {
        severity.platform()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known severity.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error(
    "unknown severity `{input}` (expected trace, debug, info, notice, warning, error or critical)"
)]
pub struct ParseSeverityError {
    input: String,
}

impl ParseSeverityError {
    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Parses a case-insensitive severity name. `warn` is accepted for
    /// [`Severity::Warning`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("warn") {
            return Ok(Self::Warning);
        }
        Self::ALL
            .into_iter()
            .find(|severity| trimmed.eq_ignore_ascii_case(severity.as_str()))
            .ok_or_else(|| ParseSeverityError {
                input: s.to_owned(),
            })
    }
}
