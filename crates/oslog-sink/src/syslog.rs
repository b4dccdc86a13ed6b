//! Syslog backend for non-Apple Unix systems.
//!
//! Uses libc `openlog`/`syslog`/`closelog` directly rather than a dedicated
//! syslog crate. syslog(3) has no notion of private arguments, so the sink
//! redacts private segments itself before the text leaves the process.
//!
//! The syslog connection is process-global. Every [`SyslogSink`] shares one
//! reference-counted [`SyslogConnection`]: the first sink opened picks the
//! ident and facility, later sinks reuse it, and `closelog` runs once the
//! last sink is dropped.

use std::ffi::CString;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::error::SinkError;
use crate::payload::{Redaction, Segment, render_segments};
use crate::severity::PlatformSeverity;
use crate::sink::SegmentedSink;

/// Syslog facility codes matching the POSIX syslog(3) constants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogFacility {
    /// User-level messages (LOG_USER), the default for applications.
    #[default]
    User = libc::LOG_USER,
    /// System daemons (LOG_DAEMON).
    Daemon = libc::LOG_DAEMON,
    /// Security/authorization messages (LOG_AUTH).
    Auth = libc::LOG_AUTH,
    /// Reserved for local use (LOG_LOCAL0).
    Local0 = libc::LOG_LOCAL0,
    /// Reserved for local use (LOG_LOCAL1).
    Local1 = libc::LOG_LOCAL1,
    /// Reserved for local use (LOG_LOCAL2).
    Local2 = libc::LOG_LOCAL2,
    /// Reserved for local use (LOG_LOCAL3).
    Local3 = libc::LOG_LOCAL3,
    /// Reserved for local use (LOG_LOCAL4).
    Local4 = libc::LOG_LOCAL4,
    /// Reserved for local use (LOG_LOCAL5).
    Local5 = libc::LOG_LOCAL5,
    /// Reserved for local use (LOG_LOCAL6).
    Local6 = libc::LOG_LOCAL6,
    /// Reserved for local use (LOG_LOCAL7).
    Local7 = libc::LOG_LOCAL7,
}

impl SyslogFacility {
    /// Parses a case-insensitive facility name such as `"user"` or `"LOCAL3"`.
    ///
    /// ```
    /// # #[cfg(unix)]
    /// # {
    /// use oslog_sink::syslog::SyslogFacility;
    ///
    /// assert_eq!(SyslogFacility::from_name("user"), Some(SyslogFacility::User));
    /// assert_eq!(SyslogFacility::from_name("LOCAL3"), Some(SyslogFacility::Local3));
    /// assert_eq!(SyslogFacility::from_name("kern"), None);
    /// # }
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "daemon" => Some(Self::Daemon),
            "auth" => Some(Self::Auth),
            "local0" => Some(Self::Local0),
            "local1" => Some(Self::Local1),
            "local2" => Some(Self::Local2),
            "local3" => Some(Self::Local3),
            "local4" => Some(Self::Local4),
            "local5" => Some(Self::Local5),
            "local6" => Some(Self::Local6),
            "local7" => Some(Self::Local7),
            _ => None,
        }
    }

    /// Returns the lowercase facility name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ident used when the configured subsystem cannot be represented as a C string.
pub const FALLBACK_IDENT: &str = "oslog-logger";

/// Facility and ident passed to [`openlog(3)`](libc::openlog).
///
/// Constructing a config does not open anything; see [`SyslogConfig::open`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyslogConfig {
    facility: SyslogFacility,
    ident: String,
}

impl SyslogConfig {
    /// Creates a configuration. The ident is normally the handler's subsystem.
    pub fn new(facility: SyslogFacility, ident: impl Into<String>) -> Self {
        Self {
            facility,
            ident: ident.into(),
        }
    }

    /// Returns the configured facility.
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }

    /// Returns the configured ident.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Returns the process-wide syslog connection, opening it if no sink
    /// currently holds one.
    ///
    /// While a connection is live this config is ignored: the first ident
    /// and facility win until the last handle is dropped.
    pub fn open(&self) -> Arc<SyslogConnection> {
        let mut slot = CONNECTION.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(live) = slot.upgrade() {
            return live;
        }

        let ident = CString::new(self.ident.as_str())
            .or_else(|_| CString::new(FALLBACK_IDENT))
            .unwrap_or_default();

        // SAFETY: the registry lock serializes openlog and closelog, so only
        // one connection is active per process. The ident is owned by the
        // connection and outlives it, as openlog requires.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, self.facility as libc::c_int);
        }
        tracing::debug!(ident = self.ident.as_str(), facility = %self.facility, "opened syslog");

        let connection = Arc::new(SyslogConnection {
            ident,
            facility: self.facility,
        });
        *slot = Arc::downgrade(&connection);
        connection
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(SyslogFacility::default(), FALLBACK_IDENT)
    }
}

/// Syslog priorities used by this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogPriority {
    /// Critical conditions (LOG_CRIT).
    Critical = libc::LOG_CRIT,
    /// Error conditions (LOG_ERR).
    Error = libc::LOG_ERR,
    /// Normal but significant condition (LOG_NOTICE).
    Notice = libc::LOG_NOTICE,
    /// Informational messages (LOG_INFO).
    Info = libc::LOG_INFO,
    /// Debug-level messages (LOG_DEBUG).
    Debug = libc::LOG_DEBUG,
}

impl From<PlatformSeverity> for SyslogPriority {
    fn from(severity: PlatformSeverity) -> Self {
        match severity {
            PlatformSeverity::Debug => Self::Debug,
            PlatformSeverity::Info => Self::Info,
            PlatformSeverity::Default => Self::Notice,
            PlatformSeverity::Error => Self::Error,
            PlatformSeverity::Fault => Self::Critical,
        }
    }
}

/// Sends one message to syslog(3).
///
/// The message is passed as the argument of a `"%s"` format so `%` in log
/// text is never interpreted.
pub fn syslog_message(priority: SyslogPriority, message: &str) -> Result<(), SinkError> {
    let c_message = CString::new(message).map_err(|_| SinkError::InteriorNul)?;

    // SAFETY: both pointers are valid NUL-terminated strings for the call.
    unsafe {
        libc::syslog(priority as libc::c_int, c"%s".as_ptr(), c_message.as_ptr());
    }
    Ok(())
}

/// The live connection, if any sink still holds it.
static CONNECTION: Mutex<Weak<SyslogConnection>> = Mutex::new(Weak::new());

/// Shared handle on the process-wide syslog connection.
///
/// Obtained from [`SyslogConfig::open`]. The connection is closed when the
/// last handle is dropped.
pub struct SyslogConnection {
    ident: CString,
    facility: SyslogFacility,
}

impl SyslogConnection {
    /// Ident the connection was opened with.
    pub fn ident(&self) -> &str {
        self.ident.to_str().unwrap_or(FALLBACK_IDENT)
    }

    /// Facility the connection was opened with.
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }
}

impl fmt::Debug for SyslogConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogConnection")
            .field("ident", &self.ident())
            .field("facility", &self.facility)
            .finish()
    }
}

impl Drop for SyslogConnection {
    fn drop(&mut self) {
        let slot = CONNECTION.lock().unwrap_or_else(PoisonError::into_inner);
        // A newer connection was opened after the last handle went away.
        if slot.strong_count() > 0 {
            return;
        }
        // SAFETY: closelog has no preconditions; the lock keeps it from
        // racing an openlog in SyslogConfig::open.
        unsafe {
            libc::closelog();
        }
    }
}

/// Segment-aware sink writing to syslog(3).
///
/// Each record becomes one syslog message prefixed with `[category]`.
/// Private segments are replaced by the placeholder unless the sink is
/// configured with [`Redaction::Reveal`].
#[derive(Debug)]
pub struct SyslogSink {
    category: String,
    redaction: Redaction,
    connection: Arc<SyslogConnection>,
}

impl SyslogSink {
    /// Joins the process-wide syslog connection, opening it with `config`
    /// if needed, and tags records with `category`.
    pub fn open(config: SyslogConfig, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            redaction: Redaction::default(),
            connection: config.open(),
        }
    }

    /// The shared connection this sink writes through.
    pub fn connection(&self) -> &Arc<SyslogConnection> {
        &self.connection
    }

    /// Selects how private segments are printed.
    #[must_use]
    pub fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = redaction;
        self
    }

    /// Returns the category prefix.
    pub fn category(&self) -> &str {
        &self.category
    }

    fn render(&self, segments: &[Segment]) -> String {
        format!(
            "[{}] {}",
            self.category,
            render_segments(segments, self.redaction)
        )
    }
}

impl SegmentedSink for SyslogSink {
    fn write_segments(
        &self,
        severity: PlatformSeverity,
        segments: &[Segment],
    ) -> Result<(), SinkError> {
        syslog_message(severity.into(), &self.render(segments))
    }
}
