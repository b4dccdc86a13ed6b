//! crates/oslog-sink/src/payload.rs
//! Disclosure-tagged text segments handed to sinks.

/// Text substituted for private content when a sink redacts it.
///
/// Matches the placeholder the unified logging system shows for private
/// arguments when no profile enables private data.
pub const PRIVATE_PLACEHOLDER: &str = "<private>";

/// Redaction class attached to a rendered text segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Disclosure {
    /// The segment may be stored and displayed as-is.
    Public,
    /// The segment may contain sensitive data and must not be disclosed.
    Private,
}

impl Disclosure {
    /// Reports whether this is [`Disclosure::Private`].
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }

    /// Returns the stricter of the two classes.
    ///
    /// ```
    /// use oslog_sink::Disclosure;
    ///
    /// assert_eq!(
    ///     Disclosure::Public.most_restrictive(Disclosure::Private),
    ///     Disclosure::Private
    /// );
    /// assert_eq!(
    ///     Disclosure::Public.most_restrictive(Disclosure::Public),
    ///     Disclosure::Public
    /// );
    /// ```
    #[must_use]
    pub const fn most_restrictive(self, other: Self) -> Self {
        if self.is_private() || other.is_private() {
            Self::Private
        } else {
            Self::Public
        }
    }
}

/// Whether a sink prints private content or replaces it with
/// [`PRIVATE_PLACEHOLDER`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Redaction {
    /// Replace private content with the placeholder.
    #[default]
    Redact,
    /// Print private content in clear. Only suitable for development sinks.
    Reveal,
}

impl Redaction {
    /// Returns the text a sink should print for `text` carrying `disclosure`.
    #[must_use]
    pub fn apply(self, text: &str, disclosure: Disclosure) -> &str {
        match (self, disclosure) {
            (Self::Redact, Disclosure::Private) => PRIVATE_PLACEHOLDER,
            _ => text,
        }
    }
}

/// A piece of record text together with its disclosure class.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Segment {
    text: String,
    disclosure: Disclosure,
}

impl Segment {
    /// Creates a segment with an explicit disclosure class.
    pub fn new(text: impl Into<String>, disclosure: Disclosure) -> Self {
        Self {
            text: text.into(),
            disclosure,
        }
    }

    /// Creates a [`Disclosure::Public`] segment.
    pub fn public(text: impl Into<String>) -> Self {
        Self::new(text, Disclosure::Public)
    }

    /// Creates a [`Disclosure::Private`] segment.
    pub fn private(text: impl Into<String>) -> Self {
        Self::new(text, Disclosure::Private)
    }

    /// Returns the segment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the segment's disclosure class.
    #[must_use]
    pub const fn disclosure(&self) -> Disclosure {
        self.disclosure
    }
}

/// The formatted text of one log record, split into disclosure segments.
///
/// Segments are kept in emission order and are never merged across classes,
/// so a sink that understands per-segment disclosure can redact exactly the
/// private parts. Sinks that accept a single class per record use
/// [`joined`](Self::joined) together with [`disclosure`](Self::disclosure),
/// which reports [`Disclosure::Private`] as soon as any segment is private.
///
/// # Examples
///
/// ```
/// use oslog_sink::{Disclosure, EmissionPayload, Segment};
///
/// let payload = EmissionPayload::new()
///     .with_segment(Segment::public("login"))
///     .with_segment(Segment::private(" token=abc"));
///
/// assert_eq!(payload.joined(), "login token=abc");
/// assert_eq!(payload.disclosure(), Disclosure::Private);
/// assert_eq!(payload.redacted(), "login<private>");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmissionPayload {
    segments: Vec<Segment>,
}

impl EmissionPayload {
    /// Creates an empty payload.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Builder-style variant of [`push`](Self::push).
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.push(segment);
        self
    }

    /// Returns the segments in emission order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consumes the payload and returns its segments.
    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Reports whether the payload carries no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The class of the record as a whole: private if any segment is private.
    #[must_use]
    pub fn disclosure(&self) -> Disclosure {
        self.segments
            .iter()
            .fold(Disclosure::Public, |acc, segment| {
                acc.most_restrictive(segment.disclosure)
            })
    }

    /// Concatenates every segment, private ones included.
    #[must_use]
    pub fn joined(&self) -> String {
        self.render(Redaction::Reveal)
    }

    /// Concatenates every segment, replacing private ones with
    /// [`PRIVATE_PLACEHOLDER`].
    #[must_use]
    pub fn redacted(&self) -> String {
        self.render(Redaction::Redact)
    }

    /// Concatenates every segment under the given redaction policy.
    #[must_use]
    pub fn render(&self, redaction: Redaction) -> String {
        render_segments(&self.segments, redaction)
    }
}

/// Concatenates `segments` under `redaction`.
#[must_use]
pub fn render_segments(segments: &[Segment], redaction: Redaction) -> String {
    let capacity = segments.iter().map(|s| s.text.len()).sum();
    let mut out = String::with_capacity(capacity);
    for segment in segments {
        out.push_str(redaction.apply(&segment.text, segment.disclosure));
    }
    out
}

impl From<Segment> for EmissionPayload {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl FromIterator<Segment> for EmissionPayload {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
