use super::Metadata;
use super::render::{format_pair, sorted_entries};

/// Keys starting with this prefix are public. The prefix stays in the
/// rendered key.
pub const PUBLIC_PREFIX: &str = "pub.";

/// Returns `true` if `key` belongs to the public disclosure class.
///
/// ```
/// use oslog_logger::metadata::is_public_key;
///
/// assert!(is_public_key("pub.user"));
/// assert!(!is_public_key("pub"));
/// assert!(!is_public_key("user.pub.id"));
/// ```
pub fn is_public_key(key: &str) -> bool {
    key.starts_with(PUBLIC_PREFIX)
}

/// Rendered metadata lines split by disclosure class.
///
/// Both lists are in ascending key order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FlattenedMetadata {
    public: Vec<String>,
    private: Vec<String>,
}

impl FlattenedMetadata {
    /// Builds a flattening from already-rendered lines.
    pub const fn new(public: Vec<String>, private: Vec<String>) -> Self {
        Self { public, private }
    }

    /// Lines whose key starts with [`PUBLIC_PREFIX`].
    pub fn public(&self) -> &[String] {
        &self.public
    }

    /// All other lines.
    pub fn private(&self) -> &[String] {
        &self.private
    }

    /// `true` when neither class has lines.
    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty()
    }

    /// Splits into `(public, private)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.public, self.private)
    }
}

/// Renders every pair of `metadata` in key order and routes each line by
/// its key's prefix.
///
/// Entries are sorted once, before routing, so each class keeps the global
/// key order.
pub fn partition(metadata: &Metadata) -> FlattenedMetadata {
    let mut flattened = FlattenedMetadata::default();
    for (key, value) in sorted_entries(metadata) {
        let line = format_pair(key, value);
        if is_public_key(key) {
            flattened.public.push(line);
        } else {
            flattened.private.push(line);
        }
    }
    flattened
}
