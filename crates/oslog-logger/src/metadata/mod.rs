//! crates/oslog-logger/src/metadata/mod.rs
//! Structured metadata attached to log records.
//!
//! A [`Metadata`] mapping goes through three steps before it reaches a sink:
//! [`merge`] layers the persistent, provided and explicit mappings,
//! [`partition`] renders every pair in key order and splits the lines by
//! disclosure class, and the composer joins them after the message.
//!
//! Rendering is deterministic: nested maps are printed in key order, so the
//! same value always produces the same text.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

mod merge;
mod partition;
mod render;

pub use merge::merge;
pub use partition::{FlattenedMetadata, PUBLIC_PREFIX, is_public_key, partition};
pub use render::{escape_key, format_pair, render_value};

/// Mapping from key to value. Iteration order carries no meaning; renderers
/// impose key order.
pub type Metadata = HashMap<String, MetadataValue>;

/// One metadata value.
///
/// Values are immutable once built. Cloning is cheap for
/// [`MetadataValue::Describable`], which shares its payload.
#[derive(Clone)]
pub enum MetadataValue {
    /// Plain text, rendered quoted and escaped.
    String(String),
    /// Ordered list, rendered as `[a, b]`.
    List(Vec<MetadataValue>),
    /// Nested mapping, rendered as `[k: v, ...]` in key order.
    Map(Metadata),
    /// Any value with a textual description. Rendered like
    /// [`MetadataValue::String`] holding that description.
    Describable(Arc<dyn fmt::Display + Send + Sync>),
}

impl MetadataValue {
    /// Wraps a displayable value.
    ///
    /// ```
    /// use oslog_logger::MetadataValue;
    ///
    /// let port = MetadataValue::describing(8080_u16);
    /// assert_eq!(port.to_string(), "\"8080\"");
    /// ```
    pub fn describing<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::Describable(Arc::new(value))
    }

    /// Returns the text of a [`MetadataValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Renders the value in its canonical log form. Same as `to_string()`.
    pub fn render(&self) -> String {
        render_value(self)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_value(self))
    }
}

impl fmt::Debug for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.debug_tuple("String").field(text).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                f.debug_tuple("Map")
                    .field(&DebugEntries(&entries))
                    .finish()
            }
            Self::Describable(value) => f
                .debug_tuple("Describable")
                .field(&value.to_string())
                .finish(),
        }
    }
}

struct DebugEntries<'a>(&'a [(&'a String, &'a MetadataValue)]);

impl fmt::Debug for DebugEntries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter().copied()).finish()
    }
}

/// Describable values compare by description; everything else structurally.
impl PartialEq for MetadataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Describable(a), Self::Describable(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T> From<Vec<T>> for MetadataValue
where
    T: Into<Self>,
{
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Metadata> for MetadataValue {
    fn from(map: Metadata) -> Self {
        Self::Map(map)
    }
}

macro_rules! describable_from {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for MetadataValue {
                fn from(value: $ty) -> Self {
                    Self::describing(value)
                }
            }
        )+
    };
}

describable_from!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
