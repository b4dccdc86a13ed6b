//! crates/oslog-logger/src/macros.rs
//! Convenience macros for building call sites and metadata.

/// Builds a [`CallSite`](crate::CallSite) for the invocation point.
///
/// The module path serves as both source and function, since Rust has no
/// function-name macro.
///
/// # Example
/// ```
/// use oslog_logger::call_site;
///
/// let site = call_site!();
/// assert_eq!(site.line, line!() - 1);
/// assert!(site.file.ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(
            ::core::module_path!(),
            ::core::file!(),
            ::core::module_path!(),
            ::core::line!(),
        )
    };
}

/// Builds a [`Metadata`](crate::Metadata) mapping from `key => value` pairs.
///
/// Keys accept anything convertible into `String`; values anything
/// convertible into [`MetadataValue`](crate::MetadataValue).
///
/// # Example
/// ```
/// use oslog_logger::{MetadataValue, metadata};
///
/// let m = metadata! { "pub.user" => "alice", "attempts" => 3_u32 };
/// assert_eq!(m["pub.user"], MetadataValue::from("alice"));
/// assert_eq!(m.len(), 2);
/// assert!(metadata!().is_empty());
/// ```
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::Metadata::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut metadata = $crate::Metadata::new();
        $(
            metadata.insert(
                ::std::string::String::from($key),
                $crate::MetadataValue::from($value),
            );
        )+
        metadata
    }};
}
