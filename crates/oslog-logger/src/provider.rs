//! crates/oslog-logger/src/provider.rs
//! Dynamic metadata providers and the process-wide default.
//!
//! A provider is asked for a fresh snapshot on every emitted record; nothing
//! is cached between calls. The default registry is read once, when a
//! [`Handler`](crate::Handler) is built, so installing a new default does not
//! affect handlers that already exist.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::metadata::Metadata;

/// Supplies metadata at emission time.
///
/// Implementations run synchronously on the logging thread and must return
/// promptly; the handler applies no timeout.
pub trait MetadataProvider: Send + Sync {
    /// Returns the current snapshot.
    fn metadata(&self) -> Metadata;
}

impl<F> MetadataProvider for F
where
    F: Fn() -> Metadata + Send + Sync,
{
    fn metadata(&self) -> Metadata {
        self()
    }
}

static DEFAULT_PROVIDER: RwLock<Option<Arc<dyn MetadataProvider>>> = RwLock::new(None);

/// Installs the process-wide default provider, returning the previous one.
///
/// Handlers built afterwards without an explicit provider use it.
pub fn install_default(provider: Arc<dyn MetadataProvider>) -> Option<Arc<dyn MetadataProvider>> {
    DEFAULT_PROVIDER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(provider)
}

/// Removes the process-wide default provider, returning it.
pub fn clear_default() -> Option<Arc<dyn MetadataProvider>> {
    DEFAULT_PROVIDER
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Returns the process-wide default provider, if one is installed.
pub fn default_provider() -> Option<Arc<dyn MetadataProvider>> {
    DEFAULT_PROVIDER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

thread_local! {
    static SCOPES: RefCell<Vec<Metadata>> = const { RefCell::new(Vec::new()) };
}

/// Provider returning the metadata of the calling thread's active
/// [`scoped`] blocks.
///
/// Inner scopes win over outer ones on a key collision. Outside any scope the
/// snapshot is empty, which keeps the handler on its cached path.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadLocalProvider;

impl MetadataProvider for ThreadLocalProvider {
    fn metadata(&self) -> Metadata {
        SCOPES.with(|scopes| {
            let mut merged = Metadata::new();
            for layer in scopes.borrow().iter() {
                merged.extend(layer.iter().map(|(key, value)| (key.clone(), value.clone())));
            }
            merged
        })
    }
}

/// Runs `f` with `metadata` pushed onto the current thread's scope stack.
///
/// The layer is popped when `f` returns or unwinds.
///
/// ```
/// use oslog_logger::provider::{MetadataProvider, ThreadLocalProvider, scoped};
/// use oslog_logger::{Metadata, MetadataValue};
///
/// let mut request = Metadata::new();
/// request.insert("pub.request".into(), "42".into());
///
/// scoped(request, || {
///     let snapshot = ThreadLocalProvider.metadata();
///     assert_eq!(snapshot["pub.request"], MetadataValue::from("42"));
/// });
/// assert!(ThreadLocalProvider.metadata().is_empty());
/// ```
pub fn scoped<R>(metadata: Metadata, f: impl FnOnce() -> R) -> R {
    SCOPES.with(|scopes| scopes.borrow_mut().push(metadata));
    let _guard = ScopeGuard;
    f()
}

/// Number of active [`scoped`] layers on the current thread.
pub fn scope_depth() -> usize {
    SCOPES.with(|scopes| scopes.borrow().len())
}

struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let _ = SCOPES.try_with(|scopes| scopes.borrow_mut().pop());
    }
}

/// Debug adapter for trait objects, which carry no `Debug` bound.
pub(crate) struct ProviderDebug<'a>(pub(crate) &'a Option<Arc<dyn MetadataProvider>>);

impl fmt::Debug for ProviderDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Some(..)"),
            None => f.write_str("None"),
        }
    }
}
