//! Lazy code references.
//!
//! A [`CodeRef`] is a plugin-supplied handle to code that is fetched on
//! demand: an opaque identity plus an injected async loader closure. The
//! core never implements the transport — the bundler/loader that actually
//! moves bytes lives outside and is passed in here as the closure.
//!
//! Identity is the reference itself, never its content: two refs built from
//! structurally identical properties are still distinct cache keys, while a
//! clone shares its original's identity (and therefore its cache slot).

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

/// Monotonic identity source for code refs.
static NEXT_CODE_REF_ID: AtomicU64 = AtomicU64::new(1);

/// Error surfaced when a code ref fails to load.
///
/// `Clone` because a single failed load is fanned out to every coalesced
/// caller and stays cached until explicitly invalidated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeRefError {
    /// The plugin's loader reported a failure.
    #[error("code ref load failed: {0}")]
    LoadFailed(String),

    /// The extension has no code ref registered under the requested slot.
    #[error("no code ref registered in slot '{0}'")]
    MissingSlot(String),
}

/// The loader closure a plugin supplies with its code ref.
pub type LoaderFn = dyn Fn() -> BoxFuture<'static, Result<Value, CodeRefError>> + Send + Sync;

/// An opaque, lazily-resolvable reference to plugin-owned code.
#[derive(Clone)]
pub struct CodeRef {
    id: u64,
    loader: Arc<LoaderFn>,
}

impl CodeRef {
    /// Wrap an async loader closure in a new code ref with a fresh identity.
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, CodeRefError>> + Send + 'static,
    {
        Self {
            id: NEXT_CODE_REF_ID.fetch_add(1, Ordering::Relaxed),
            loader: Arc::new(move || Box::pin(loader())),
        }
    }

    /// A ref whose loader immediately yields a fixed value. Useful for
    /// plugins whose "code" is inline data, and for tests.
    pub fn ready(value: Value) -> Self {
        Self::new(move || {
            let value = value.clone();
            async move { Ok(value) }
        })
    }

    /// Process-unique identity, shared by clones of this ref.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Invoke the loader, producing the in-flight load future.
    pub(crate) fn load(&self) -> BoxFuture<'static, Result<Value, CodeRefError>> {
        (self.loader)()
    }
}

impl fmt::Debug for CodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeRef").field("id", &self.id).finish()
    }
}
