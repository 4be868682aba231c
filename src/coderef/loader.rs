//! Code ref loader — identity-keyed, coalescing, process-lifetime cache.
//!
//! The first `resolve` for a ref invokes its loader and caches the in-flight
//! future; every concurrent and subsequent caller awaits that same future,
//! so the underlying loader runs exactly once per ref identity. Completed
//! loads (success or failure) stay cached for the process lifetime; the
//! engine never retries on its own. A caller that wants a retry after an
//! error invalidates the entry explicitly and resolves again.
//!
//! A loader that never settles leaves its ref permanently `Pending`; there
//! are no timeouts here. Callers that lose interest simply drop their await
//! — the load itself is shared and keeps its cache slot.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;

use super::code_ref::{CodeRef, CodeRefError};
use super::resource::Resource;

type LoadResult = Result<Arc<Value>, CodeRefError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Resolves [`CodeRef`]s into loaded values, deduplicating by ref identity.
#[derive(Default)]
pub struct CodeRefLoader {
    cache: DashMap<u64, SharedLoad>,
}

impl std::fmt::Debug for CodeRefLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRefLoader")
            .field("entries", &self.cache.len())
            .finish()
    }
}

impl CodeRefLoader {
    /// Create an empty loader cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a code ref, loading it on first request.
    ///
    /// Concurrent calls for the same ref coalesce onto one in-flight load;
    /// all of them observe the same eventual value or error.
    pub async fn resolve(&self, code_ref: &CodeRef) -> LoadResult {
        let shared = self
            .cache
            .entry(code_ref.id())
            .or_insert_with(|| {
                log::debug!("starting load for code ref {}", code_ref.id());
                let load = code_ref.load();
                let load: BoxFuture<'static, LoadResult> =
                    async move { load.await.map(Arc::new) }.boxed();
                load.shared()
            })
            .clone();
        shared.await
    }

    /// Observe a ref's cache state without driving the load.
    pub fn state(&self, code_ref: &CodeRef) -> Resource<Arc<Value>, CodeRefError> {
        match self.cache.get(&code_ref.id()) {
            None => Resource::NotRequested,
            Some(shared) => match shared.peek() {
                None => Resource::Pending,
                Some(Ok(value)) => Resource::Ready(Arc::clone(value)),
                Some(Err(err)) => Resource::Error(err.clone()),
            },
        }
    }

    /// Drop a ref's cache entry so the next `resolve` re-invokes its loader.
    ///
    /// Returns whether an entry existed. This is the only retry mechanism;
    /// it is caller-triggered and never automatic.
    pub fn invalidate(&self, code_ref: &CodeRef) -> bool {
        self.cache.remove(&code_ref.id()).is_some()
    }

    /// Number of refs with a cache entry (pending or settled).
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no ref has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
