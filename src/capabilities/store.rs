//! Capability status store — the feed's single ingress point.
//!
//! The external status feed periodically delivers a complete replacement
//! for the capability table. [`CapabilityStatusStore::replace`] swaps the
//! whole snapshot atomically; no reader can ever observe a half-updated
//! capability. When a feed delivery fails upstream, nothing is called here
//! and the previous snapshot simply stays current — consumers can compare
//! `received_at` against the expected feed cadence to detect staleness.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::capability::{Capability, CapabilitySnapshot};

/// Holds the latest immutable [`CapabilitySnapshot`] plus a version counter.
#[derive(Debug)]
pub struct CapabilityStatusStore {
    current: RwLock<Arc<CapabilitySnapshot>>,
}

impl CapabilityStatusStore {
    /// Create a store holding the empty snapshot (version 0).
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CapabilitySnapshot::empty())),
        }
    }

    /// Atomically replace the snapshot with a new capability table.
    ///
    /// Returns the version assigned to the new snapshot. Versions increase
    /// by one per replacement and never repeat within a process.
    pub fn replace(&self, capabilities: impl IntoIterator<Item = Capability>) -> u64 {
        let mut guard = self.current.write();
        let version = guard.version() + 1;
        let snapshot = Arc::new(CapabilitySnapshot::new(version, capabilities));
        *guard = snapshot;
        log::debug!("capability snapshot replaced (version {version})");
        version
    }

    /// Get the current snapshot.
    pub fn get(&self) -> Arc<CapabilitySnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Version of the current snapshot.
    pub fn version(&self) -> u64 {
        self.current.read().version()
    }

    /// When the current snapshot was received.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.current.read().received_at()
    }
}

impl Default for CapabilityStatusStore {
    fn default() -> Self {
        Self::new()
    }
}
