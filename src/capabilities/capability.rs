//! Capability status model.
//!
//! A capability is the cluster's report about one underlying operator or
//! component: whether it is installed and whether it is enabled. The core
//! never mutates capabilities; it only reads immutable snapshots delivered
//! wholesale by the external status feed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Installed/enabled status of one cluster capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// Capability identifier (e.g., `"kserve"`).
    pub id: String,
    /// Whether the underlying component is installed in the cluster.
    pub installed: bool,
    /// Whether the component is enabled by the cluster configuration.
    pub enabled: bool,
}

impl Capability {
    /// Create a new capability status record.
    pub fn new(id: impl Into<String>, installed: bool, enabled: bool) -> Self {
        Self {
            id: id.into(),
            installed,
            enabled,
        }
    }

    /// Whether the capability can actually be used: installed *and* enabled.
    pub fn usable(&self) -> bool {
        self.installed && self.enabled
    }
}

// ---------------------------------------------------------------------------
// CapabilitySnapshot
// ---------------------------------------------------------------------------

/// One immutable, versioned view of every capability the cluster reported.
///
/// Snapshots are replaced wholesale by the status store and never patched,
/// so any reader sees either the fully-old or fully-new state. The version
/// counter is the memo key used by the area resolver; `received_at` lets
/// consumers surface staleness when the feed goes quiet.
#[derive(Debug, Clone)]
pub struct CapabilitySnapshot {
    version: u64,
    received_at: DateTime<Utc>,
    capabilities: HashMap<String, Capability>,
}

impl CapabilitySnapshot {
    /// Build a snapshot with the given version from an iterator of statuses.
    pub(crate) fn new(version: u64, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            version,
            received_at: Utc::now(),
            capabilities: capabilities
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        }
    }

    /// The empty snapshot a store starts from before the feed delivers.
    pub(crate) fn empty() -> Self {
        Self::new(0, std::iter::empty())
    }

    /// Monotonically increasing snapshot version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// When this snapshot was received from the feed.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Look up one capability by id.
    pub fn get(&self, id: &str) -> Option<&Capability> {
        self.capabilities.get(id)
    }

    /// Whether the capability is present, installed, and enabled.
    ///
    /// A capability the cluster never reported is not usable.
    pub fn is_usable(&self, id: &str) -> bool {
        self.capabilities.get(id).is_some_and(Capability::usable)
    }

    /// Number of capabilities in this snapshot.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether the snapshot holds no capabilities at all.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Iterate over all capability statuses.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.values()
    }
}
