//! Session configuration inputs: feature flags and dev overrides.
//!
//! Both are loaded once at startup and treated as immutable for the
//! session. Each carries a version so the area resolver can memoize the
//! availability map against `(snapshot, flags, overrides)` revisions and
//! recompute only when an input actually changes.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::extensions::error::ExtensionError;

// ---------------------------------------------------------------------------
// FeatureFlagSet
// ---------------------------------------------------------------------------

/// Immutable mapping of feature flag id to its boolean value.
#[derive(Debug, Clone, Default)]
pub struct FeatureFlagSet {
    version: u64,
    flags: HashMap<String, bool>,
}

impl FeatureFlagSet {
    /// Build a flag set (version 1) from `(id, value)` pairs.
    pub fn new<K: Into<String>>(flags: impl IntoIterator<Item = (K, bool)>) -> Self {
        Self {
            version: 1,
            flags: flags.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Build a flag set from a YAML document of named booleans.
    ///
    /// ```yaml
    /// modelServing: true
    /// pipelines: false
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ExtensionError> {
        let flags: HashMap<String, bool> = serde_yaml::from_str(yaml)?;
        Ok(Self { version: 1, flags })
    }

    /// Build a flag set from a JSON object of named booleans.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ExtensionError> {
        let flags = HashMap::<String, bool>::deserialize(json.clone())?;
        Ok(Self { version: 1, flags })
    }

    /// Replace the version stamp (for integrations that reload flags and
    /// need the resolver memo to notice).
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Version stamp used as part of the resolver's memo key.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a flag is set to `true`. Unknown flags are `false`.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Number of flags in the set.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the set holds no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DevOverrideSet
// ---------------------------------------------------------------------------

/// Area ids forced available for development builds.
///
/// An override bypasses every capability, flag, and reliance check for its
/// area. Whether overrides are honored at all is the integrator's call:
/// production builds should pass [`DevOverrideSet::disabled`], which keeps
/// the set inert regardless of its contents.
#[derive(Debug, Clone, Default)]
pub struct DevOverrideSet {
    version: u64,
    active: bool,
    areas: HashSet<String>,
}

impl DevOverrideSet {
    /// An inert, empty override set. The production default.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build an active override set from area ids.
    pub fn new<S: Into<String>>(areas: impl IntoIterator<Item = S>) -> Self {
        Self {
            version: 1,
            active: true,
            areas: areas.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a comma-separated area id list from an environment variable.
    ///
    /// Returns the inert set when the variable is unset or empty, so this
    /// is safe to call unconditionally at startup.
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(raw) if !raw.trim().is_empty() => {
                Self::new(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))
            }
            _ => Self::disabled(),
        }
    }

    /// Version stamp used as part of the resolver's memo key.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the given area is forced available.
    pub fn is_forced(&self, area_id: &str) -> bool {
        self.active && self.areas.contains(area_id)
    }
}
