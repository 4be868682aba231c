//! Host — bootstrap phase and consumer query surface.
//!
//! All registration happens through [`HostBuilder`] in one explicit
//! bootstrap pass: area definitions, per-plugin extension lists, session
//! feature flags, dev overrides, and the singleton conflict policy. The
//! resulting [`Host`] owns the registries as plain values — there are no
//! ambient global singletons and no import-time side effects — so
//! resolution stays a pure function of explicit inputs.
//!
//! After bootstrap the only mutations are the capability feed's snapshot
//! replacement and the code ref cache's loads/invalidations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::areas::{Area, AreaRegistry, AreaResolver, AvailabilityMap};
use crate::capabilities::{Capability, CapabilitySnapshot, CapabilityStatusStore};
use crate::coderef::{CodeRef, CodeRefError, CodeRefLoader, Resource};
use crate::config::{DevOverrideSet, FeatureFlagSet};
use crate::extensions::{
    ConflictPolicy, Extension, ExtensionError, ExtensionProps, ExtensionRegistry,
    ExtensionResolver,
};

/// Errors that can occur during host bootstrap.
#[derive(Debug, Error)]
pub enum HostError {
    /// A plugin's extension manifest failed to load.
    #[error("extension manifest error: {0}")]
    Manifest(#[from] ExtensionError),
}

// ---------------------------------------------------------------------------
// HostBuilder
// ---------------------------------------------------------------------------

/// Explicit bootstrap phase for a [`Host`].
#[derive(Debug, Default)]
pub struct HostBuilder {
    areas: AreaRegistry,
    extensions: ExtensionRegistry,
    flags: FeatureFlagSet,
    overrides: Option<DevOverrideSet>,
    dev_flag_names: Vec<String>,
    policy: ConflictPolicy,
}

impl HostBuilder {
    /// Start an empty bootstrap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one area definition.
    pub fn area(mut self, area: Area) -> Self {
        self.areas.register(area);
        self
    }

    /// Register several area definitions.
    pub fn areas(mut self, areas: impl IntoIterator<Item = Area>) -> Self {
        for area in areas {
            self.areas.register(area);
        }
        self
    }

    /// Register one plugin module's extension list.
    pub fn extensions(mut self, extensions: Vec<Extension>) -> Self {
        self.extensions.register(extensions);
        self
    }

    /// Register a plugin's data-only extensions from a YAML manifest.
    pub fn extension_manifest_yaml(mut self, yaml: &str) -> Result<Self, HostError> {
        self.extensions.register_manifest_yaml(yaml)?;
        Ok(self)
    }

    /// Attach a code ref to already-registered extensions (see
    /// [`ExtensionRegistry::attach_code_ref`]).
    pub fn code_ref(
        mut self,
        predicate: impl FnMut(&Extension) -> bool,
        slot: &str,
        code_ref: CodeRef,
    ) -> Self {
        self.extensions.attach_code_ref(predicate, slot, code_ref);
        self
    }

    /// Set the session's feature flags.
    pub fn feature_flags(mut self, flags: FeatureFlagSet) -> Self {
        self.flags = flags;
        self
    }

    /// Supply an explicit dev override set. Takes precedence over
    /// [`dev_flags`](Self::dev_flags).
    pub fn dev_overrides(mut self, overrides: DevOverrideSet) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Name dev flags to force on; each is matched against the registered
    /// areas' `dev_flag_name` at build time.
    pub fn dev_flags<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.dev_flag_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the singleton conflict policy (default: first registered wins).
    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Finish bootstrap, producing an immutable host.
    pub fn build(self) -> Host {
        let overrides = match self.overrides {
            Some(overrides) => {
                if !self.dev_flag_names.is_empty() {
                    log::warn!("both dev_overrides and dev_flags supplied; dev_flags ignored");
                }
                overrides
            }
            None if !self.dev_flag_names.is_empty() => {
                let forced: Vec<String> = self
                    .areas
                    .ids()
                    .filter_map(|id| {
                        let area = self.areas.get(id)?;
                        let flag = area.dev_flag_name.as_deref()?;
                        self.dev_flag_names
                            .iter()
                            .any(|n| n == flag)
                            .then(|| id.to_string())
                    })
                    .collect();
                for name in &self.dev_flag_names {
                    let known = self.areas.ids().any(|id| {
                        self.areas
                            .get(id)
                            .and_then(|a| a.dev_flag_name.as_deref())
                            == Some(name.as_str())
                    });
                    if !known {
                        log::warn!("dev flag '{name}' matches no registered area");
                    }
                }
                DevOverrideSet::new(forced)
            }
            None => DevOverrideSet::disabled(),
        };

        Host {
            areas: self.areas,
            extensions: self.extensions,
            flags: self.flags,
            overrides,
            store: CapabilityStatusStore::new(),
            area_resolver: AreaResolver::new(),
            extension_resolver: ExtensionResolver::new(self.policy),
            loader: CodeRefLoader::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// The assembled resolution engine: registries, configuration, the
/// capability store, and the code ref loader behind one query surface.
#[derive(Debug)]
pub struct Host {
    areas: AreaRegistry,
    extensions: ExtensionRegistry,
    flags: FeatureFlagSet,
    overrides: DevOverrideSet,
    store: CapabilityStatusStore,
    area_resolver: AreaResolver,
    extension_resolver: ExtensionResolver,
    loader: CodeRefLoader,
}

impl Host {
    /// Start a bootstrap.
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    // -- capability feed ingress -------------------------------------------

    /// Atomically replace the capability snapshot (the feed's only ingress
    /// point). Returns the new snapshot version.
    pub fn replace_capabilities(&self, capabilities: impl IntoIterator<Item = Capability>) -> u64 {
        self.store.replace(capabilities)
    }

    /// The current capability snapshot.
    pub fn capabilities(&self) -> Arc<CapabilitySnapshot> {
        self.store.get()
    }

    /// Version of the current snapshot, for staleness checks.
    pub fn capability_version(&self) -> u64 {
        self.store.version()
    }

    /// When the current snapshot was received, for staleness checks.
    pub fn capability_received_at(&self) -> DateTime<Utc> {
        self.store.received_at()
    }

    // -- area availability -------------------------------------------------

    /// Resolve the availability map against the current snapshot.
    pub fn availability(&self) -> Arc<AvailabilityMap> {
        self.area_resolver
            .resolve(&self.areas, &self.store.get(), &self.flags, &self.overrides)
    }

    /// Whether one area is available. Unregistered areas are not.
    pub fn is_area_available(&self, area_id: &str) -> bool {
        self.availability().get(area_id).copied().unwrap_or(false)
    }

    // -- extension queries -------------------------------------------------

    /// All currently active extensions, in registration order.
    pub fn active_extensions(&self) -> Vec<&Extension> {
        self.extension_resolver
            .active(&self.extensions, &self.availability())
    }

    /// Active extensions matching a predicate, in registration order.
    pub fn query_extensions(
        &self,
        predicate: impl FnMut(&Extension) -> bool,
    ) -> Vec<&Extension> {
        self.extension_resolver
            .query(&self.extensions, &self.availability(), predicate)
    }

    /// Active extensions of one type, through the typed view.
    pub fn extensions_of_type<T: ExtensionProps>(&self) -> Vec<(T, &Extension)> {
        self.extension_resolver
            .of_type::<T>(&self.extensions, &self.availability())
    }

    /// The single active extension of one type, per the conflict policy.
    pub fn single_extension_of_type<T: ExtensionProps>(&self) -> Option<(T, &Extension)> {
        self.extension_resolver
            .single_of_type::<T>(&self.extensions, &self.availability())
    }

    // -- code refs ---------------------------------------------------------

    /// Resolve an extension's code ref by slot name, loading on first
    /// request and coalescing concurrent requests.
    pub async fn resolve_code_ref(
        &self,
        extension: &Extension,
        slot: &str,
    ) -> Result<Arc<Value>, CodeRefError> {
        let code_ref = extension
            .code_ref(slot)
            .ok_or_else(|| CodeRefError::MissingSlot(slot.to_string()))?;
        self.loader.resolve(code_ref).await
    }

    /// Observe a code ref's cache state without driving the load.
    pub fn code_ref_state(&self, code_ref: &CodeRef) -> Resource<Arc<Value>, CodeRefError> {
        self.loader.state(code_ref)
    }

    /// Drop a code ref's cache entry for a manual retry.
    pub fn invalidate_code_ref(&self, code_ref: &CodeRef) -> bool {
        self.loader.invalidate(code_ref)
    }
}
