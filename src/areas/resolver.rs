//! Area availability resolution.
//!
//! Turns one coherent set of inputs — a capability snapshot, the session's
//! feature flags, and the dev override set — into a boolean availability
//! map over every registered area. Resolution is a pure function of those
//! inputs: the whole map is computed in one pass and memoized against the
//! input versions, so repeated queries never re-derive individual areas
//! against different input revisions.
//!
//! Reliance edges between areas are followed recursively with an explicit
//! in-progress path. A reliance cycle terminates immediately: every area in
//! the cycle resolves unavailable and a diagnostic identifying the cycle is
//! logged.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::capabilities::CapabilitySnapshot;
use crate::config::{DevOverrideSet, FeatureFlagSet};

use super::registry::AreaRegistry;

/// Resolved availability per area id, for one input revision.
pub type AvailabilityMap = HashMap<String, bool>;

// ---------------------------------------------------------------------------
// AreaResolver
// ---------------------------------------------------------------------------

/// Memoizing availability resolver.
///
/// The memo holds the map for the most recent `(snapshot, flags,
/// overrides)` version triple. Inputs are versioned and immutable, so a
/// matching triple guarantees an identical map.
#[derive(Debug, Default)]
pub struct AreaResolver {
    memo: Mutex<Option<Memo>>,
}

#[derive(Debug)]
struct Memo {
    key: (u64, u64, u64),
    map: Arc<AvailabilityMap>,
}

impl AreaResolver {
    /// Create a resolver with an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the full availability map for the given inputs.
    ///
    /// Returns the memoized map when the input versions match the previous
    /// call; otherwise recomputes the whole map.
    pub fn resolve(
        &self,
        registry: &AreaRegistry,
        snapshot: &CapabilitySnapshot,
        flags: &FeatureFlagSet,
        overrides: &DevOverrideSet,
    ) -> Arc<AvailabilityMap> {
        let key = (snapshot.version(), flags.version(), overrides.version());
        let mut memo = self.memo.lock();
        if let Some(m) = memo.as_ref() {
            if m.key == key {
                return Arc::clone(&m.map);
            }
        }

        let map = Arc::new(compute_availability(registry, snapshot, flags, overrides));
        *memo = Some(Memo {
            key,
            map: Arc::clone(&map),
        });
        map
    }

    /// Resolve one area. Unregistered ids are unavailable.
    pub fn is_available(
        &self,
        area_id: &str,
        registry: &AreaRegistry,
        snapshot: &CapabilitySnapshot,
        flags: &FeatureFlagSet,
        overrides: &DevOverrideSet,
    ) -> bool {
        self.resolve(registry, snapshot, flags, overrides)
            .get(area_id)
            .copied()
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Pure computation
// ---------------------------------------------------------------------------

/// Compute the availability map for one coherent set of inputs.
///
/// Public so integrations can resolve against an arbitrary snapshot
/// without touching a resolver's memo.
pub fn compute_availability(
    registry: &AreaRegistry,
    snapshot: &CapabilitySnapshot,
    flags: &FeatureFlagSet,
    overrides: &DevOverrideSet,
) -> AvailabilityMap {
    let mut resolved = AvailabilityMap::with_capacity(registry.len());
    for id in registry.ids() {
        let mut path = Vec::new();
        resolve_area(id, registry, snapshot, flags, overrides, &mut resolved, &mut path);
    }
    resolved
}

/// Resolve one area, recursing through reliance edges.
///
/// `resolved` memoizes finished areas for this computation; `path` is the
/// chain of areas currently being resolved, used to detect cycles.
fn resolve_area(
    id: &str,
    registry: &AreaRegistry,
    snapshot: &CapabilitySnapshot,
    flags: &FeatureFlagSet,
    overrides: &DevOverrideSet,
    resolved: &mut AvailabilityMap,
    path: &mut Vec<String>,
) -> bool {
    if let Some(&known) = resolved.get(id) {
        return known;
    }

    // Dev overrides win over everything, including cycle membership.
    if overrides.is_forced(id) {
        resolved.insert(id.to_string(), true);
        return true;
    }

    if path.iter().any(|p| p == id) {
        log::warn!(
            "area reliance cycle detected ({} -> {id}); every area in the cycle resolves unavailable",
            path.join(" -> "),
        );
        return false;
    }

    let Some(area) = registry.get(id) else {
        log::warn!("area '{id}' is relied on but was never registered; treating as unavailable");
        resolved.insert(id.to_string(), false);
        return false;
    };

    path.push(id.to_string());
    let available = area
        .required_capabilities
        .iter()
        .all(|cap| snapshot.is_usable(cap))
        && area.required_flags.iter().all(|flag| flags.is_enabled(flag))
        && area
            .reliant_areas
            .iter()
            .all(|dep| resolve_area(dep, registry, snapshot, flags, overrides, resolved, path));
    path.pop();

    resolved.insert(id.to_string(), available);
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::area::Area;
    use crate::capabilities::{Capability, CapabilityStatusStore};

    fn serving_registry() -> AreaRegistry {
        let mut registry = AreaRegistry::new();
        registry.register(
            Area::new("serving")
                .require_capability("kserve")
                .require_flag("modelServing"),
        );
        registry
    }

    #[test]
    fn capability_and_flag_requirements() {
        let registry = serving_registry();
        let store = CapabilityStatusStore::new();
        store.replace(vec![Capability::new("kserve", true, true)]);
        let flags = FeatureFlagSet::new([("modelServing", true)]);
        let overrides = DevOverrideSet::disabled();

        let resolver = AreaResolver::new();
        assert!(resolver.is_available("serving", &registry, &store.get(), &flags, &overrides));

        // Disabling the capability flips the area off with the next snapshot.
        store.replace(vec![Capability::new("kserve", true, false)]);
        assert!(!resolver.is_available("serving", &registry, &store.get(), &flags, &overrides));
    }

    #[test]
    fn missing_capability_beats_flags_and_reliances() {
        let registry = serving_registry();
        let store = CapabilityStatusStore::new();
        let flags = FeatureFlagSet::new([("modelServing", true)]);

        let resolver = AreaResolver::new();
        assert!(!resolver.is_available(
            "serving",
            &registry,
            &store.get(),
            &flags,
            &DevOverrideSet::disabled(),
        ));
    }

    #[test]
    fn dev_override_forces_availability() {
        let registry = serving_registry();
        let store = CapabilityStatusStore::new();
        let flags = FeatureFlagSet::default();
        let overrides = DevOverrideSet::new(["serving"]);

        let resolver = AreaResolver::new();
        assert!(resolver.is_available("serving", &registry, &store.get(), &flags, &overrides));
    }

    #[test]
    fn unavailable_reliance_cascades() {
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("x").require_capability("missing"));
        registry.register(Area::new("y").rely_on("x"));
        let store = CapabilityStatusStore::new();

        let map = compute_availability(
            &registry,
            &store.get(),
            &FeatureFlagSet::default(),
            &DevOverrideSet::disabled(),
        );
        assert_eq!(map.get("x"), Some(&false));
        assert_eq!(map.get("y"), Some(&false));
    }

    #[test]
    fn two_area_cycle_resolves_unavailable() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("a").rely_on("b"));
        registry.register(Area::new("b").rely_on("a"));
        let store = CapabilityStatusStore::new();

        let map = compute_availability(
            &registry,
            &store.get(),
            &FeatureFlagSet::default(),
            &DevOverrideSet::disabled(),
        );
        assert_eq!(map.get("a"), Some(&false));
        assert_eq!(map.get("b"), Some(&false));
    }

    #[test]
    fn self_cycle_resolves_unavailable() {
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("a").rely_on("a"));
        let store = CapabilityStatusStore::new();

        let map = compute_availability(
            &registry,
            &store.get(),
            &FeatureFlagSet::default(),
            &DevOverrideSet::disabled(),
        );
        assert_eq!(map.get("a"), Some(&false));
    }

    #[test]
    fn cycle_is_scoped_to_its_members() {
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("a").rely_on("b"));
        registry.register(Area::new("b").rely_on("a"));
        registry.register(Area::new("standalone"));
        let store = CapabilityStatusStore::new();

        let map = compute_availability(
            &registry,
            &store.get(),
            &FeatureFlagSet::default(),
            &DevOverrideSet::disabled(),
        );
        assert_eq!(map.get("standalone"), Some(&true));
    }

    #[test]
    fn overridden_area_breaks_a_cycle_edge() {
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("a").rely_on("b"));
        registry.register(Area::new("b").rely_on("a"));
        let store = CapabilityStatusStore::new();

        let map = compute_availability(
            &registry,
            &store.get(),
            &FeatureFlagSet::default(),
            &DevOverrideSet::new(["b"]),
        );
        // b is forced on; a's reliance on b is satisfied.
        assert_eq!(map.get("b"), Some(&true));
        assert_eq!(map.get("a"), Some(&true));
    }

    #[test]
    fn unregistered_reliance_is_unavailable_and_scoped() {
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("a").rely_on("ghost"));
        registry.register(Area::new("b"));
        let store = CapabilityStatusStore::new();

        let map = compute_availability(
            &registry,
            &store.get(),
            &FeatureFlagSet::default(),
            &DevOverrideSet::disabled(),
        );
        assert_eq!(map.get("a"), Some(&false));
        assert_eq!(map.get("b"), Some(&true));
    }

    #[test]
    fn memo_reuses_map_for_identical_versions() {
        let registry = serving_registry();
        let store = CapabilityStatusStore::new();
        store.replace(vec![Capability::new("kserve", true, true)]);
        let flags = FeatureFlagSet::new([("modelServing", true)]);
        let overrides = DevOverrideSet::disabled();

        let resolver = AreaResolver::new();
        let snap = store.get();
        let first = resolver.resolve(&registry, &snap, &flags, &overrides);
        let second = resolver.resolve(&registry, &snap, &flags, &overrides);
        assert!(Arc::ptr_eq(&first, &second));

        // A new snapshot version invalidates the memo.
        store.replace(vec![Capability::new("kserve", true, true)]);
        let third = resolver.resolve(&registry, &store.get(), &flags, &overrides);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut registry = AreaRegistry::new();
        registry.register(Area::new("projects"));
        registry.register(Area::new("serving").require_capability("kserve").rely_on("projects"));
        registry.register(Area::new("metrics").rely_on("serving"));
        let store = CapabilityStatusStore::new();
        store.replace(vec![Capability::new("kserve", true, true)]);
        let flags = FeatureFlagSet::default();
        let overrides = DevOverrideSet::disabled();

        let snap = store.get();
        let a = compute_availability(&registry, &snap, &flags, &overrides);
        let b = compute_availability(&registry, &snap, &flags, &overrides);
        assert_eq!(a, b);
    }
}
