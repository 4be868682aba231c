//! Extension resolution — filtering contributions against area availability.
//!
//! Given a fixed availability map, filtering is pure: an extension is active
//! iff every required area is available and no disallowed area is. Malformed
//! entries (empty type, flags naming areas the map has never heard of) are
//! skipped with a warning so one broken plugin contribution never disables
//! unrelated ones.

use crate::areas::AvailabilityMap;

use super::extension::{Extension, ExtensionProps};
use super::registry::ExtensionRegistry;

// ---------------------------------------------------------------------------
// ConflictPolicy
// ---------------------------------------------------------------------------

/// Tie-break when a slot the host expects to be singular receives more than
/// one active contribution.
///
/// An explicit, configured policy: hosts pick one at bootstrap instead of
/// inheriting an accidental precedence from iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The earliest registered active match wins.
    #[default]
    FirstRegistered,
    /// The latest registered active match wins.
    LastRegistered,
}

// ---------------------------------------------------------------------------
// ExtensionResolver
// ---------------------------------------------------------------------------

/// Query surface over an [`ExtensionRegistry`] for one availability map.
#[derive(Debug, Default)]
pub struct ExtensionResolver {
    policy: ConflictPolicy,
}

impl ExtensionResolver {
    /// Create a resolver with the given singleton conflict policy.
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    /// The configured conflict policy.
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Whether one extension is active under the given availability map.
    ///
    /// Malformed entries are inactive and logged; see module docs.
    pub fn is_active(&self, extension: &Extension, availability: &AvailabilityMap) -> bool {
        if extension.ty.is_empty() {
            log::warn!("skipping extension with empty type; properties: {}", extension.properties);
            return false;
        }

        for area_id in &extension.flags.required {
            match availability.get(area_id) {
                Some(true) => {}
                Some(false) => return false,
                None => {
                    log::warn!(
                        "skipping '{}' extension: required area '{area_id}' is not a known area",
                        extension.ty,
                    );
                    return false;
                }
            }
        }

        for area_id in &extension.flags.disallowed {
            match availability.get(area_id) {
                Some(true) => return false,
                Some(false) => {}
                None => {
                    log::warn!(
                        "skipping '{}' extension: disallowed area '{area_id}' is not a known area",
                        extension.ty,
                    );
                    return false;
                }
            }
        }

        true
    }

    /// All active extensions, in registration order.
    pub fn active<'r>(
        &self,
        registry: &'r ExtensionRegistry,
        availability: &AvailabilityMap,
    ) -> Vec<&'r Extension> {
        registry
            .iter()
            .filter(|ext| self.is_active(ext, availability))
            .collect()
    }

    /// Active extensions matching the caller's predicate, in registration
    /// order. Activity is checked first, then the predicate.
    pub fn query<'r>(
        &self,
        registry: &'r ExtensionRegistry,
        availability: &AvailabilityMap,
        mut predicate: impl FnMut(&Extension) -> bool,
    ) -> Vec<&'r Extension> {
        registry
            .iter()
            .filter(|ext| self.is_active(ext, availability) && predicate(ext))
            .collect()
    }

    /// Active extensions of one type, deserialized through the typed view.
    ///
    /// Entries whose property record fails to parse are skipped with a
    /// warning rather than failing the whole query.
    pub fn of_type<'r, T: ExtensionProps>(
        &self,
        registry: &'r ExtensionRegistry,
        availability: &AvailabilityMap,
    ) -> Vec<(T, &'r Extension)> {
        registry
            .iter()
            .filter(|ext| ext.ty == T::TYPE && self.is_active(ext, availability))
            .filter_map(|ext| match ext.parse::<T>() {
                Ok(props) => Some((props, ext)),
                Err(err) => {
                    log::warn!("skipping malformed '{}' extension: {err}", ext.ty);
                    None
                }
            })
            .collect()
    }

    /// The single active extension of one type, per the conflict policy.
    ///
    /// Logs when a conflict is actually resolved by policy so accidental
    /// double registration is visible.
    pub fn single_of_type<'r, T: ExtensionProps>(
        &self,
        registry: &'r ExtensionRegistry,
        availability: &AvailabilityMap,
    ) -> Option<(T, &'r Extension)> {
        let mut matches = self.of_type::<T>(registry, availability);
        if matches.len() > 1 {
            log::debug!(
                "{} active '{}' extensions contributed for a singular slot; applying {:?}",
                matches.len(),
                T::TYPE,
                self.policy,
            );
        }
        match self.policy {
            ConflictPolicy::FirstRegistered => {
                if matches.is_empty() {
                    None
                } else {
                    Some(matches.remove(0))
                }
            }
            ConflictPolicy::LastRegistered => matches.pop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::extensions::extension::{NavItemProperties, TabProperties};

    use super::*;

    fn availability(entries: &[(&str, bool)]) -> AvailabilityMap {
        entries
            .iter()
            .map(|(id, v)| (id.to_string(), *v))
            .collect()
    }

    fn nav(id: &str) -> Extension {
        Extension::new(
            NavItemProperties::TYPE,
            json!({"id": id, "title": id, "href": format!("/{id}")}),
        )
    }

    #[test]
    fn required_and_disallowed_flags() {
        let resolver = ExtensionResolver::default();
        let ext = nav("serving").require("a").require("b").disallow("c");

        let map = availability(&[("a", true), ("b", true), ("c", false)]);
        assert!(resolver.is_active(&ext, &map));

        let map = availability(&[("a", true), ("b", false), ("c", false)]);
        assert!(!resolver.is_active(&ext, &map));

        // The disallowed area flipping on deactivates the extension even
        // with every required area still available.
        let map = availability(&[("a", true), ("b", true), ("c", true)]);
        assert!(!resolver.is_active(&ext, &map));
    }

    #[test]
    fn no_flags_means_always_active() {
        let resolver = ExtensionResolver::default();
        assert!(resolver.is_active(&nav("home"), &AvailabilityMap::new()));
    }

    #[test]
    fn unknown_area_in_flags_is_malformed() {
        let resolver = ExtensionResolver::default();
        let map = availability(&[("a", true)]);

        assert!(!resolver.is_active(&nav("x").require("ghost"), &map));
        assert!(!resolver.is_active(&nav("x").disallow("ghost"), &map));
    }

    #[test]
    fn empty_type_is_malformed() {
        let resolver = ExtensionResolver::default();
        let ext = Extension::new("", json!({}));
        assert!(!resolver.is_active(&ext, &AvailabilityMap::new()));
    }

    #[test]
    fn broken_entry_does_not_disable_others() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut registry = ExtensionRegistry::new();
        registry.register(vec![
            nav("first"),
            nav("broken").require("ghost"),
            nav("last"),
        ]);

        let resolver = ExtensionResolver::default();
        let active = resolver.active(&registry, &AvailabilityMap::new());
        let ids: Vec<_> = active
            .iter()
            .map(|e| e.property("id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["first", "last"]);
    }

    #[test]
    fn of_type_skips_unparseable_properties() {
        let mut registry = ExtensionRegistry::new();
        registry.register(vec![
            nav("good"),
            // Same type, but the record is missing `href`.
            Extension::new(NavItemProperties::TYPE, json!({"id": "bad", "title": "Bad"})),
        ]);

        let resolver = ExtensionResolver::default();
        let items = resolver.of_type::<NavItemProperties>(&registry, &AvailabilityMap::new());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0.id, "good");
    }

    #[test]
    fn query_preserves_registration_order() {
        let mut registry = ExtensionRegistry::new();
        registry.register(vec![nav("b"), nav("a"), nav("c")]);

        let resolver = ExtensionResolver::default();
        let hits = resolver.query(&registry, &AvailabilityMap::new(), |e| {
            e.property("id").and_then(|v| v.as_str()) != Some("a")
        });
        let ids: Vec<_> = hits
            .iter()
            .map(|e| e.property("id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn singleton_conflict_policies() {
        let tab = |id: &str| {
            Extension::new(
                TabProperties::TYPE,
                json!({"id": id, "title": id, "section": "overview"}),
            )
        };
        let mut registry = ExtensionRegistry::new();
        registry.register(vec![tab("from-plugin-a")]);
        registry.register(vec![tab("from-plugin-b")]);

        let first = ExtensionResolver::new(ConflictPolicy::FirstRegistered);
        let winner = first
            .single_of_type::<TabProperties>(&registry, &AvailabilityMap::new())
            .unwrap();
        assert_eq!(winner.0.id, "from-plugin-a");

        let last = ExtensionResolver::new(ConflictPolicy::LastRegistered);
        let winner = last
            .single_of_type::<TabProperties>(&registry, &AvailabilityMap::new())
            .unwrap();
        assert_eq!(winner.0.id, "from-plugin-b");
    }

    #[test]
    fn filtering_is_deterministic_for_a_fixed_map() {
        let mut registry = ExtensionRegistry::new();
        registry.register(vec![nav("one").require("a"), nav("two"), nav("three").disallow("a")]);
        let map = availability(&[("a", true)]);

        let resolver = ExtensionResolver::default();
        let first: Vec<_> = resolver
            .active(&registry, &map)
            .iter()
            .map(|e| e.property("id").cloned())
            .collect();
        let second: Vec<_> = resolver
            .active(&registry, &map)
            .iter()
            .map(|e| e.property("id").cloned())
            .collect();
        assert_eq!(first, second);
    }
}
