//! Area registry — the static table of area definitions.
//!
//! Populated once during the explicit bootstrap phase and immutable
//! afterwards. The registry holds no resolution logic; it only answers
//! lookups and iterates definitions in registration order so the resolver
//! produces the availability map deterministically.

use std::collections::HashMap;

use super::area::Area;

/// Table of [`Area`] definitions, indexed by id, iterated in registration
/// order.
#[derive(Debug, Default)]
pub struct AreaRegistry {
    areas: HashMap<String, Area>,
    order: Vec<String>,
}

impl AreaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an area definition.
    ///
    /// Re-registering an id replaces the earlier definition; that is almost
    /// always a bootstrap mistake, so it is logged.
    pub fn register(&mut self, area: Area) {
        let id = area.id.clone();
        if self.areas.insert(id.clone(), area).is_some() {
            log::warn!("area '{id}' registered twice; later definition wins");
        } else {
            self.order.push(id);
        }
    }

    /// Look up an area definition by id.
    pub fn get(&self, id: &str) -> Option<&Area> {
        self.areas.get(id)
    }

    /// Whether an area with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.areas.contains_key(id)
    }

    /// Area ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered areas.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether no areas are registered.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
