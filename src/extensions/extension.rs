//! Extension model.
//!
//! An extension is one declarative contribution from a plugin module: a
//! navigation entry, a route, a tab, a lazily loaded component. At the
//! registry level its properties stay an opaque JSON record so independently
//! built plugins can contribute shapes the host has never seen; consumers
//! that know a type deserialize the record through a typed view
//! ([`ExtensionProps`]) and match exhaustively from there.
//!
//! Code refs are attached beside the record as named slots rather than
//! inside it — a Rust closure cannot live in a JSON value.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coderef::CodeRef;

use super::error::ExtensionError;

// ---------------------------------------------------------------------------
// Extension
// ---------------------------------------------------------------------------

/// Area gating for one extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionFlags {
    /// Area ids that must all be available for the extension to be active.
    #[serde(default)]
    pub required: Vec<String>,
    /// Area ids that each must be unavailable for the extension to be active.
    #[serde(default)]
    pub disallowed: Vec<String>,
}

/// One declarative plugin contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extension {
    /// Discriminant, e.g. `"app.navigation/href"`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Area gating flags.
    #[serde(default)]
    pub flags: ExtensionFlags,
    /// Opaque property record, interpreted by typed views.
    #[serde(default)]
    pub properties: Value,
    /// Lazily loaded code, by slot name. Not part of the declarative
    /// manifest; attached programmatically after registration.
    #[serde(skip)]
    pub code_refs: HashMap<String, CodeRef>,
}

impl Extension {
    /// Create an extension of the given type with a property record.
    pub fn new(ty: impl Into<String>, properties: Value) -> Self {
        Self {
            ty: ty.into(),
            flags: ExtensionFlags::default(),
            properties,
            code_refs: HashMap::new(),
        }
    }

    /// Require an area to be available.
    pub fn require(mut self, area_id: impl Into<String>) -> Self {
        self.flags.required.push(area_id.into());
        self
    }

    /// Deactivate this extension whenever an area is available.
    pub fn disallow(mut self, area_id: impl Into<String>) -> Self {
        self.flags.disallowed.push(area_id.into());
        self
    }

    /// Attach a code ref under a named slot.
    pub fn with_code_ref(mut self, slot: impl Into<String>, code_ref: CodeRef) -> Self {
        self.code_refs.insert(slot.into(), code_ref);
        self
    }

    /// Look up a code ref by slot name.
    pub fn code_ref(&self, slot: &str) -> Option<&CodeRef> {
        self.code_refs.get(slot)
    }

    /// Read one top-level property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Deserialize the property record into a typed view.
    ///
    /// Checks the declared type first so a `RouteProperties` view can never
    /// silently parse a navigation entry that happens to share field names.
    pub fn parse<T: ExtensionProps>(&self) -> Result<T, ExtensionError> {
        if self.ty != T::TYPE {
            return Err(ExtensionError::TypeMismatch {
                expected: T::TYPE.to_string(),
                actual: self.ty.clone(),
            });
        }
        Ok(serde_json::from_value(self.properties.clone())?)
    }
}

// ---------------------------------------------------------------------------
// Typed property views
// ---------------------------------------------------------------------------

/// A typed view over an extension's opaque property record.
pub trait ExtensionProps: DeserializeOwned {
    /// The `type` discriminant this view corresponds to.
    const TYPE: &'static str;
}

/// Properties of a navigation link (`app.navigation/href`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItemProperties {
    /// Stable nav entry id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Target location.
    pub href: String,
    /// Route pattern that marks this entry active, if different from `href`.
    #[serde(default)]
    pub path: Option<String>,
    /// Id of the section this entry nests under.
    #[serde(default)]
    pub section: Option<String>,
    /// Sort group key for presentation ordering.
    #[serde(default)]
    pub group: Option<String>,
}

impl ExtensionProps for NavItemProperties {
    const TYPE: &'static str = "app.navigation/href";
}

/// Properties of a navigation section (`app.navigation/section`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSectionProperties {
    /// Stable section id, referenced by nav items.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Sort group key for presentation ordering.
    #[serde(default)]
    pub group: Option<String>,
}

impl ExtensionProps for NavSectionProperties {
    const TYPE: &'static str = "app.navigation/section";
}

/// Properties of a routed page (`app.route`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteProperties {
    /// Route pattern.
    pub path: String,
    /// Code ref slot holding the page component.
    #[serde(default = "default_component_slot")]
    pub component: String,
}

impl ExtensionProps for RouteProperties {
    const TYPE: &'static str = "app.route";
}

/// Properties of a details tab (`app.tab`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabProperties {
    /// Stable tab id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Id of the section or page this tab belongs to.
    pub section: String,
    /// Code ref slot holding the tab content component.
    #[serde(default = "default_component_slot")]
    pub component: String,
}

impl ExtensionProps for TabProperties {
    const TYPE: &'static str = "app.tab";
}

fn default_component_slot() -> String {
    "component".to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_typed_view() {
        let ext = Extension::new(
            NavItemProperties::TYPE,
            json!({"id": "serving", "title": "Model serving", "href": "/serving", "group": "4_serving"}),
        )
        .require("model-serving");

        let nav: NavItemProperties = ext.parse().unwrap();
        assert_eq!(nav.id, "serving");
        assert_eq!(nav.href, "/serving");
        assert_eq!(nav.group.as_deref(), Some("4_serving"));
        assert!(nav.section.is_none());
    }

    #[test]
    fn parse_rejects_mismatched_type() {
        let ext = Extension::new(
            "app.route",
            json!({"id": "x", "title": "X", "href": "/x"}),
        );
        let err = ext.parse::<NavItemProperties>().unwrap_err();
        assert!(matches!(err, ExtensionError::TypeMismatch { .. }));
    }

    #[test]
    fn route_component_slot_defaults() {
        let ext = Extension::new(RouteProperties::TYPE, json!({"path": "/serving/*"}));
        let route: RouteProperties = ext.parse().unwrap();
        assert_eq!(route.component, "component");
    }

    #[test]
    fn code_ref_slots() {
        let ext = Extension::new(RouteProperties::TYPE, json!({"path": "/serving/*"}))
            .with_code_ref("component", CodeRef::ready(json!("ServingPage")));
        assert!(ext.code_ref("component").is_some());
        assert!(ext.code_ref("icon").is_none());
    }

    #[test]
    fn manifest_deserialization_defaults() {
        let ext: Extension = serde_yaml::from_str(
            "type: app.navigation/section\nproperties:\n  id: ai-hub\n  title: AI hub\n",
        )
        .unwrap();
        assert_eq!(ext.ty, "app.navigation/section");
        assert!(ext.flags.required.is_empty());
        assert!(ext.code_refs.is_empty());
    }
}
