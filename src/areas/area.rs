//! Area definitions.
//!
//! An area is a named, independently enableable subsystem of the dashboard
//! (model serving, pipelines, notebooks, ...). Its definition lists what the
//! area needs before it can be shown: cluster capabilities, feature flags,
//! and other areas it relies on.

use serde::{Deserialize, Serialize};

/// Static definition of one area, registered once at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Area identifier (e.g., `"model-serving"`).
    pub id: String,
    /// Capability ids that must be installed and enabled in the cluster.
    #[serde(default)]
    pub required_capabilities: Vec<String>,
    /// Area ids this area relies on; all must resolve available.
    #[serde(default)]
    pub reliant_areas: Vec<String>,
    /// Feature flag ids that must be set to `true`.
    #[serde(default)]
    pub required_flags: Vec<String>,
    /// Name of the dev flag that force-enables this area, if any.
    #[serde(default)]
    pub dev_flag_name: Option<String>,
}

impl Area {
    /// Create an area with no requirements (always available).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            required_capabilities: Vec::new(),
            reliant_areas: Vec::new(),
            required_flags: Vec::new(),
            dev_flag_name: None,
        }
    }

    /// Require a cluster capability.
    pub fn require_capability(mut self, id: impl Into<String>) -> Self {
        self.required_capabilities.push(id.into());
        self
    }

    /// Require another area to be available.
    pub fn rely_on(mut self, area_id: impl Into<String>) -> Self {
        self.reliant_areas.push(area_id.into());
        self
    }

    /// Require a feature flag to be enabled.
    pub fn require_flag(mut self, flag_id: impl Into<String>) -> Self {
        self.required_flags.push(flag_id.into());
        self
    }

    /// Name the dev flag that can force-enable this area.
    pub fn dev_flag(mut self, name: impl Into<String>) -> Self {
        self.dev_flag_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_requirements() {
        let area = Area::new("model-serving")
            .require_capability("kserve")
            .require_flag("modelServing")
            .rely_on("projects");

        assert_eq!(area.id, "model-serving");
        assert_eq!(area.required_capabilities, vec!["kserve"]);
        assert_eq!(area.required_flags, vec!["modelServing"]);
        assert_eq!(area.reliant_areas, vec!["projects"]);
        assert!(area.dev_flag_name.is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let area: Area = serde_yaml::from_str("id: home\n").unwrap();
        assert_eq!(area.id, "home");
        assert!(area.required_capabilities.is_empty());
        assert!(area.reliant_areas.is_empty());
    }
}
