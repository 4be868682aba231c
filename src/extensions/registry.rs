//! Extension registry — aggregated plugin contributions.
//!
//! Each plugin module contributes its extension list once during bootstrap.
//! The registry preserves registration order; downstream consumers use that
//! order only for presentation and for the explicit singleton conflict
//! policy, never for resolution semantics.
//!
//! Besides programmatic registration, plugins whose contributions are pure
//! data can ship a YAML or JSON manifest. Code refs cannot be expressed in
//! data, so they are attached to matching entries after the manifest loads.

use std::path::Path;

use serde::Deserialize;

use crate::coderef::CodeRef;

use super::error::ExtensionError;
use super::extension::Extension;

/// Order-preserving list of all contributed extensions.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    entries: Vec<Extension>,
}

/// Manifest wrapper form: `extensions:` followed by the list.
#[derive(Debug, Deserialize)]
struct ManifestWrapper {
    extensions: Vec<Extension>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one plugin module's extensions, preserving order.
    pub fn register(&mut self, extensions: Vec<Extension>) {
        self.entries.extend(extensions);
    }

    /// Register a single extension.
    pub fn register_one(&mut self, extension: Extension) {
        self.entries.push(extension);
    }

    /// Register data-only extensions from a YAML manifest.
    ///
    /// The manifest is either a bare list of extensions or a document with
    /// an `extensions:` key. Returns how many entries were registered.
    pub fn register_manifest_yaml(&mut self, yaml: &str) -> Result<usize, ExtensionError> {
        // Try the bare-list form first, then the wrapped form.
        let extensions = match serde_yaml::from_str::<Vec<Extension>>(yaml) {
            Ok(list) => list,
            Err(_) => serde_yaml::from_str::<ManifestWrapper>(yaml)?.extensions,
        };
        let count = extensions.len();
        self.entries.extend(extensions);
        Ok(count)
    }

    /// Register data-only extensions from a JSON manifest.
    pub fn register_manifest_json(&mut self, json: &str) -> Result<usize, ExtensionError> {
        let extensions = match serde_json::from_str::<Vec<Extension>>(json) {
            Ok(list) => list,
            Err(_) => serde_json::from_str::<ManifestWrapper>(json)?.extensions,
        };
        let count = extensions.len();
        self.entries.extend(extensions);
        Ok(count)
    }

    /// Register a manifest file, dispatching on its extension.
    pub fn register_manifest_file(&mut self, path: &Path) -> Result<usize, ExtensionError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => self.register_manifest_yaml(&content),
            Some("json") => self.register_manifest_json(&content),
            other => Err(ExtensionError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Attach a code ref to every registered entry matching the predicate.
    ///
    /// Used after manifest loading to wire lazily loaded components onto
    /// data-declared extensions. Returns how many entries were updated.
    pub fn attach_code_ref(
        &mut self,
        mut predicate: impl FnMut(&Extension) -> bool,
        slot: &str,
        code_ref: CodeRef,
    ) -> usize {
        let mut attached = 0;
        for entry in self.entries.iter_mut().filter(|e| predicate(e)) {
            entry.code_refs.insert(slot.to_string(), code_ref.clone());
            attached += 1;
        }
        attached
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[Extension] {
        &self.entries
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.entries.iter()
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no extensions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
