//! Extension system errors.

use thiserror::Error;

/// Errors that can occur while registering or interpreting extensions.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// YAML manifest parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON manifest or property parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest file I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest file has an unsupported format.
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    /// An extension's declared type does not match the requested view.
    #[error("extension type mismatch: expected '{expected}', found '{actual}'")]
    TypeMismatch {
        /// The type the typed view expects.
        expected: String,
        /// The type the extension declares.
        actual: String,
    },
}
