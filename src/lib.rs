//! # Switchboard
//!
//! The capability-and-extension resolution core of a modular dashboard.
//!
//! A dashboard exposes many optional subsystems — *areas* — each enabled
//! based on what is installed in the target cluster, which feature flags
//! are set, and which other areas it relies on. Independently built plugin
//! modules contribute declarative *extensions* (navigation entries, routes,
//! tabs, lazily loaded components) that must be filtered, at runtime, to
//! exactly the set valid for the current cluster state.
//!
//! This crate implements that engine:
//!
//! 1. [`capabilities`] — immutable, versioned snapshots of cluster-reported
//!    capability status, replaced wholesale by the external feed.
//! 2. [`areas`] — static area definitions and the pure, memoized,
//!    cycle-safe resolver that derives a boolean availability map.
//! 3. [`extensions`] — the order-preserving registry of plugin
//!    contributions and the resolver that filters them against the map.
//! 4. [`coderef`] — on-demand, deduplicated, permanently cached loading of
//!    the lazy code each extension references.
//! 5. [`host`] — the explicit bootstrap phase and the consumer query
//!    surface tying the pieces together.
//!
//! Rendering, routing mechanics, and the transport that physically fetches
//! plugin code live outside this crate; the loader is injected as a
//! closure.

pub mod areas;
pub mod capabilities;
pub mod coderef;
pub mod config;
pub mod extensions;
pub mod host;

pub use areas::{Area, AreaRegistry, AreaResolver, AvailabilityMap};
pub use capabilities::{Capability, CapabilitySnapshot, CapabilityStatusStore};
pub use coderef::{CodeRef, CodeRefError, CodeRefLoader, Resource};
pub use config::{DevOverrideSet, FeatureFlagSet};
pub use extensions::{
    ConflictPolicy, Extension, ExtensionError, ExtensionFlags, ExtensionProps, ExtensionRegistry,
    ExtensionResolver, NavItemProperties, NavSectionProperties, RouteProperties, TabProperties,
};
pub use host::{Host, HostBuilder, HostError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
