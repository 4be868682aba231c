//! Extensions: declarative plugin contributions, the order-preserving
//! registry they aggregate into, and the resolver that filters them
//! against area availability.

pub mod error;
pub mod extension;
pub mod registry;
pub mod resolver;

pub use error::ExtensionError;
pub use extension::{
    Extension, ExtensionFlags, ExtensionProps, NavItemProperties, NavSectionProperties,
    RouteProperties, TabProperties,
};
pub use registry::ExtensionRegistry;
pub use resolver::{ConflictPolicy, ExtensionResolver};
