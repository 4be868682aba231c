//! Cluster capability status: model, immutable snapshots, and the store
//! the external feed replaces them through.

pub mod capability;
pub mod store;

pub use capability::{Capability, CapabilitySnapshot};
pub use store::CapabilityStatusStore;
