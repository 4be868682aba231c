//! Lazy code loading: code refs, the resource state machine, and the
//! coalescing identity-keyed loader cache.

pub mod code_ref;
pub mod loader;
pub mod resource;

pub use code_ref::{CodeRef, CodeRefError};
pub use loader::CodeRefLoader;
pub use resource::Resource;
