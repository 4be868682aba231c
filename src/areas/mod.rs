//! Areas: independently enableable dashboard subsystems, their static
//! registry, and the availability resolver.

pub mod area;
pub mod registry;
pub mod resolver;

pub use area::Area;
pub use registry::AreaRegistry;
pub use resolver::{compute_availability, AreaResolver, AvailabilityMap};
