//! Transit data models, types, and traits.

pub mod fleet;
pub mod ride;
pub mod route;
pub mod section;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use fleet::{Bus, Stop};
pub use ride::Ride;
pub use route::Route;
pub use section::Section;
pub use traits::{HasPath, NetworkProvider, SectionLookup};
pub use types::{GeoCoordinate, JointPolicy, Result, RideStatus, TransitError, TransitionPolicy};
