//! # transit-network
//!
//! In-memory model of a bus network with geometry derivation and GeoJSON
//! export.
//!
//! ## Features
//!
//! - **Great-circle lengths**: section lengths derived from coordinate paths
//! - **Route composition**: route paths assembled from shared sections by id
//! - **GeoJSON output**: LineString features for sections and routes
//! - **Ride lifecycle**: permissive or strict status transitions
//! - **Checked input**: typed errors when loading untyped JSON
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use transit_network::prelude::*;
//!
//! let inbound = Section::new(
//!     SectionIdentifier::new(1),
//!     StopIdentifier::new(10),
//!     StopIdentifier::new(11),
//!     vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(0.0, 1.0)],
//!     None,
//! );
//! assert!((inbound.length() - 111_195.0).abs() < 1.0);
//!
//! let sections = HashMap::from([(inbound.id(), inbound)]);
//!
//! let mut route = Route::new(RouteIdentifier::new(4), "Line 4");
//! route
//!     .add_section(SectionIdentifier::new(1))
//!     .add_section(SectionIdentifier::new(2)); // unknown, skipped
//!
//! assert_eq!(route.coordinates(&sections).len(), 2);
//!
//! let feature = route.to_geojson(&sections);
//! assert_eq!(feature.properties.unwrap()["name"], "Line 4");
//! ```

pub mod config;
pub mod export;
pub mod identifiers;
pub mod models;
pub mod parse;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::NetworkConfig;
    pub use crate::identifiers::*;
    pub use crate::models::{
        fleet::*, ride::Ride, route::Route, section::Section, traits::*, types::*,
    };
    pub use crate::parse::{NetworkDocument, ParseOptions};
    pub use crate::provider::StaticNetworkProvider;
    pub use crate::spatial::queries::{haversine_distance, path_length};
}

pub use prelude::*;
