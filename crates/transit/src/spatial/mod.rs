//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use queries::{haversine_distance, path_length, search_bounds, EARTH_RADIUS_M};
