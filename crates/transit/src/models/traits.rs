//! Core traits for transit entities.
//!
//! Routes never hold sections; geometry is resolved through a
//! [`SectionLookup`] supplied by the caller. Implementations can be plain
//! maps or a full [`NetworkProvider`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use geojson::{Feature, FeatureCollection};

use crate::identifiers::*;
use crate::models::fleet::{Bus, Stop};
use crate::models::ride::Ride;
use crate::models::route::Route;
use crate::models::section::Section;
use crate::models::types::*;
use crate::spatial::queries::path_length;

// ============================================================================
// Geometry Traits
// ============================================================================

/// Anything exposing an ordered coordinate path
pub trait HasPath {
    fn path(&self) -> &[GeoCoordinate];

    /// Length in meters; defaults to the Haversine length of the path
    fn length(&self) -> f64 {
        path_length(self.path())
    }
}

impl HasPath for Vec<GeoCoordinate> {
    fn path(&self) -> &[GeoCoordinate] {
        self
    }
}

/// Resolves section identifiers to path-bearing entries
///
/// Lookups are read-only; composition never mutates what it resolves.
pub trait SectionLookup {
    type Entry: HasPath + ?Sized;

    fn lookup(&self, id: SectionIdentifier) -> Option<&Self::Entry>;
}

impl<T: HasPath, S: BuildHasher> SectionLookup for HashMap<SectionIdentifier, T, S> {
    type Entry = T;

    fn lookup(&self, id: SectionIdentifier) -> Option<&T> {
        self.get(&id)
    }
}

impl<T: HasPath> SectionLookup for BTreeMap<SectionIdentifier, T> {
    type Entry = T;

    fn lookup(&self, id: SectionIdentifier) -> Option<&T> {
        self.get(&id)
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Provider of all network data with lookup and query methods
pub trait NetworkProvider: SectionLookup<Entry = Section> + Send + Sync {
    // ---- Lookups ----
    fn get_stop(&self, id: StopIdentifier) -> Option<&Stop>;
    fn get_bus(&self, id: BusIdentifier) -> Option<&Bus>;
    fn get_section(&self, id: SectionIdentifier) -> Option<&Section>;
    fn get_route(&self, id: RouteIdentifier) -> Option<&Route>;
    fn get_ride(&self, id: RideIdentifier) -> Option<&Ride>;

    // ---- Collections ----
    fn all_stops(&self) -> Vec<&Stop>;
    fn all_buses(&self) -> Vec<&Bus>;
    fn all_sections(&self) -> Vec<&Section>;
    fn all_routes(&self) -> Vec<&Route>;
    fn all_rides(&self) -> Vec<&Ride>;

    // ---- Spatial queries ----

    /// Find stops within radius (meters)
    fn stops_near(&self, point: GeoCoordinate, radius_m: f64) -> Vec<&Stop>;

    /// Find the N nearest stops to a point
    fn nearest_stops(&self, point: GeoCoordinate, n: usize) -> Vec<&Stop>;

    // ---- Geometry ----

    /// Composed path of a route, per the provider's joint policy
    fn route_coordinates(&self, id: RouteIdentifier) -> Result<Vec<GeoCoordinate>>;

    /// GeoJSON feature of a route, per the provider's joint policy
    fn route_geojson(&self, id: RouteIdentifier) -> Result<Feature>;

    /// Every section followed by every route
    fn feature_collection(&self) -> FeatureCollection;
}
