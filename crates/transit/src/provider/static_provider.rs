//! In-memory network provider.
//!
//! Stores every entity in id-keyed lookup tables, with an R-tree over stop
//! locations for radius and nearest-neighbor queries. Tables are ordered by
//! identifier so collections and GeoJSON output are deterministic.

use std::collections::BTreeMap;
use std::sync::Arc;

use geojson::{Feature, FeatureCollection};
use rstar::{RTree, AABB};

use crate::config::NetworkConfig;
use crate::export::feature_collection;
use crate::identifiers::*;
use crate::models::{fleet::*, ride::Ride, route::Route, section::Section, traits::*, types::*};
use crate::parse::NetworkDocument;
use crate::spatial::index::StopNode;
use crate::spatial::queries::{haversine_distance, search_bounds};

/// In-memory network provider with spatial indexing
#[derive(Clone)]
pub struct StaticNetworkProvider {
    config: NetworkConfig,

    // Lookup tables
    stops: BTreeMap<StopIdentifier, Arc<Stop>>,
    buses: BTreeMap<BusIdentifier, Bus>,
    sections: BTreeMap<SectionIdentifier, Section>,
    routes: BTreeMap<RouteIdentifier, Route>,
    rides: BTreeMap<RideIdentifier, Ride>,

    // Spatial index
    stop_tree: RTree<StopNode>,
}

/// Insert keyed entries, keeping the last one on duplicate identifiers.
fn index_by<K, V>(kind: &str, items: impl IntoIterator<Item = V>, key: impl Fn(&V) -> K) -> BTreeMap<K, V>
where
    K: Ord + Copy + std::fmt::Display,
{
    let mut map = BTreeMap::new();
    for item in items {
        let id = key(&item);
        if map.insert(id, item).is_some() {
            log::warn!("duplicate {} id {}, keeping the last one", kind, id);
        }
    }
    map
}

impl StaticNetworkProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            config,
            stops: BTreeMap::new(),
            buses: BTreeMap::new(),
            sections: BTreeMap::new(),
            routes: BTreeMap::new(),
            rides: BTreeMap::new(),
            stop_tree: RTree::new(),
        }
    }

    /// Build provider from raw data
    ///
    /// Every ride adopts the configured transition policy.
    pub fn from_data(
        stops: Vec<Stop>,
        buses: Vec<Bus>,
        sections: Vec<Section>,
        routes: Vec<Route>,
        rides: Vec<Ride>,
        config: NetworkConfig,
    ) -> Self {
        let stops = index_by("stop", stops.into_iter().map(Arc::new), |s: &Arc<Stop>| s.id());
        let buses = index_by("bus", buses, Bus::id);
        let sections = index_by("section", sections, Section::id);
        let routes = index_by("route", routes, Route::id);
        let rides = index_by(
            "ride",
            rides
                .into_iter()
                .map(|ride| ride.with_policy(config.transition_policy)),
            Ride::id,
        );

        // Build spatial index
        let stop_tree = RTree::bulk_load(stops.values().cloned().map(StopNode::new).collect());

        log::debug!(
            "network loaded: {} stops, {} buses, {} sections, {} routes, {} rides",
            stops.len(),
            buses.len(),
            sections.len(),
            routes.len(),
            rides.len()
        );

        Self {
            config,
            stops,
            buses,
            sections,
            routes,
            rides,
            stop_tree,
        }
    }

    pub fn from_document(document: NetworkDocument, config: NetworkConfig) -> Self {
        Self::from_data(
            document.stops,
            document.buses,
            document.sections,
            document.routes,
            document.rides,
            config,
        )
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Mutable access for driving a ride through its lifecycle
    pub fn ride_mut(&mut self, id: RideIdentifier) -> Result<&mut Ride> {
        self.rides.get_mut(&id).ok_or(TransitError::RideNotFound(id))
    }
}

impl Default for StaticNetworkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionLookup for StaticNetworkProvider {
    type Entry = Section;

    fn lookup(&self, id: SectionIdentifier) -> Option<&Section> {
        self.sections.get(&id)
    }
}

impl NetworkProvider for StaticNetworkProvider {
    fn get_stop(&self, id: StopIdentifier) -> Option<&Stop> {
        self.stops.get(&id).map(Arc::as_ref)
    }

    fn get_bus(&self, id: BusIdentifier) -> Option<&Bus> {
        self.buses.get(&id)
    }

    fn get_section(&self, id: SectionIdentifier) -> Option<&Section> {
        self.sections.get(&id)
    }

    fn get_route(&self, id: RouteIdentifier) -> Option<&Route> {
        self.routes.get(&id)
    }

    fn get_ride(&self, id: RideIdentifier) -> Option<&Ride> {
        self.rides.get(&id)
    }

    fn all_stops(&self) -> Vec<&Stop> {
        self.stops.values().map(Arc::as_ref).collect()
    }

    fn all_buses(&self) -> Vec<&Bus> {
        self.buses.values().collect()
    }

    fn all_sections(&self) -> Vec<&Section> {
        self.sections.values().collect()
    }

    fn all_routes(&self) -> Vec<&Route> {
        self.routes.values().collect()
    }

    fn all_rides(&self) -> Vec<&Ride> {
        self.rides.values().collect()
    }

    fn stops_near(&self, point: GeoCoordinate, radius_m: f64) -> Vec<&Stop> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let within = |node: &&StopNode| haversine_distance(point, node.stop.location()) <= radius_m;

        let Some((lower, upper)) = search_bounds(point, radius_m) else {
            return self
                .stop_tree
                .iter()
                .filter(within)
                .map(|node| node.stop.as_ref())
                .collect();
        };

        // The box is narrower than 360°, so the shifted copies never overlap
        let mut found = Vec::new();
        for shift in [-360.0, 0.0, 360.0] {
            let envelope =
                AABB::from_corners([lower[0] + shift, lower[1]], [upper[0] + shift, upper[1]]);
            found.extend(
                self.stop_tree
                    .locate_in_envelope(&envelope)
                    .filter(within)
                    .map(|node| node.stop.as_ref()),
            );
        }
        found
    }

    fn nearest_stops(&self, point: GeoCoordinate, n: usize) -> Vec<&Stop> {
        self.stop_tree
            .nearest_neighbor_iter(&[point.longitude, point.latitude])
            .take(n)
            .map(|node| node.stop.as_ref())
            .collect()
    }

    fn route_coordinates(&self, id: RouteIdentifier) -> Result<Vec<GeoCoordinate>> {
        let route = self.get_route(id).ok_or(TransitError::RouteNotFound(id))?;
        Ok(route.coordinates_with(self, self.config.joint_policy))
    }

    fn route_geojson(&self, id: RouteIdentifier) -> Result<Feature> {
        let route = self.get_route(id).ok_or(TransitError::RouteNotFound(id))?;
        Ok(route.to_geojson_with(self, self.config.joint_policy))
    }

    fn feature_collection(&self) -> FeatureCollection {
        let sections = self.sections.values().map(Section::to_geojson);
        let routes = self
            .routes
            .values()
            .map(|route| route.to_geojson_with(self, self.config.joint_policy));

        feature_collection(sections.chain(routes).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lng: f64, lat: f64) -> GeoCoordinate {
        GeoCoordinate::new(lng, lat)
    }

    fn sample(config: NetworkConfig) -> StaticNetworkProvider {
        let stops = vec![
            Stop::new(StopIdentifier::new(1), "Gare", c(2.3550, 48.8800)),
            Stop::new(StopIdentifier::new(2), "Opéra", c(2.3320, 48.8710)),
            Stop::new(StopIdentifier::new(3), "Louvre", c(2.3380, 48.8610)),
        ];
        let sections = vec![
            Section::new(
                SectionIdentifier::new(10),
                StopIdentifier::new(1),
                StopIdentifier::new(2),
                vec![c(2.3550, 48.8800), c(2.3320, 48.8710)],
                None,
            ),
            Section::new(
                SectionIdentifier::new(11),
                StopIdentifier::new(2),
                StopIdentifier::new(3),
                vec![c(2.3320, 48.8710), c(2.3380, 48.8610)],
                None,
            ),
        ];
        let route = Route::from_parts(
            RouteIdentifier::new(100),
            "Centre",
            vec![SectionIdentifier::new(10), SectionIdentifier::new(11)],
            vec![StopIdentifier::new(1), StopIdentifier::new(2), StopIdentifier::new(3)],
        );
        let bus = Bus::new(BusIdentifier::new(7), "BUS-7", c(2.3550, 48.8800));
        let ride = Ride::new(RideIdentifier::new(1000), bus.id(), route.id());

        StaticNetworkProvider::from_data(stops, vec![bus], sections, vec![route], vec![ride], config)
    }

    #[test]
    fn test_empty_provider() {
        let provider = StaticNetworkProvider::new();
        assert_eq!(provider.all_stops().len(), 0);
        assert_eq!(provider.all_routes().len(), 0);
        assert!(provider.stops_near(c(0.0, 0.0), 1_000.0).is_empty());
        assert!(provider.feature_collection().features.is_empty());
    }

    #[test]
    fn test_provider_lookups() {
        let provider = sample(NetworkConfig::default());

        assert_eq!(provider.get_stop(StopIdentifier::new(2)).unwrap().name(), "Opéra");
        assert!(provider.get_bus(BusIdentifier::new(7)).is_some());
        assert!(provider.get_section(SectionIdentifier::new(11)).is_some());
        assert!(provider.get_route(RouteIdentifier::new(100)).is_some());
        assert!(provider.get_ride(RideIdentifier::new(1000)).is_some());
        assert!(provider.get_stop(StopIdentifier::new(99)).is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_last() {
        let provider = StaticNetworkProvider::from_data(
            vec![
                Stop::new(StopIdentifier::new(1), "Old", c(0.0, 0.0)),
                Stop::new(StopIdentifier::new(1), "New", c(0.0, 0.0)),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
            NetworkConfig::default(),
        );

        assert_eq!(provider.all_stops().len(), 1);
        assert_eq!(provider.get_stop(StopIdentifier::new(1)).unwrap().name(), "New");
    }

    #[test]
    fn test_stops_near() {
        let provider = sample(NetworkConfig::default());

        // Opéra is ~1.9 km from Gare, Louvre ~2.4 km
        let near: Vec<u64> = provider
            .stops_near(c(2.3550, 48.8800), 2_000.0)
            .iter()
            .map(|s| s.id().get())
            .collect();
        assert_eq!(near.len(), 2);
        assert!(near.contains(&1) && near.contains(&2));

        assert_eq!(provider.stops_near(c(2.3550, 48.8800), 5_000.0).len(), 3);
        assert!(provider.stops_near(c(2.3550, 48.8800), 0.0).is_empty());
        assert!(provider.stops_near(c(2.3550, 48.8800), f64::NAN).is_empty());
    }

    fn lone_stop(lng: f64, lat: f64) -> StaticNetworkProvider {
        StaticNetworkProvider::from_data(
            vec![Stop::new(StopIdentifier::new(1), "Lone", c(lng, lat))],
            vec![],
            vec![],
            vec![],
            vec![],
            NetworkConfig::default(),
        )
    }

    #[test]
    fn test_stops_near_across_antimeridian() {
        let provider = lone_stop(-180.0, 0.0);

        // ~11.1 km away across the ±180 line
        assert_eq!(provider.stops_near(c(179.9, 0.0), 50_000.0).len(), 1);
        assert_eq!(provider.stops_near(c(-179.8, 0.5), 80_000.0).len(), 1);
        assert!(provider.stops_near(c(179.0, 0.0), 50_000.0).is_empty());
    }

    #[test]
    fn test_stops_near_large_radius_at_high_latitude() {
        let provider = lone_stop(65.0, 77.5);

        // ~2,999 km from the query point, poleward of it
        assert_eq!(provider.stops_near(c(0.0, 60.0), 3_000_000.0).len(), 1);
        assert!(provider.stops_near(c(0.0, 60.0), 2_990_000.0).is_empty());
    }

    #[test]
    fn test_stops_near_circle_over_pole() {
        let provider = lone_stop(170.0, 88.0);

        assert_eq!(provider.stops_near(c(-10.0, 88.0), 500_000.0).len(), 1);
    }

    #[test]
    fn test_nearest_stops() {
        let provider = sample(NetworkConfig::default());

        let nearest = provider.nearest_stops(c(2.3385, 48.8612), 2);
        assert_eq!(nearest.len(), 2);
        assert_eq!(nearest[0].id(), StopIdentifier::new(3));
    }

    #[test]
    fn test_route_geometry_follows_joint_policy() {
        let keep = sample(NetworkConfig::default());
        assert_eq!(keep.route_coordinates(RouteIdentifier::new(100)).unwrap().len(), 4);

        let dedup = sample(NetworkConfig {
            joint_policy: JointPolicy::Deduplicate,
            ..NetworkConfig::default()
        });
        assert_eq!(dedup.route_coordinates(RouteIdentifier::new(100)).unwrap().len(), 3);

        assert!(matches!(
            keep.route_geojson(RouteIdentifier::new(5)),
            Err(TransitError::RouteNotFound(_))
        ));
    }

    #[test]
    fn test_feature_collection_order() {
        let provider = sample(NetworkConfig::default());
        let collection = provider.feature_collection();

        assert_eq!(collection.features.len(), 3);
        let kinds: Vec<bool> = collection
            .features
            .iter()
            .map(|f| f.properties.as_ref().unwrap().contains_key("name"))
            .collect();
        assert_eq!(kinds, vec![false, false, true]);
    }

    #[test]
    fn test_rides_adopt_configured_policy() {
        let mut provider = sample(NetworkConfig {
            transition_policy: TransitionPolicy::Strict,
            ..NetworkConfig::default()
        });

        let ride = provider.ride_mut(RideIdentifier::new(1000)).unwrap();
        assert_eq!(ride.policy(), TransitionPolicy::Strict);
        assert!(ride.complete().is_err());
        ride.start().unwrap();
        ride.complete().unwrap();
        assert_eq!(ride.status(), RideStatus::Completed);

        assert!(matches!(
            provider.ride_mut(RideIdentifier::new(1)),
            Err(TransitError::RideNotFound(_))
        ));
    }
}
