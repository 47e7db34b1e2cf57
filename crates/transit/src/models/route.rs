//! Routes: ordered chains of sections and the stops along them.

use std::sync::Arc;

use geojson::{Feature, JsonObject};
use serde_json::{json, Value};

use crate::export::line_string_feature;
use crate::identifiers::*;
use crate::models::traits::{HasPath, SectionLookup};
use crate::models::types::*;
use crate::parse::Fields;

/// A transit route (e.g., "Line 4")
///
/// Holds no geometry. Section order is taken as given: consecutive
/// sections are expected to share a stop, but a disconnected chain is
/// still accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    id: RouteIdentifier,
    name: Arc<str>,
    section_ids: Vec<SectionIdentifier>,
    stop_ids: Vec<StopIdentifier>,
}

impl Route {
    pub fn new(id: RouteIdentifier, name: impl Into<Arc<str>>) -> Self {
        Self::from_parts(id, name, Vec::new(), Vec::new())
    }

    pub fn from_parts(
        id: RouteIdentifier,
        name: impl Into<Arc<str>>,
        section_ids: Vec<SectionIdentifier>,
        stop_ids: Vec<StopIdentifier>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            section_ids,
            stop_ids,
        }
    }

    pub fn id(&self) -> RouteIdentifier {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section_ids(&self) -> &[SectionIdentifier] {
        &self.section_ids
    }

    pub fn stop_ids(&self) -> &[StopIdentifier] {
        &self.stop_ids
    }

    pub fn add_section(&mut self, id: SectionIdentifier) -> &mut Self {
        self.section_ids.push(id);
        self
    }

    pub fn add_stop(&mut self, id: StopIdentifier) -> &mut Self {
        self.stop_ids.push(id);
        self
    }

    /// Full path of the route: every resolvable section path, in order
    ///
    /// Sections missing from `sections` are skipped. Joints shared by
    /// consecutive sections are kept, so they appear twice.
    pub fn coordinates<L>(&self, sections: &L) -> Vec<GeoCoordinate>
    where
        L: SectionLookup + ?Sized,
    {
        self.coordinates_with(sections, JointPolicy::Keep)
    }

    pub fn coordinates_with<L>(&self, sections: &L, joints: JointPolicy) -> Vec<GeoCoordinate>
    where
        L: SectionLookup + ?Sized,
    {
        let mut coordinates: Vec<GeoCoordinate> = Vec::new();

        for &section_id in &self.section_ids {
            let Some(section) = sections.lookup(section_id) else {
                log::debug!("route {}: section {} not found, skipping", self.id, section_id);
                continue;
            };

            let path = section.path();
            let shared_joint = match (coordinates.last(), path.first()) {
                (Some(last), Some(first)) => last == first,
                _ => false,
            };
            let skip = usize::from(joints == JointPolicy::Deduplicate && shared_joint);

            coordinates.extend_from_slice(&path[skip..]);
        }

        coordinates
    }

    /// Sum of the lengths of every resolvable section, in meters
    pub fn length<L>(&self, sections: &L) -> f64
    where
        L: SectionLookup + ?Sized,
    {
        self.section_ids
            .iter()
            .filter_map(|&id| sections.lookup(id))
            .map(|section| section.length())
            .sum()
    }

    pub fn to_geojson<L>(&self, sections: &L) -> Feature
    where
        L: SectionLookup + ?Sized,
    {
        self.to_geojson_with(sections, JointPolicy::Keep)
    }

    pub fn to_geojson_with<L>(&self, sections: &L, joints: JointPolicy) -> Feature
    where
        L: SectionLookup + ?Sized,
    {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), json!(self.id));
        properties.insert("name".to_string(), json!(self.name()));
        properties.insert("sections".to_string(), json!(self.section_ids));
        properties.insert("stops".to_string(), json!(self.stop_ids));

        line_string_feature(&self.coordinates_with(sections, joints), properties)
    }

    /// Build a route from `{id, name, sections?, stops?}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let fields = Fields::of("route", value)?;
        Ok(Self::from_parts(
            RouteIdentifier::new(fields.required_u64("id")?),
            fields.required_str("name")?,
            fields
                .optional_ids("sections")?
                .into_iter()
                .map(SectionIdentifier::new)
                .collect(),
            fields
                .optional_ids("stops")?
                .into_iter()
                .map(StopIdentifier::new)
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::Section;
    use std::collections::HashMap;

    fn c(lng: f64, lat: f64) -> GeoCoordinate {
        GeoCoordinate::new(lng, lat)
    }

    fn lookup(sections: Vec<Section>) -> HashMap<SectionIdentifier, Section> {
        sections.into_iter().map(|s| (s.id(), s)).collect()
    }

    fn section(id: u64, path: Vec<GeoCoordinate>) -> Section {
        Section::new(
            SectionIdentifier::new(id),
            StopIdentifier::new(id),
            StopIdentifier::new(id + 1),
            path,
            None,
        )
    }

    fn two_section_network() -> HashMap<SectionIdentifier, Section> {
        lookup(vec![
            section(1, vec![c(0.0, 0.0), c(0.0, 0.01)]),
            section(2, vec![c(0.0, 0.01), c(0.01, 0.01), c(0.01, 0.02)]),
        ])
    }

    #[test]
    fn test_add_is_chained_and_ordered() {
        let mut route = Route::new(RouteIdentifier::new(7), "Line 7");
        route
            .add_section(SectionIdentifier::new(3))
            .add_stop(StopIdentifier::new(30))
            .add_section(SectionIdentifier::new(1))
            .add_stop(StopIdentifier::new(10))
            .add_section(SectionIdentifier::new(2));

        let sections: Vec<u64> = route.section_ids().iter().map(|id| id.get()).collect();
        let stops: Vec<u64> = route.stop_ids().iter().map(|id| id.get()).collect();
        assert_eq!(sections, vec![3, 1, 2]);
        assert_eq!(stops, vec![30, 10]);
    }

    #[test]
    fn test_coordinates_concatenate_in_order() {
        let network = two_section_network();
        let route = Route::from_parts(
            RouteIdentifier::new(1),
            "A",
            vec![SectionIdentifier::new(1), SectionIdentifier::new(2)],
            vec![],
        );

        let coords = route.coordinates(&network);
        assert_eq!(
            coords,
            vec![c(0.0, 0.0), c(0.0, 0.01), c(0.0, 0.01), c(0.01, 0.01), c(0.01, 0.02)]
        );

        // Order follows the route, not the lookup
        let reversed = Route::from_parts(
            RouteIdentifier::new(2),
            "B",
            vec![SectionIdentifier::new(2), SectionIdentifier::new(1)],
            vec![],
        );
        assert_eq!(reversed.coordinates(&network)[0], c(0.0, 0.01));
        assert_eq!(reversed.coordinates(&network)[3], c(0.0, 0.0));
    }

    #[test]
    fn test_missing_sections_are_skipped() {
        let network = lookup(vec![section(1, vec![c(0.0, 0.0), c(0.0, 0.01)])]);
        let route = Route::from_parts(
            RouteIdentifier::new(1),
            "A",
            vec![SectionIdentifier::new(1), SectionIdentifier::new(2)],
            vec![],
        );

        assert_eq!(route.coordinates(&network), network[&SectionIdentifier::new(1)].path());

        let empty: HashMap<SectionIdentifier, Section> = HashMap::new();
        assert!(route.coordinates(&empty).is_empty());
    }

    #[test]
    fn test_deduplicate_joints() {
        let network = two_section_network();
        let route = Route::from_parts(
            RouteIdentifier::new(1),
            "A",
            vec![SectionIdentifier::new(1), SectionIdentifier::new(2)],
            vec![],
        );

        let coords = route.coordinates_with(&network, JointPolicy::Deduplicate);
        assert_eq!(
            coords,
            vec![c(0.0, 0.0), c(0.0, 0.01), c(0.01, 0.01), c(0.01, 0.02)]
        );

        // Disconnected chains keep every point
        let gap = lookup(vec![
            section(1, vec![c(0.0, 0.0), c(0.0, 0.01)]),
            section(2, vec![c(1.0, 1.0), c(1.0, 1.01)]),
        ]);
        assert_eq!(route.coordinates_with(&gap, JointPolicy::Deduplicate).len(), 4);
    }

    #[test]
    fn test_route_length() {
        let network = two_section_network();
        let route = Route::from_parts(
            RouteIdentifier::new(1),
            "A",
            vec![
                SectionIdentifier::new(1),
                SectionIdentifier::new(2),
                SectionIdentifier::new(99),
            ],
            vec![],
        );

        let expected: f64 = network.values().map(Section::length).sum();
        assert_eq!(route.length(&network), expected);
    }

    #[test]
    fn test_to_geojson() {
        let network = two_section_network();
        let route = Route::from_parts(
            RouteIdentifier::new(4),
            "Line 4",
            vec![SectionIdentifier::new(1), SectionIdentifier::new(2)],
            vec![StopIdentifier::new(1), StopIdentifier::new(2), StopIdentifier::new(3)],
        );

        let value = serde_json::to_value(route.to_geojson(&network)).unwrap();
        assert_eq!(
            value["properties"],
            json!({"id": 4, "name": "Line 4", "sections": [1, 2], "stops": [1, 2, 3]})
        );

        let expected: Vec<Vec<f64>> = route
            .coordinates(&network)
            .iter()
            .map(GeoCoordinate::to_position)
            .collect();
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(value["geometry"]["coordinates"], json!(expected));
    }

    #[test]
    fn test_from_value_defaults() {
        let route = Route::from_value(&json!({"id": 9, "name": "Night"})).unwrap();
        assert_eq!(route, Route::new(RouteIdentifier::new(9), "Night"));

        let full = Route::from_value(&json!({
            "id": 9, "name": "Night", "sections": [5, 6], "stops": [50]
        }))
        .unwrap();
        assert_eq!(full.section_ids(), [SectionIdentifier::new(5), SectionIdentifier::new(6)]);
        assert_eq!(full.stop_ids(), [StopIdentifier::new(50)]);
    }

    #[test]
    fn test_from_value_requires_name() {
        let err = Route::from_value(&json!({"id": 9})).unwrap_err();
        assert!(matches!(
            err,
            TransitError::MissingField { entity: "route", field: "name" }
        ));
    }
}
