//! Sections: the fixed physical path between two stops.

use geo::LineString;
use geojson::{Feature, JsonObject};
use serde_json::{json, Value};

use crate::export::line_string_feature;
use crate::identifiers::*;
use crate::models::traits::HasPath;
use crate::models::types::*;
use crate::parse::{Fields, ParseOptions};
use crate::spatial::queries::path_length;

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    id: SectionIdentifier,
    start_stop_id: StopIdentifier,
    end_stop_id: StopIdentifier,
    path: Vec<GeoCoordinate>,
    length: f64,
}

impl Section {
    /// Create a section. Without an explicit `length`, it is the Haversine
    /// length of `path` (0 for fewer than two points).
    pub fn new(
        id: SectionIdentifier,
        start_stop_id: StopIdentifier,
        end_stop_id: StopIdentifier,
        path: Vec<GeoCoordinate>,
        length: Option<f64>,
    ) -> Self {
        let length = length.unwrap_or_else(|| path_length(&path));
        Self {
            id,
            start_stop_id,
            end_stop_id,
            path,
            length,
        }
    }

    pub fn id(&self) -> SectionIdentifier {
        self.id
    }

    pub fn start_stop_id(&self) -> StopIdentifier {
        self.start_stop_id
    }

    pub fn end_stop_id(&self) -> StopIdentifier {
        self.end_stop_id
    }

    pub fn path(&self) -> &[GeoCoordinate] {
        &self.path
    }

    /// Length in meters
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn line_string(&self) -> LineString {
        self.path.iter().copied().map(geo::Coord::from).collect()
    }

    pub fn to_geojson(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), json!(self.id));
        properties.insert("startStopId".to_string(), json!(self.start_stop_id));
        properties.insert("endStopId".to_string(), json!(self.end_stop_id));
        properties.insert("length".to_string(), json!(self.length));

        line_string_feature(&self.path, properties)
    }

    /// Build a section from
    /// `{id, startStopId, endStopId, path: [{lng, lat}, ...], length?}`.
    pub fn from_value(value: &Value, options: &ParseOptions) -> Result<Self> {
        let fields = Fields::of("section", value)?;
        Ok(Self::new(
            SectionIdentifier::new(fields.required_u64("id")?),
            StopIdentifier::new(fields.required_u64("startStopId")?),
            StopIdentifier::new(fields.required_u64("endStopId")?),
            fields.required_path("path", options)?,
            fields.optional_f64("length")?,
        ))
    }
}

impl HasPath for Section {
    fn path(&self) -> &[GeoCoordinate] {
        &self.path
    }

    fn length(&self) -> f64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::queries::METERS_PER_DEGREE;
    use approx::assert_relative_eq;

    fn section(path: Vec<GeoCoordinate>, length: Option<f64>) -> Section {
        Section::new(
            SectionIdentifier::new(1),
            StopIdentifier::new(10),
            StopIdentifier::new(11),
            path,
            length,
        )
    }

    #[test]
    fn test_short_paths_have_zero_length() {
        assert_eq!(section(vec![], None).length(), 0.0);
        assert_eq!(section(vec![GeoCoordinate::new(4.0, 50.0)], None).length(), 0.0);
    }

    #[test]
    fn test_length_from_path() {
        let s = section(
            vec![
                GeoCoordinate::new(0.0, 0.0),
                GeoCoordinate::new(0.0, 0.5),
                GeoCoordinate::new(0.0, 1.0),
            ],
            None,
        );
        assert_relative_eq!(s.length(), METERS_PER_DEGREE, max_relative = 1e-9);
    }

    #[test]
    fn test_explicit_length_overrides_path() {
        let s = section(
            vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(0.0, 1.0)],
            Some(42.0),
        );
        assert_eq!(s.length(), 42.0);

        let empty = section(vec![], Some(1_500.0));
        assert_eq!(empty.length(), 1_500.0);
    }

    #[test]
    fn test_to_geojson() {
        let s = section(
            vec![GeoCoordinate::new(2.35, 48.85), GeoCoordinate::new(2.36, 48.86)],
            Some(1_300.5),
        );

        let value = serde_json::to_value(s.to_geojson()).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(
            value["properties"],
            json!({"id": 1, "startStopId": 10, "endStopId": 11, "length": 1_300.5})
        );
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(
            value["geometry"]["coordinates"],
            json!([[2.35, 48.85], [2.36, 48.86]])
        );
    }

    #[test]
    fn test_line_string() {
        let s = section(
            vec![GeoCoordinate::new(1.0, 2.0), GeoCoordinate::new(3.0, 4.0)],
            None,
        );
        let line = s.line_string();
        assert_eq!(line.0.len(), 2);
        assert_eq!(line.0[1].x, 3.0);
        assert_eq!(line.0[1].y, 4.0);
    }

    #[test]
    fn test_from_value_matches_constructor() {
        let value = json!({
            "id": 1, "startStopId": 10, "endStopId": 11,
            "path": [{"lng": 0.0, "lat": 0.0}, {"lng": 0.0, "lat": 1.0}]
        });
        let parsed = Section::from_value(&value, &ParseOptions::default()).unwrap();
        let built = section(
            vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(0.0, 1.0)],
            None,
        );
        assert_eq!(parsed, built);

        let with_length = json!({
            "id": 1, "startStopId": 10, "endStopId": 11, "path": [], "length": 250.0
        });
        let parsed = Section::from_value(&with_length, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.length(), 250.0);
    }

    #[test]
    fn test_from_value_rejects_bad_path() {
        let value = json!({
            "id": 1, "startStopId": 10, "endStopId": 11, "path": [[0.0, 0.0]]
        });
        let err = Section::from_value(&value, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, TransitError::InvalidType { field: "path", .. }));
    }
}
