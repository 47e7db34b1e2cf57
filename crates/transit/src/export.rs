//! GeoJSON output for mapping consumers.
//!
//! Positions are always `[longitude, latitude]`. Property keys keep the
//! order they were inserted in. Written features list their members as
//! `type`, `properties`, `geometry`; use [`feature_collection_object`] rather
//! than serializing a [`FeatureCollection`] directly, which puts `geometry`
//! first.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::models::types::GeoCoordinate;

/// LineString geometry over a path, in path order
pub fn line_string<'a>(path: impl IntoIterator<Item = &'a GeoCoordinate>) -> Geometry {
    let positions = path.into_iter().map(GeoCoordinate::to_position).collect();
    Geometry::new(Value::LineString(positions))
}

/// LineString feature carrying `properties`
pub fn line_string_feature<'a>(
    path: impl IntoIterator<Item = &'a GeoCoordinate>,
    properties: JsonObject,
) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(line_string(path)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Feature as a JSON object with members in `type`, `properties`, `geometry` order
pub fn feature_object(feature: &Feature) -> JsonObject {
    let mut members = JsonObject::from(feature);
    let mut object = JsonObject::new();
    for key in ["type", "properties", "geometry"] {
        if let Some(value) = members.remove(key) {
            object.insert(key.to_string(), value);
        }
    }
    object.extend(members);
    object
}

/// Feature collection as a JSON object, each feature laid out by [`feature_object`]
pub fn feature_collection_object(collection: &FeatureCollection) -> JsonObject {
    let mut object = JsonObject::from(collection);
    let features = collection
        .features
        .iter()
        .map(|feature| JsonValue::Object(feature_object(feature)))
        .collect();
    object.insert("features".to_string(), JsonValue::Array(features));
    object
}
