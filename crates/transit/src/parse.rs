//! Fallible construction of entities from untyped JSON.
//!
//! Every entity exposes a `from_value` constructor built on [`Fields`]. A
//! well-formed object yields exactly what the typed constructor would;
//! anything else is reported as [`TransitError::MissingField`] or
//! [`TransitError::InvalidType`] naming the offending field. `null` is
//! treated the same as an absent field.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::models::fleet::{Bus, Stop};
use crate::models::ride::Ride;
use crate::models::route::Route;
use crate::models::section::Section;
use crate::models::types::*;

/// Knobs applied while parsing
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Reject coordinates outside longitude [-180, 180] / latitude [-90, 90]
    pub validate_coordinates: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate_coordinates: true,
        }
    }
}

/// Field accessor over one JSON object, tagged with the entity it describes
pub struct Fields<'a> {
    entity: &'static str,
    object: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(entity: &'static str, value: &'a Value) -> Result<Self> {
        let object = value.as_object().ok_or(TransitError::InvalidType {
            entity,
            field: "<root>",
            expected: "object",
        })?;
        Ok(Self { entity, object })
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|v| !v.is_null())
    }

    fn required(&self, field: &'static str) -> Result<&'a Value> {
        self.get(field).ok_or(TransitError::MissingField {
            entity: self.entity,
            field,
        })
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> TransitError {
        TransitError::InvalidType {
            entity: self.entity,
            field,
            expected,
        }
    }

    pub fn required_u64(&self, field: &'static str) -> Result<u64> {
        self.required(field)?
            .as_u64()
            .ok_or_else(|| self.invalid(field, "non-negative integer"))
    }

    pub fn required_str(&self, field: &'static str) -> Result<&'a str> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| self.invalid(field, "string"))
    }

    pub fn optional_str(&self, field: &'static str) -> Result<Option<&'a str>> {
        self.get(field)
            .map(|v| v.as_str().ok_or_else(|| self.invalid(field, "string")))
            .transpose()
    }

    pub fn optional_f64(&self, field: &'static str) -> Result<Option<f64>> {
        self.get(field)
            .map(|v| v.as_f64().ok_or_else(|| self.invalid(field, "number")))
            .transpose()
    }

    /// Array of identifiers; absent means empty.
    pub fn optional_ids(&self, field: &'static str) -> Result<Vec<u64>> {
        self.optional_list(field)?
            .iter()
            .map(|v| {
                v.as_u64()
                    .ok_or_else(|| self.invalid(field, "array of non-negative integers"))
            })
            .collect()
    }

    /// Array of arbitrary values; absent means empty.
    pub fn optional_list(&self, field: &'static str) -> Result<&'a [Value]> {
        match self.get(field) {
            None => Ok(&[]),
            Some(v) => v
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| self.invalid(field, "array")),
        }
    }

    pub fn required_coordinate(
        &self,
        field: &'static str,
        options: &ParseOptions,
    ) -> Result<GeoCoordinate> {
        self.coordinate(field, self.required(field)?, options)
    }

    pub fn required_path(
        &self,
        field: &'static str,
        options: &ParseOptions,
    ) -> Result<Vec<GeoCoordinate>> {
        self.required(field)?
            .as_array()
            .ok_or_else(|| self.invalid(field, "array of {lng, lat} objects"))?
            .iter()
            .map(|point| self.coordinate(field, point, options))
            .collect()
    }

    /// RFC 3339 string or epoch milliseconds.
    ///
    /// `0` and `""` count as absent, like `null`, so a zeroed timestamp
    /// never turns into the epoch.
    pub fn optional_timestamp(&self, field: &'static str) -> Result<Option<DateTime<Utc>>> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let unset = match value {
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.as_f64() == Some(0.0),
            _ => false,
        };
        if unset {
            return Ok(None);
        }

        let parsed = match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        };

        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(field, "RFC 3339 string or epoch milliseconds"))
    }

    fn coordinate(
        &self,
        field: &'static str,
        value: &Value,
        options: &ParseOptions,
    ) -> Result<GeoCoordinate> {
        let component = |key: &str| value.get(key).and_then(Value::as_f64);
        let (Some(longitude), Some(latitude)) = (component("lng"), component("lat")) else {
            return Err(self.invalid(field, "{lng, lat} object of numbers"));
        };

        if options.validate_coordinates {
            GeoCoordinate::try_new(longitude, latitude)
        } else {
            Ok(GeoCoordinate::new(longitude, latitude))
        }
    }
}

/// A whole network as loaded from one JSON document
///
/// Shape: `{stops, buses, sections, routes, rides}`, every list optional.
#[derive(Clone, Debug, Default)]
pub struct NetworkDocument {
    pub stops: Vec<Stop>,
    pub buses: Vec<Bus>,
    pub sections: Vec<Section>,
    pub routes: Vec<Route>,
    pub rides: Vec<Ride>,
}

impl NetworkDocument {
    pub fn from_value(value: &Value, options: &ParseOptions) -> Result<Self> {
        let fields = Fields::of("network", value)?;

        let parse_all = |field: &'static str| fields.optional_list(field);

        Ok(Self {
            stops: parse_all("stops")?
                .iter()
                .map(|v| Stop::from_value(v, options))
                .collect::<Result<_>>()?,
            buses: parse_all("buses")?
                .iter()
                .map(|v| Bus::from_value(v, options))
                .collect::<Result<_>>()?,
            sections: parse_all("sections")?
                .iter()
                .map(|v| Section::from_value(v, options))
                .collect::<Result<_>>()?,
            routes: parse_all("routes")?
                .iter()
                .map(Route::from_value)
                .collect::<Result<_>>()?,
            rides: parse_all("rides")?
                .iter()
                .map(Ride::from_value)
                .collect::<Result<_>>()?,
        })
    }

    pub fn from_json_str(json: &str, options: &ParseOptions) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| TransitError::SerializationError(e.to_string()))?;
        Self::from_value(&value, options)
    }
}
