//! Stops and buses: plain data holders referenced by identifier.

use std::sync::Arc;

use serde_json::Value;

use crate::identifiers::*;
use crate::models::types::*;
use crate::parse::{Fields, ParseOptions};

/// A boarding location
#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    id: StopIdentifier,
    name: Arc<str>,
    location: GeoCoordinate,
}

impl Stop {
    pub fn new(id: StopIdentifier, name: impl Into<Arc<str>>, location: GeoCoordinate) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }

    pub fn id(&self) -> StopIdentifier {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    /// Build a stop from `{id, name, location: {lng, lat}}`.
    pub fn from_value(value: &Value, options: &ParseOptions) -> Result<Self> {
        let fields = Fields::of("stop", value)?;
        Ok(Self::new(
            StopIdentifier::new(fields.required_u64("id")?),
            fields.required_str("name")?,
            fields.required_coordinate("location", options)?,
        ))
    }
}

/// A vehicle and its last known position
#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    id: BusIdentifier,
    plate: Arc<str>,
    location: GeoCoordinate,
}

impl Bus {
    pub fn new(id: BusIdentifier, plate: impl Into<Arc<str>>, location: GeoCoordinate) -> Self {
        Self {
            id,
            plate: plate.into(),
            location,
        }
    }

    pub fn id(&self) -> BusIdentifier {
        self.id
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    pub fn update_location(&mut self, location: GeoCoordinate) {
        self.location = location;
    }

    pub fn update_position(&mut self, longitude: f64, latitude: f64) {
        self.location = GeoCoordinate::new(longitude, latitude);
    }

    /// Build a bus from `{id, plate, location: {lng, lat}}`.
    pub fn from_value(value: &Value, options: &ParseOptions) -> Result<Self> {
        let fields = Fields::of("bus", value)?;
        Ok(Self::new(
            BusIdentifier::new(fields.required_u64("id")?),
            fields.required_str("plate")?,
            fields.required_coordinate("location", options)?,
        ))
    }
}
