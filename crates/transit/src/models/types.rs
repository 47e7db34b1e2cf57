//! Core data types and enums for transit data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identifiers::*;

// ============================================================================
// Coordinates
// ============================================================================

/// A geographic position in decimal degrees.
///
/// `new` accepts any value; out-of-range coordinates flow into distance
/// computations unchanged. Use [`GeoCoordinate::try_new`] to reject them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    #[serde(rename = "lng")]
    pub longitude: f64,
    #[serde(rename = "lat")]
    pub latitude: f64,
}

impl GeoCoordinate {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Construct a coordinate, rejecting values outside the WGS84 ranges.
    pub fn try_new(longitude: f64, latitude: f64) -> Result<Self> {
        let coordinate = Self::new(longitude, latitude);
        if coordinate.is_within_bounds() {
            Ok(coordinate)
        } else {
            Err(TransitError::CoordinateOutOfRange {
                longitude,
                latitude,
            })
        }
    }

    /// Longitude in [-180, 180] and latitude in [-90, 90]. NaN is out of bounds.
    pub fn is_within_bounds(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }

    /// GeoJSON position, longitude first.
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

impl From<GeoCoordinate> for geo::Coord {
    fn from(c: GeoCoordinate) -> Self {
        geo::Coord {
            x: c.longitude,
            y: c.latitude,
        }
    }
}

impl From<GeoCoordinate> for geo::Point {
    fn from(c: GeoCoordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<geo::Coord> for GeoCoordinate {
    fn from(c: geo::Coord) -> Self {
        Self::new(c.x, c.y)
    }
}

impl From<geo::Point> for GeoCoordinate {
    fn from(p: geo::Point) -> Self {
        Self::new(p.x(), p.y())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Lifecycle state of a ride
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the strict lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: RideStatus) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(TransitError::InvalidData(format!(
                "Unknown ride status: {other}"
            ))),
        }
    }
}

/// How ride transitions outside the normal lifecycle are treated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any state may move to any other state; the latest transition wins.
    #[default]
    Permissive,
    /// Only Scheduled -> InProgress -> {Completed, Cancelled} and
    /// Scheduled -> Cancelled are allowed.
    Strict,
}

/// What happens to the shared point where two consecutive sections meet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointPolicy {
    /// Emit every section path in full, so a shared joint appears twice.
    #[default]
    Keep,
    /// Drop a section's first point when it equals the last emitted point.
    Deduplicate,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Missing field `{field}` in {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid type for `{field}` in {entity}: expected {expected}")]
    InvalidType {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Coordinate out of range: lng {longitude}, lat {latitude}")]
    CoordinateOutOfRange { longitude: f64, latitude: f64 },

    #[error("Invalid ride transition: {from} -> {to}")]
    InvalidTransition { from: RideStatus, to: RideStatus },

    #[error("Stop not found: {0}")]
    StopNotFound(StopIdentifier),

    #[error("Section not found: {0}")]
    SectionNotFound(SectionIdentifier),

    #[error("Route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    #[error("Ride not found: {0}")]
    RideNotFound(RideIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
