//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula on a spherical Earth.

use crate::models::types::GeoCoordinate;

/// Sphere radius used for every surface distance, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Surface length of one degree of arc on the sphere, in meters
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Calculate Haversine distance between two coordinates in meters
pub fn haversine_distance(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push the chord term just outside [0, 1] near antipodes
    let a = half_chord.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Sum of the distances between consecutive points of a path, in meters
///
/// Paths with fewer than two points have length 0.
pub fn path_length(path: &[GeoCoordinate]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Longitude/latitude box holding every point within `meters` of `center`
///
/// Returns `[min_lng, min_lat]` and `[max_lng, max_lat]`. The latitude span
/// is one arc of `meters` each way; the longitude span is where the circle's
/// tangent meridians touch it, so the box is tight but never drops a point.
/// Longitudes may run past ±180 and callers have to wrap them.
///
/// `None` when the circle reaches a pole or covers every longitude, in which
/// case only the whole globe contains it.
pub fn search_bounds(center: GeoCoordinate, meters: f64) -> Option<([f64; 2], [f64; 2])> {
    let delta_lat = meters / METERS_PER_DEGREE;
    let min_lat = center.latitude - delta_lat;
    let max_lat = center.latitude + delta_lat;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return None;
    }

    let ratio = (meters / EARTH_RADIUS_M).sin() / center.latitude.to_radians().cos();
    if ratio.is_nan() || ratio >= 1.0 {
        return None;
    }
    let delta_lng = ratio.asin().to_degrees();

    // Absorb rounding between this box and the Haversine check
    let pad = 1e-9;
    Some((
        [center.longitude - delta_lng - pad, min_lat - pad],
        [center.longitude + delta_lng + pad, max_lat + pad],
    ))
}
