//! R-tree nodes for spatial indexing.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries use a two-stage filtering approach:
//! 1. **R-tree filter**: a longitude/latitude envelope from
//!    [`search_bounds`](crate::spatial::queries::search_bounds), repeated
//!    360° east and west so circles crossing ±180 are covered
//! 2. **Haversine filter**: exact surface distance on the survivors

use std::sync::Arc;

use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::fleet::Stop;

#[derive(Clone, Debug)]
pub struct StopNode {
    pub stop: Arc<Stop>,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(stop: Arc<Stop>) -> Self {
        let location = stop.location();
        Self {
            stop,
            point: [location.longitude, location.latitude],
        }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
