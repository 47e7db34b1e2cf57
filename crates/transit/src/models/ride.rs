//! Rides: one timed traversal of a route by a bus.
//!
//! ```text
//! Scheduled ──start──▶ InProgress ──complete──▶ Completed
//!                          │
//!                          └──────cancel──────▶ Cancelled
//! ```
//!
//! Under [`TransitionPolicy::Permissive`] every transition is accepted from
//! any state and the latest one wins. [`TransitionPolicy::Strict`] only
//! allows the edges drawn above.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::identifiers::*;
use crate::models::types::*;
use crate::parse::Fields;

#[derive(Clone, Debug, PartialEq)]
pub struct Ride {
    id: RideIdentifier,
    bus_id: BusIdentifier,
    route_id: RouteIdentifier,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    status: RideStatus,
    policy: TransitionPolicy,
}

impl Ride {
    /// A scheduled ride starting now
    pub fn new(id: RideIdentifier, bus_id: BusIdentifier, route_id: RouteIdentifier) -> Self {
        Self::scheduled_at(id, bus_id, route_id, Utc::now())
    }

    pub fn scheduled_at(
        id: RideIdentifier,
        bus_id: BusIdentifier,
        route_id: RouteIdentifier,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            bus_id,
            route_id,
            start_time,
            end_time: None,
            status: RideStatus::Scheduled,
            policy: TransitionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> RideIdentifier {
        self.id
    }

    pub fn bus_id(&self) -> BusIdentifier {
        self.bus_id
    }

    pub fn route_id(&self) -> RouteIdentifier {
        self.route_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn start(&mut self) -> Result<()> {
        self.start_at(Utc::now())
    }

    /// Move to InProgress, restarting the clock at `now`.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.check_transition(RideStatus::InProgress)?;
        self.start_time = now;
        self.status = RideStatus::InProgress;
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        self.complete_at(Utc::now())
    }

    pub fn complete_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.check_transition(RideStatus::Completed)?;
        self.end_time = Some(now);
        self.status = RideStatus::Completed;
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str) -> Result<()> {
        self.cancel_at(reason, Utc::now())
    }

    /// Move to Cancelled. The reason is logged, not kept.
    pub fn cancel_at(&mut self, reason: &str, now: DateTime<Utc>) -> Result<()> {
        self.check_transition(RideStatus::Cancelled)?;
        if !reason.is_empty() {
            log::info!("ride {} cancelled: {}", self.id, reason);
        }
        self.end_time = Some(now);
        self.status = RideStatus::Cancelled;
        Ok(())
    }

    /// Whole minutes between start and end, rounding half up
    ///
    /// `None` until the ride has an end time. 90 seconds gives 2.
    pub fn duration_minutes(&self) -> Option<i64> {
        let end = self.end_time?;
        let millis = (end - self.start_time).num_milliseconds();
        Some((millis as f64 / 60_000.0 + 0.5).floor() as i64)
    }

    fn check_transition(&self, next: RideStatus) -> Result<()> {
        if self.status.can_transition_to(next) {
            return Ok(());
        }

        match self.policy {
            TransitionPolicy::Strict => Err(TransitError::InvalidTransition {
                from: self.status,
                to: next,
            }),
            TransitionPolicy::Permissive => {
                log::warn!(
                    "ride {}: out-of-order transition {} -> {}",
                    self.id,
                    self.status,
                    next
                );
                Ok(())
            }
        }
    }

    /// Build a ride from `{id, busId, routeId, startTime?, endTime?, status?}`.
    ///
    /// A missing or zero `startTime` means now. Stored `endTime` and `status` are
    /// restored as-is, without going through the transitions.
    pub fn from_value(value: &Value) -> Result<Self> {
        let fields = Fields::of("ride", value)?;

        let start_time = fields.optional_timestamp("startTime")?.unwrap_or_else(Utc::now);
        let mut ride = Self::scheduled_at(
            RideIdentifier::new(fields.required_u64("id")?),
            BusIdentifier::new(fields.required_u64("busId")?),
            RouteIdentifier::new(fields.required_u64("routeId")?),
            start_time,
        );

        ride.end_time = fields.optional_timestamp("endTime")?;
        if let Some(status) = fields.optional_str("status")? {
            ride.status = status.parse().map_err(|_| TransitError::InvalidType {
                entity: "ride",
                field: "status",
                expected: "one of scheduled, in_progress, completed, cancelled",
            })?;
        }

        Ok(ride)
    }
}
