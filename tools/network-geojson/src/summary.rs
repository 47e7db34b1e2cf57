use transit_network::{NetworkProvider, RideStatus};

#[derive(Debug, Default)]
pub struct NetworkStats {
    pub stop_count: usize,
    pub bus_count: usize,
    pub section_count: usize,
    pub route_count: usize,
    pub ride_count: usize,
    pub completed_rides: usize,
    pub cancelled_rides: usize,
    pub section_length_m: f64,
    pub route_length_m: f64,
    pub total_ride_minutes: i64,
}

impl NetworkStats {
    pub fn collect(provider: &impl NetworkProvider) -> Self {
        let rides = provider.all_rides();

        Self {
            stop_count: provider.all_stops().len(),
            bus_count: provider.all_buses().len(),
            section_count: provider.all_sections().len(),
            route_count: provider.all_routes().len(),
            ride_count: rides.len(),
            completed_rides: rides
                .iter()
                .filter(|r| r.status() == RideStatus::Completed)
                .count(),
            cancelled_rides: rides
                .iter()
                .filter(|r| r.status() == RideStatus::Cancelled)
                .count(),
            section_length_m: provider.all_sections().iter().map(|s| s.length()).sum(),
            route_length_m: provider
                .all_routes()
                .iter()
                .map(|route| route.length(provider))
                .sum(),
            total_ride_minutes: rides.iter().filter_map(|r| r.duration_minutes()).sum(),
        }
    }

    pub fn log_summary(&self) {
        log::info!("=== Summary ===");
        log::info!("Stops: {}", self.stop_count);
        log::info!("Buses: {}", self.bus_count);
        log::info!(
            "Sections: {} ({:.2} km)",
            self.section_count,
            self.section_length_m / 1_000.0
        );
        log::info!(
            "Routes: {} ({:.2} km)",
            self.route_count,
            self.route_length_m / 1_000.0
        );
        log::info!(
            "Rides: {} ({} completed, {} cancelled, {} min recorded)",
            self.ride_count,
            self.completed_rides,
            self.cancelled_rides,
            self.total_ride_minutes
        );
    }
}
