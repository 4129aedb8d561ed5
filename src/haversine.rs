//! Haversine metrics provider (fallback when no routing service is reachable).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than OSRM (ignores roads) but always available.

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::model::{Facility, Location, RouteMetrics, TrafficState};
use crate::traits::RouteMetricsProvider;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based route metrics provider.
///
/// Estimates travel time using straight-line distance and an assumed speed,
/// stretched by a congestion factor that also determines the traffic state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaversineMetrics {
    /// Assumed average free-flow driving speed in km/h.
    pub speed_kmh: f64,
    /// Observed / free-flow travel time ratio; 1.0 means empty roads.
    pub congestion_factor: f64,
}

impl Default for HaversineMetrics {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            congestion_factor: 1.0,
        }
    }
}

impl HaversineMetrics {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    pub fn with_congestion(mut self, congestion_factor: f64) -> Self {
        self.congestion_factor = congestion_factor;
        self
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0 * self.congestion_factor).round()
    }
}

impl RouteMetricsProvider for HaversineMetrics {
    fn measure(
        &self,
        origin: &Location,
        destination: &Facility,
    ) -> Result<RouteMetrics, MetricsError> {
        let unroutable = |reason: &str| MetricsError::Unroutable {
            facility_id: destination.id.clone(),
            reason: reason.to_string(),
        };
        let from = origin
            .coordinates()
            .ok_or_else(|| unroutable("origin has no coordinates"))?;
        let to = destination
            .coordinates
            .ok_or_else(|| unroutable("facility has no coordinates"))?;

        let km = haversine_km(from, to);
        Ok(RouteMetrics::new(
            destination.id.clone(),
            (km * 1000.0).round(),
            self.km_to_seconds(km),
            TrafficState::from_congestion(self.congestion_factor),
        ))
    }
}
