//! Deterministic metrics provider backed by a fixed table.
//!
//! Stands in for a live routing service in tests and demos. Each facility
//! id maps to scripted metrics, a scripted failure, or an artificial delay.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::model::{Facility, Location, RouteMetrics, TrafficState};
use crate::traits::RouteMetricsProvider;

/// One configured entry of a [`FixedMetrics`] table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedRoute {
    pub facility_id: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub traffic: TrafficState,
    /// Artificial latency before answering.
    #[serde(default)]
    pub delay_ms: u64,
    /// Answer with a transport error instead of metrics.
    #[serde(default)]
    pub fail: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedTable {
    pub routes: Vec<FixedRoute>,
}

#[derive(Debug, Default)]
pub struct FixedMetrics {
    routes: HashMap<String, FixedRoute>,
    calls: AtomicUsize,
}

impl FixedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: &FixedTable) -> Self {
        let routes = table
            .routes
            .iter()
            .map(|route| (route.facility_id.clone(), route.clone()))
            .collect();
        Self {
            routes,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_route(
        mut self,
        facility_id: &str,
        distance_meters: f64,
        duration_seconds: f64,
        traffic: TrafficState,
    ) -> Self {
        self.routes.insert(
            facility_id.to_string(),
            FixedRoute {
                facility_id: facility_id.to_string(),
                distance_meters,
                duration_seconds,
                traffic,
                delay_ms: 0,
                fail: false,
            },
        );
        self
    }

    /// Delay answers for an already configured facility.
    pub fn with_delay(mut self, facility_id: &str, delay: Duration) -> Self {
        if let Some(route) = self.routes.get_mut(facility_id) {
            route.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        }
        self
    }

    pub fn with_failure(mut self, facility_id: &str) -> Self {
        let route = self
            .routes
            .entry(facility_id.to_string())
            .or_insert_with(|| FixedRoute {
                facility_id: facility_id.to_string(),
                distance_meters: 0.0,
                duration_seconds: 0.0,
                traffic: TrafficState::Unknown,
                delay_ms: 0,
                fail: false,
            });
        route.fail = true;
        self
    }

    /// Number of `measure` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteMetricsProvider for FixedMetrics {
    fn measure(
        &self,
        _origin: &Location,
        destination: &Facility,
    ) -> Result<RouteMetrics, MetricsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some(route) = self.routes.get(&destination.id) else {
            return Err(MetricsError::Unroutable {
                facility_id: destination.id.clone(),
                reason: "no scripted route".to_string(),
            });
        };

        if route.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(route.delay_ms));
        }
        if route.fail {
            return Err(MetricsError::Transport {
                facility_id: destination.id.clone(),
                message: "scripted failure".to_string(),
            });
        }

        Ok(RouteMetrics::new(
            destination.id.clone(),
            route.distance_meters,
            route.duration_seconds,
            route.traffic,
        ))
    }
}
