//! Routing engine: fan out metrics lookups, rank, designate the primary.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, MetricsError};
use crate::model::{
    EmergencyCategory, Facility, Location, RankedRoute, RequestId, RouteMetrics, RoutingResult,
};
use crate::traits::RouteMetricsProvider;

pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Upper bound on concurrent metrics lookups.
    pub max_in_flight: usize,
    /// Budget for a single lookup before its candidate is dropped.
    pub lookup_timeout_ms: u64,
    /// How many candidates to ask the catalog for.
    pub max_candidates: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl EngineOptions {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid("max_in_flight must be at least 1".into()));
        }
        if self.lookup_timeout_ms == 0 {
            return Err(ConfigError::Invalid("lookup_timeout_ms must be positive".into()));
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::Invalid("max_candidates must be at least 1".into()));
        }
        Ok(())
    }
}

/// Ranks candidate facilities by travel time from a resolved location.
pub struct RoutingEngine {
    provider: Arc<dyn RouteMetricsProvider>,
    options: EngineOptions,
}

impl RoutingEngine {
    pub fn new(
        provider: Arc<dyn RouteMetricsProvider>,
        options: EngineOptions,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { provider, options })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Measure every candidate and return a ranked snapshot.
    ///
    /// Candidates whose lookup fails or times out are dropped. An empty
    /// result is not an error.
    pub fn route(
        &self,
        request_id: RequestId,
        location: &Location,
        category: &EmergencyCategory,
        candidates: &[Facility],
    ) -> RoutingResult {
        if candidates.is_empty() {
            return RoutingResult {
                request_id,
                routes: Vec::new(),
                dropped_candidates: 0,
            };
        }

        let measured = self.measure_all(location, candidates);
        let dropped = measured.iter().filter(|slot| slot.is_none()).count();

        let pairs: Vec<(Facility, RouteMetrics)> = candidates
            .iter()
            .zip(measured)
            .filter_map(|(facility, metrics)| metrics.map(|metrics| (facility.clone(), metrics)))
            .collect();
        let routes = rank(pairs);

        debug!(
            %request_id,
            %category,
            candidates = candidates.len(),
            ranked = routes.len(),
            dropped,
            "ranked candidate facilities"
        );

        RoutingResult {
            request_id,
            routes,
            dropped_candidates: dropped,
        }
    }

    /// One slot per candidate, `None` where the lookup failed.
    ///
    /// At most `max_in_flight` lookups of this request run at once. Each
    /// lookup gets its own deadline from the moment it starts; once that
    /// passes, its slot is freed for the next candidate and its worker is
    /// left to finish on its own.
    fn measure_all(&self, origin: &Location, candidates: &[Facility]) -> Vec<Option<RouteMetrics>> {
        let timeout = self.options.lookup_timeout();
        let limit = self.options.max_in_flight.min(candidates.len());
        let (sender, receiver) = mpsc::channel();

        let mut slots: Vec<Option<RouteMetrics>> = vec![None; candidates.len()];
        let mut pending = candidates.iter().enumerate();
        let mut in_flight: HashMap<usize, Instant> = HashMap::with_capacity(limit);

        loop {
            while in_flight.len() < limit {
                let Some((index, facility)) = pending.next() else {
                    break;
                };
                match self.dispatch(index, origin, facility, timeout, sender.clone()) {
                    Ok(()) => {
                        in_flight.insert(index, Instant::now() + timeout);
                    }
                    Err(err) => {
                        warn!(
                            facility_id = %facility.id,
                            error = %err,
                            "could not start metrics lookup"
                        );
                    }
                }
            }

            let Some(next_deadline) = in_flight.values().min().copied() else {
                break;
            };

            match receiver.recv_timeout(next_deadline.saturating_duration_since(Instant::now())) {
                Ok((index, outcome)) => {
                    // Late answers for lookups already given up on are ignored.
                    if in_flight.remove(&index).is_none() {
                        continue;
                    }
                    match outcome {
                        Ok(metrics) => slots[index] = Some(metrics),
                        Err(err) => {
                            warn!(
                                facility_id = err.facility_id(),
                                error = %err,
                                "dropping candidate"
                            );
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let now = Instant::now();
                    in_flight.retain(|&index, deadline| {
                        if *deadline > now {
                            return true;
                        }
                        warn!(
                            facility_id = %candidates[index].id,
                            timeout_ms = self.options.lookup_timeout_ms,
                            "dropping candidate, metrics lookup timed out"
                        );
                        false
                    });
                }
                // `sender` is still held here.
                Err(RecvTimeoutError::Disconnected) => {
                    warn!(pending = in_flight.len(), "metrics workers exited without reporting");
                    break;
                }
            }
        }

        slots
    }

    /// Start one lookup on its own worker thread.
    fn dispatch(
        &self,
        index: usize,
        origin: &Location,
        facility: &Facility,
        timeout: Duration,
        sender: Sender<Lookup>,
    ) -> io::Result<()> {
        let provider = Arc::clone(&self.provider);
        let origin = origin.clone();
        let facility = facility.clone();

        thread::Builder::new()
            .name(format!("metrics-lookup-{}", index))
            .spawn(move || {
                let outcome = measure_one(provider.as_ref(), &origin, &facility, timeout);
                // The request may have returned already.
                let _ = sender.send((index, outcome));
            })
            .map(drop)
    }
}

type Lookup = (usize, Result<RouteMetrics, MetricsError>);

fn measure_one(
    provider: &dyn RouteMetricsProvider,
    origin: &Location,
    facility: &Facility,
    timeout: Duration,
) -> Result<RouteMetrics, MetricsError> {
    let started = Instant::now();
    let mut metrics = provider.measure(origin, facility)?;

    let elapsed = started.elapsed();
    if elapsed > timeout {
        return Err(MetricsError::Timeout {
            facility_id: facility.id.clone(),
            elapsed,
        });
    }
    if !metrics.is_usable() {
        return Err(MetricsError::InvalidMetrics {
            facility_id: facility.id.clone(),
        });
    }

    metrics.facility_id = facility.id.clone();
    debug!(
        facility_id = %facility.id,
        distance_meters = metrics.distance_meters,
        duration_seconds = metrics.duration_seconds,
        traffic = %metrics.traffic,
        "measured candidate"
    );
    Ok(metrics)
}

/// Sort by duration, then distance, then facility id; mark the head primary.
pub fn rank(mut pairs: Vec<(Facility, RouteMetrics)>) -> Vec<RankedRoute> {
    pairs.sort_by(|(a_facility, a), (b_facility, b)| compare_routes(a_facility, a, b_facility, b));

    pairs
        .into_iter()
        .enumerate()
        .map(|(position, (facility, metrics))| RankedRoute {
            facility,
            metrics,
            is_primary: position == 0,
        })
        .collect()
}

fn compare_routes(
    a_facility: &Facility,
    a: &RouteMetrics,
    b_facility: &Facility,
    b: &RouteMetrics,
) -> Ordering {
    a.duration_seconds
        .total_cmp(&b.duration_seconds)
        .then_with(|| a.distance_meters.total_cmp(&b.distance_meters))
        .then_with(|| a_facility.id.cmp(&b_facility.id))
}
