//! Domain values shared across the router.
//!
//! Everything here is immutable once built. Coordinates are `(lat, lng)`
//! tuples in decimal degrees; distances are meters and durations seconds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MissingCategory;

/// A resolved caller location.
///
/// Constructed only through [`crate::location::resolve`], which guarantees
/// that at least one of `coordinates` or `address` is present and that
/// coordinates are finite and in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    coordinates: Option<(f64, f64)>,
    address: Option<String>,
    label: String,
}

impl Location {
    pub(crate) fn from_coordinates(lat: f64, lng: f64, address: Option<String>) -> Self {
        let label = match &address {
            Some(address) => address.clone(),
            None => format!("{:.4}, {:.4}", lat, lng),
        };
        Self {
            coordinates: Some((lat, lng)),
            address,
            label,
        }
    }

    pub(crate) fn from_address(address: String) -> Self {
        Self {
            coordinates: None,
            label: address.clone(),
            address: Some(address),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.coordinates
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Human-readable label: the address if one was given, otherwise the
    /// coordinates rounded to four decimal places.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Emergency type supplied by the caller.
///
/// Carried through for downstream advisory use; ranking ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum EmergencyCategory {
    Cardiac,
    Trauma,
    General,
    Other(String),
}

impl EmergencyCategory {
    pub fn as_str(&self) -> &str {
        match self {
            EmergencyCategory::Cardiac => "cardiac",
            EmergencyCategory::Trauma => "trauma",
            EmergencyCategory::General => "general",
            EmergencyCategory::Other(tag) => tag,
        }
    }
}

impl FromStr for EmergencyCategory {
    type Err = MissingCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let tag = raw.trim();
        if tag.is_empty() {
            return Err(MissingCategory);
        }
        Ok(match tag.to_ascii_lowercase().as_str() {
            "cardiac" => EmergencyCategory::Cardiac,
            "trauma" => EmergencyCategory::Trauma,
            "general" => EmergencyCategory::General,
            _ => EmergencyCategory::Other(tag.to_string()),
        })
    }
}

impl fmt::Display for EmergencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmergencyCategory> for String {
    fn from(category: EmergencyCategory) -> Self {
        category.as_str().to_string()
    }
}

/// A candidate emergency facility, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(f64, f64)>,
}

impl Facility {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: None,
            coordinates: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some((lat, lng));
        self
    }
}

/// Coarse congestion descriptor for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficState {
    Light,
    Moderate,
    Heavy,
    #[default]
    Unknown,
}

impl TrafficState {
    /// Upper bound (inclusive) of the congestion factor still considered light.
    pub const LIGHT_MAX: f64 = 1.15;
    /// Upper bound (inclusive) of the congestion factor still considered moderate.
    pub const MODERATE_MAX: f64 = 1.5;

    /// Classify a ratio of observed to free-flow travel time.
    pub fn from_congestion(factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            TrafficState::Unknown
        } else if factor <= Self::LIGHT_MAX {
            TrafficState::Light
        } else if factor <= Self::MODERATE_MAX {
            TrafficState::Moderate
        } else {
            TrafficState::Heavy
        }
    }
}

impl fmt::Display for TrafficState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TrafficState::Light => "light",
            TrafficState::Moderate => "moderate",
            TrafficState::Heavy => "heavy",
            TrafficState::Unknown => "unknown",
        };
        f.write_str(text)
    }
}

/// Route measurements from an origin to one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    pub facility_id: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub traffic: TrafficState,
}

impl RouteMetrics {
    pub fn new(
        facility_id: impl Into<String>,
        distance_meters: f64,
        duration_seconds: f64,
        traffic: TrafficState,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            distance_meters,
            duration_seconds,
            traffic,
        }
    }

    /// Finite and non-negative distance and duration.
    pub fn is_usable(&self) -> bool {
        self.distance_meters.is_finite()
            && self.distance_meters >= 0.0
            && self.duration_seconds.is_finite()
            && self.duration_seconds >= 0.0
    }
}

/// A facility with its measured route and primary designation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRoute {
    pub facility: Facility,
    pub metrics: RouteMetrics,
    pub is_primary: bool,
}

/// Submission sequence number; also identifies the request in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Ranked snapshot for one request.
///
/// When `routes` is non-empty exactly one entry is primary and it is first;
/// the remainder ascend by duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingResult {
    pub request_id: RequestId,
    pub routes: Vec<RankedRoute>,
    /// Candidates whose metrics lookup failed or timed out.
    pub dropped_candidates: usize,
}

impl RoutingResult {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn primary(&self) -> Option<&RankedRoute> {
        self.routes.first().filter(|route| route.is_primary)
    }
}

/// Why a request finished without routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The catalog returned zero facilities.
    NoCandidates,
    /// Candidates existed but every metrics lookup failed.
    NoneReachable,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoCandidates => {
                f.write_str("no nearby facilities found; retry or widen the search area")
            }
            EmptyReason::NoneReachable => {
                f.write_str("no facilities reachable; retry or widen the search area")
            }
        }
    }
}
