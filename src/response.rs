//! Outbound response and its presentation.
//!
//! The wire form keeps meters and seconds. Kilometers and minutes appear only
//! in [`render_text`].

use std::fmt::Write as _;

use serde::Serialize;

use crate::coordinator::Outcome;
use crate::model::{Facility, RankedRoute};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingResponse {
    pub status: ResponseStatus,
    pub request_id: u64,
    pub routes: Vec<RankedRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set on failures the caller may retry unchanged.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl From<&Outcome> for RoutingResponse {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success(result) => Self {
                status: ResponseStatus::Success,
                request_id: result.request_id.0,
                routes: result.routes.clone(),
                reason: None,
                retryable: false,
            },
            Outcome::Empty { request_id, reason, .. } => Self {
                status: ResponseStatus::Empty,
                request_id: request_id.0,
                routes: Vec::new(),
                reason: Some(reason.to_string()),
                retryable: false,
            },
            Outcome::Failed { request_id, error } => Self {
                status: ResponseStatus::Failed,
                request_id: request_id.0,
                routes: Vec::new(),
                reason: Some(error.to_string()),
                retryable: error.is_retryable(),
            },
        }
    }
}

/// Target for the "navigate" action: coordinates when known, else the address.
pub fn navigation_target(facility: &Facility) -> String {
    match facility.coordinates {
        Some((lat, lng)) => format!("{:.6},{:.6}", lat, lng),
        None => facility.address.clone(),
    }
}

/// Target for the "call" action, if the facility lists a phone number.
pub fn call_target(facility: &Facility) -> Option<String> {
    facility
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(|phone| format!("tel:{}", phone.replace([' ', '-', '(', ')'], "")))
}

pub fn kilometers(meters: f64) -> f64 {
    meters / 1000.0
}

pub fn minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

/// Human-readable summary for terminals.
pub fn render_text(response: &RoutingResponse) -> String {
    let mut out = String::new();
    match response.status {
        ResponseStatus::Success => {
            for (position, route) in response.routes.iter().enumerate() {
                let marker = if route.is_primary { "PRIMARY" } else { "alt" };
                let _ = writeln!(
                    out,
                    "{}. [{}] {} ({}): {:.1} km, {:.0} min, traffic {}",
                    position + 1,
                    marker,
                    route.facility.name,
                    route.facility.address,
                    kilometers(route.metrics.distance_meters),
                    minutes(route.metrics.duration_seconds),
                    route.metrics.traffic
                );
                let _ = writeln!(out, "   navigate: {}", navigation_target(&route.facility));
                if let Some(call) = call_target(&route.facility) {
                    let _ = writeln!(out, "   call: {}", call);
                }
            }
        }
        ResponseStatus::Empty | ResponseStatus::Failed => {
            let _ = writeln!(
                out,
                "{}: {}",
                if response.status == ResponseStatus::Empty { "empty" } else { "failed" },
                response.reason.as_deref().unwrap_or("unknown")
            );
        }
    }
    out
}
