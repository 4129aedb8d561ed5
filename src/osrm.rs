//! OSRM HTTP adapter for route metrics.

use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::model::{Facility, Location, RouteMetrics, TrafficState};
use crate::traits::RouteMetricsProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: (f64, f64), to: (f64, f64)) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.1,
            from.0,
            to.1,
            to.0
        )
    }
}

impl RouteMetricsProvider for OsrmClient {
    fn measure(
        &self,
        origin: &Location,
        destination: &Facility,
    ) -> Result<RouteMetrics, MetricsError> {
        let facility_id = destination.id.clone();
        let (Some(from), Some(to)) = (origin.coordinates(), destination.coordinates) else {
            return Err(MetricsError::Unroutable {
                facility_id,
                reason: "OSRM needs coordinates for both endpoints".to_string(),
            });
        };

        let started = std::time::Instant::now();
        let response = self
            .client
            .get(self.route_url(from, to))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>());

        match response {
            Ok(body) => metrics_from_response(&facility_id, body),
            Err(err) if err.is_timeout() => Err(MetricsError::Timeout {
                facility_id,
                elapsed: started.elapsed(),
            }),
            Err(err) => Err(MetricsError::Transport {
                facility_id,
                message: err.to_string(),
            }),
        }
    }
}

/// OSRM carries no congestion data, so traffic is always `Unknown`.
fn metrics_from_response(
    facility_id: &str,
    body: OsrmRouteResponse,
) -> Result<RouteMetrics, MetricsError> {
    if body.code != "Ok" {
        return Err(MetricsError::Unroutable {
            facility_id: facility_id.to_string(),
            reason: format!("OSRM answered {}", body.code),
        });
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| MetricsError::Unroutable {
            facility_id: facility_id.to_string(),
            reason: "OSRM returned no routes".to_string(),
        })?;

    Ok(RouteMetrics::new(
        facility_id,
        route.distance,
        route.duration,
        TrafficState::Unknown,
    ))
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::resolve;

    fn parse(json: &str) -> OsrmRouteResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn takes_first_route() {
        let body = parse(
            r#"{"code":"Ok","routes":[{"distance":3210.4,"duration":482.1,"weight":482.1},{"distance":4000,"duration":600}],"waypoints":[]}"#,
        );
        let metrics = metrics_from_response("A", body).unwrap();
        assert_eq!(metrics.facility_id, "A");
        assert_eq!(metrics.distance_meters, 3210.4);
        assert_eq!(metrics.duration_seconds, 482.1);
        assert_eq!(metrics.traffic, TrafficState::Unknown);
    }

    #[test]
    fn no_route_code_is_unroutable() {
        let body = parse(r#"{"code":"NoRoute","message":"Impossible route between points"}"#);
        let err = metrics_from_response("A", body).unwrap_err();
        assert!(matches!(err, MetricsError::Unroutable { .. }));
    }

    #[test]
    fn url_is_lng_lat_ordered() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://osrm.local/".to_string(),
            ..OsrmConfig::default()
        })
        .unwrap();
        let url = client.route_url((34.0522, -118.2437), (34.0639, -118.2936));
        assert_eq!(
            url,
            "http://osrm.local/route/v1/car/-118.243700,34.052200;-118.293600,34.063900?overview=false"
        );
    }

    #[test]
    fn unreachable_server_is_transport_error() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OsrmConfig::default()
        })
        .unwrap();
        let origin = resolve(Some(34.0522), Some(-118.2437), None).unwrap();
        let facility = Facility::new("A", "A", "a").with_coordinates(34.0639, -118.2936);

        let err = client.measure(&origin, &facility).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::Transport { .. } | MetricsError::Timeout { .. }
        ));
    }

    #[test]
    fn address_only_origin_is_unroutable() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let origin = resolve(None, None, Some("Union Station")).unwrap();
        let facility = Facility::new("A", "A", "a").with_coordinates(34.0639, -118.2936);
        let err = client.measure(&origin, &facility).unwrap_err();
        assert!(matches!(err, MetricsError::Unroutable { .. }));
    }
}
