//! Router configuration and metrics-provider selection.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::EngineOptions;
use crate::error::ConfigError;
use crate::fixed::{FixedMetrics, FixedTable};
use crate::haversine::HaversineMetrics;
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::traits::RouteMetricsProvider;

/// Which metrics provider backs the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Haversine(HaversineMetrics),
    Osrm(OsrmConfig),
    Fixed(FixedTable),
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Haversine(HaversineMetrics::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub engine: EngineOptions,
    pub provider: ProviderConfig,
}

impl RouterConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        match &self.provider {
            ProviderConfig::Haversine(haversine) => {
                if !(haversine.speed_kmh.is_finite() && haversine.speed_kmh > 0.0) {
                    return Err(ConfigError::Invalid("speed_kmh must be positive".into()));
                }
                let factor = haversine.congestion_factor;
                if !(factor.is_finite() && factor >= 1.0) {
                    return Err(ConfigError::Invalid(
                        "congestion_factor must be at least 1.0".into(),
                    ));
                }
            }
            ProviderConfig::Osrm(osrm) => {
                if osrm.base_url.trim().is_empty() {
                    return Err(ConfigError::Invalid("osrm base_url is empty".into()));
                }
            }
            ProviderConfig::Fixed(_) => {}
        }
        Ok(())
    }

    pub fn build_provider(&self) -> Result<Arc<dyn RouteMetricsProvider>, ConfigError> {
        Ok(match &self.provider {
            ProviderConfig::Haversine(haversine) => Arc::new(haversine.clone()),
            ProviderConfig::Osrm(osrm) => Arc::new(OsrmClient::new(osrm.clone())?),
            ProviderConfig::Fixed(table) => Arc::new(FixedMetrics::from_table(table)),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = RouterConfig::from_json("{}").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.engine.max_in_flight, 16);
        assert_eq!(config.engine.lookup_timeout_ms, 5_000);
    }

    #[test]
    fn selects_osrm_provider() {
        let config = RouterConfig::from_json(
            r#"{"provider":{"kind":"osrm","base_url":"http://osrm:5000"},"engine":{"max_in_flight":4}}"#,
        )
        .unwrap();
        match &config.provider {
            ProviderConfig::Osrm(osrm) => {
                assert_eq!(osrm.base_url, "http://osrm:5000");
                assert_eq!(osrm.profile, "car");
            }
            other => panic!("unexpected provider {:?}", other),
        }
        assert_eq!(config.engine.max_in_flight, 4);
        assert!(config.build_provider().is_ok());
    }

    #[test]
    fn selects_fixed_provider() {
        let config = RouterConfig::from_json(
            r#"{"provider":{"kind":"fixed","routes":[{"facility_id":"A","distance_meters":1,"duration_seconds":2}]}}"#,
        )
        .unwrap();
        assert!(
            matches!(config.provider, ProviderConfig::Fixed(ref table) if table.routes.len() == 1)
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(RouterConfig::from_json(r#"{"engine":{"max_in_flight":0}}"#).is_err());
        assert!(RouterConfig::from_json(r#"{"provider":{"kind":"haversine","speed_kmh":0}}"#).is_err());
        assert!(RouterConfig::from_json(r#"{"provider":{"kind":"teleport"}}"#).is_err());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.json");
        let config = RouterConfig::default();
        fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

        assert_eq!(RouterConfig::from_path(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RouterConfig::from_path("/nonexistent/router.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/router.json"));
    }
}
