//! Inbound routing request.

use serde::Deserialize;

use crate::error::{MissingCategory, RequestError};
use crate::location;
use crate::model::{EmergencyCategory, Location};

/// What a client sends: a location in some form plus the emergency type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub emergency_type: Option<String>,
}

impl RoutingRequest {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn at_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Build a request from textual fields such as query-string or CLI
    /// arguments. Coordinates that do not parse as finite decimals are
    /// treated as absent.
    pub fn from_text(
        latitude: Option<&str>,
        longitude: Option<&str>,
        address: Option<String>,
        emergency_type: Option<String>,
    ) -> Self {
        Self {
            latitude: location::parse_coordinate(latitude),
            longitude: location::parse_coordinate(longitude),
            address,
            emergency_type,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_emergency_type(mut self, emergency_type: impl Into<String>) -> Self {
        self.emergency_type = Some(emergency_type.into());
        self
    }

    /// The category is checked first so a missing type is reported even when
    /// the location is also unusable.
    pub fn validate(&self) -> Result<(EmergencyCategory, Location), RequestError> {
        let category = self
            .emergency_type
            .as_deref()
            .ok_or(MissingCategory)?
            .parse::<EmergencyCategory>()?;
        let location = location::resolve(self.latitude, self.longitude, self.address.as_deref())?;
        Ok((category, location))
    }
}
