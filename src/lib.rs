//! emergency-router core
//!
//! Finds the fastest reachable emergency facility for a caller and returns a
//! ranked snapshot of routes: one primary, the rest as alternatives.

pub mod error;
pub mod model;
pub mod traits;
pub mod location;
pub mod engine;
pub mod coordinator;
pub mod request;
pub mod response;
pub mod catalog;
pub mod config;
pub mod fixed;
pub mod haversine;
pub mod osrm;
pub mod logging;

pub use coordinator::{Outcome, RequestCoordinator, RequestState};
pub use engine::{EngineOptions, RoutingEngine};
pub use error::{CatalogError, ConfigError, MetricsError, RequestError};
pub use model::{
    EmergencyCategory, EmptyReason, Facility, Location, RankedRoute, RequestId, RouteMetrics,
    RoutingResult, TrafficState,
};
pub use request::RoutingRequest;
pub use response::RoutingResponse;
pub use traits::{FacilityCatalog, RouteMetricsProvider};
