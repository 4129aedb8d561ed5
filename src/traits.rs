//! Collaborator interfaces consumed by the router.
//!
//! The router never owns facility records or computes road routes itself;
//! concrete deployments plug in implementations of these traits.

use std::sync::Arc;

use crate::error::{CatalogError, MetricsError};
use crate::model::{Facility, Location, RouteMetrics};

/// Supplies candidate facilities near a location.
pub trait FacilityCatalog: Send + Sync {
    /// At most `max_results` facilities relevant to `location`.
    ///
    /// An empty list is a legitimate answer; `Err` is reserved for the
    /// catalog itself being unreachable.
    fn nearby(
        &self,
        location: &Location,
        max_results: usize,
    ) -> Result<Vec<Facility>, CatalogError>;
}

/// Measures distance, travel time and traffic from an origin to a facility.
///
/// Called concurrently from worker threads, once per candidate.
pub trait RouteMetricsProvider: Send + Sync {
    fn measure(
        &self,
        origin: &Location,
        destination: &Facility,
    ) -> Result<RouteMetrics, MetricsError>;
}

impl<C> FacilityCatalog for Arc<C>
where
    C: FacilityCatalog + ?Sized,
{
    fn nearby(
        &self,
        location: &Location,
        max_results: usize,
    ) -> Result<Vec<Facility>, CatalogError> {
        (**self).nearby(location, max_results)
    }
}
