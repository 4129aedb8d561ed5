//! Error types for the router.
//!
//! Request-level failures ([`RequestError`]) are what callers see. Collaborator
//! errors ([`CatalogError`], [`MetricsError`]) are produced by catalog and
//! metrics implementations; metrics errors never leave the engine.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Raised by the location resolver when no usable location was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("location missing/invalid")]
pub struct InvalidLocation;

/// Raised when the caller did not name an emergency type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("please specify the emergency type")]
pub struct MissingCategory;

/// Failure of the facility catalog collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Transport-level failure (network, I/O, malformed payload).
    #[error("facility catalog unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single metrics lookup. Absorbed by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("metrics transport error for {facility_id}: {message}")]
    Transport { facility_id: String, message: String },

    #[error("metrics lookup for {facility_id} timed out after {elapsed:?}")]
    Timeout { facility_id: String, elapsed: Duration },

    /// The provider cannot route between the given endpoints at all.
    #[error("cannot route to {facility_id}: {reason}")]
    Unroutable { facility_id: String, reason: String },

    #[error("provider returned unusable metrics for {facility_id}")]
    InvalidMetrics { facility_id: String },
}

impl MetricsError {
    pub fn facility_id(&self) -> &str {
        match self {
            MetricsError::Transport { facility_id, .. }
            | MetricsError::Timeout { facility_id, .. }
            | MetricsError::Unroutable { facility_id, .. }
            | MetricsError::InvalidMetrics { facility_id } => facility_id,
        }
    }
}

/// Request-level failure reported to the caller as `status = "failed"`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error(transparent)]
    MissingCategory(#[from] MissingCategory),

    #[error(transparent)]
    InvalidLocation(#[from] InvalidLocation),

    /// Retryable by the caller.
    #[error("routing computation failed: {0}")]
    CatalogUnavailable(#[from] CatalogError),
}

impl RequestError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RequestError::CatalogUnavailable(_))
    }
}

/// Configuration loading and provider construction errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_failure_message_mentions_catalog() {
        let err = RequestError::from(CatalogError::Unavailable("connection refused".into()));
        let message = err.to_string();
        assert!(message.starts_with("routing computation failed"));
        assert!(message.contains("facility catalog unavailable"));
        assert!(err.is_retryable());
    }

    #[test]
    fn resolution_errors_are_not_retryable() {
        assert!(!RequestError::from(MissingCategory).is_retryable());
        assert_eq!(
            RequestError::from(InvalidLocation).to_string(),
            "location missing/invalid"
        );
    }
}
