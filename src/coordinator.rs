//! Request coordinator: the state machine callers interact with.
//!
//! ```text
//! Idle ──submit──▶ Loading ──▶ Success | Empty | Failed
//!                     ▲                     │
//!                     └──────submit─────────┘
//! ```
//!
//! Every submission takes the next sequence number. Only the outcome of the
//! highest number handed out so far may replace `Loading` in the visible
//! state; outcomes of superseded requests are returned to their caller but
//! otherwise discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, info_span, warn};

use crate::engine::RoutingEngine;
use crate::error::RequestError;
use crate::model::{EmptyReason, RequestId, RoutingResult};
use crate::request::RoutingRequest;
use crate::traits::FacilityCatalog;

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(RoutingResult),
    Empty {
        request_id: RequestId,
        reason: EmptyReason,
        dropped_candidates: usize,
    },
    Failed {
        request_id: RequestId,
        error: RequestError,
    },
}

impl Outcome {
    pub fn request_id(&self) -> RequestId {
        match self {
            Outcome::Success(result) => result.request_id,
            Outcome::Empty { request_id, .. } | Outcome::Failed { request_id, .. } => *request_id,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Empty { .. } => "empty",
            Outcome::Failed { .. } => "failed",
        }
    }
}

/// Externally visible coordinator state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
    },
    Done(Outcome),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            RequestState::Done(outcome) => Some(outcome),
            _ => None,
        }
    }
}

pub struct RequestCoordinator<C: FacilityCatalog> {
    catalog: C,
    engine: RoutingEngine,
    sequence: AtomicU64,
    state: Mutex<RequestState>,
}

impl<C: FacilityCatalog> RequestCoordinator<C> {
    pub fn new(catalog: C, engine: RoutingEngine) -> Self {
        Self {
            catalog,
            engine,
            sequence: AtomicU64::new(0),
            state: Mutex::new(RequestState::Idle),
        }
    }

    /// Snapshot of the visible state.
    pub fn state(&self) -> RequestState {
        self.lock_state().clone()
    }

    /// Whether `request_id` is still the most recent submission.
    pub fn is_latest(&self, request_id: RequestId) -> bool {
        self.sequence.load(Ordering::SeqCst) == request_id.0
    }

    /// Run one request to completion and return its outcome.
    ///
    /// Blocks the calling thread. Concurrent calls are allowed; the visible
    /// state follows the latest submission only.
    pub fn submit(&self, request: &RoutingRequest) -> Outcome {
        let request_id = self.begin();
        let span = info_span!("routing_request", %request_id);
        let _guard = span.enter();

        let outcome = self.run(request_id, request);
        match &outcome {
            Outcome::Success(result) => info!(
                routes = result.routes.len(),
                dropped = result.dropped_candidates,
                primary = result.primary().map(|route| route.facility.id.as_str()),
                "request succeeded"
            ),
            Outcome::Empty { reason, dropped_candidates, .. } => {
                info!(%reason, dropped = dropped_candidates, "request found no routes")
            }
            Outcome::Failed { error, .. } => warn!(%error, "request failed"),
        }

        self.complete(outcome.clone());
        outcome
    }

    fn run(&self, request_id: RequestId, request: &RoutingRequest) -> Outcome {
        let (category, location) = match request.validate() {
            Ok(resolved) => resolved,
            Err(error) => return Outcome::Failed { request_id, error },
        };
        debug!(%category, location = location.label(), "resolved request");

        let max_results = self.engine.options().max_candidates;
        let candidates = match self.catalog.nearby(&location, max_results) {
            Ok(candidates) => candidates,
            Err(err) => {
                return Outcome::Failed {
                    request_id,
                    error: RequestError::from(err),
                };
            }
        };
        if candidates.is_empty() {
            return Outcome::Empty {
                request_id,
                reason: EmptyReason::NoCandidates,
                dropped_candidates: 0,
            };
        }

        let result = self.engine.route(request_id, &location, &category, &candidates);
        if result.is_empty() {
            Outcome::Empty {
                request_id,
                reason: EmptyReason::NoneReachable,
                dropped_candidates: result.dropped_candidates,
            }
        } else {
            Outcome::Success(result)
        }
    }

    fn begin(&self) -> RequestId {
        let mut state = self.lock_state();
        let request_id = RequestId(self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        *state = RequestState::Loading { request_id };
        request_id
    }

    fn complete(&self, outcome: Outcome) {
        let mut state = self.lock_state();
        let request_id = outcome.request_id();
        if self.is_latest(request_id) {
            *state = RequestState::Done(outcome);
        } else {
            debug!(%request_id, "discarding superseded outcome");
        }
    }

    // State is replaced wholesale, so a poisoned lock still holds a valid value.
    fn lock_state(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
