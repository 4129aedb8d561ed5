//! Test fixtures for emergency-router.
//!
//! Provides realistic test data including:
//! - Real Los Angeles hospitals
//! - Scripted catalogs that fail or count their calls

#![allow(dead_code)]

pub mod la_hospitals;

use std::sync::atomic::{AtomicUsize, Ordering};

use emergency_router::{CatalogError, Facility, FacilityCatalog, Location};

pub use la_hospitals::*;

/// Catalog returning a fixed list (or a fixed error) and counting lookups.
pub struct ScriptedCatalog {
    answer: Result<Vec<Facility>, CatalogError>,
    calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn with(facilities: Vec<Facility>) -> Self {
        Self {
            answer: Ok(facilities),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with(Vec::new())
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            answer: Err(CatalogError::Unavailable(message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FacilityCatalog for ScriptedCatalog {
    fn nearby(
        &self,
        _location: &Location,
        max_results: usize,
    ) -> Result<Vec<Facility>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .map(|facilities| facilities.into_iter().take(max_results).collect())
    }
}

/// Bare facility without coordinates, for scripted providers.
pub fn facility(id: &str) -> Facility {
    Facility::new(id, format!("Facility {}", id), format!("{} Main St", id))
}
