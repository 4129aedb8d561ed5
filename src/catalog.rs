//! In-memory facility catalog.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rayon::prelude::*;

use crate::error::CatalogError;
use crate::haversine::haversine_km;
use crate::model::{Facility, Location};
use crate::traits::FacilityCatalog;

/// Facility list held in memory, typically loaded from a JSON array.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    facilities: Vec<Facility>,
}

impl InMemoryCatalog {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|err| CatalogError::Unavailable(format!("{}: {}", path.display(), err)))?;
        let facilities: Vec<Facility> = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| CatalogError::Unavailable(format!("{}: {}", path.display(), err)))?;
        Ok(Self::new(facilities))
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

impl FacilityCatalog for InMemoryCatalog {
    /// Closest facilities first when the origin has coordinates; facilities
    /// without coordinates come last. Address-only origins get id order.
    fn nearby(
        &self,
        location: &Location,
        max_results: usize,
    ) -> Result<Vec<Facility>, CatalogError> {
        let mut keyed: Vec<(Option<f64>, &Facility)> = self
            .facilities
            .par_iter()
            .map(|facility| {
                let distance = location
                    .coordinates()
                    .zip(facility.coordinates)
                    .map(|(from, to)| haversine_km(from, to));
                (distance, facility)
            })
            .collect();

        keyed.par_sort_by(|(a_distance, a), (b_distance, b)| {
            let by_distance = match (a_distance, b_distance) {
                (Some(a_km), Some(b_km)) => a_km.total_cmp(b_km),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            by_distance.then_with(|| a.id.cmp(&b.id))
        });

        Ok(keyed
            .into_iter()
            .take(max_results)
            .map(|(_, facility)| facility.clone())
            .collect())
    }
}
