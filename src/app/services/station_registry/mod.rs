//! Station registry service
//!
//! Holds every station known to a run, indexed by id for O(1) lookups and
//! iterated in registration order for reporting.

use crate::app::models::Station;
use std::collections::HashMap;
use std::path::PathBuf;

pub mod loader;
pub mod metadata;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use metadata::LoadStats;

/// Station registry providing O(1) station lookups
///
/// Registering an id that is already present replaces the earlier station
/// in place, so iteration order stays the order in which each id was first
/// registered.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    /// Stations in registration order
    pub(crate) stations: Vec<Station>,

    /// Station id to position in `stations`
    pub(crate) index: HashMap<i32, usize>,

    /// Path the registry was loaded from, if any
    pub(crate) source_path: Option<PathBuf>,
}

impl StationRegistry {
    /// Create a new empty station registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station, returning the station it replaced if the id was already present
    pub fn register(&mut self, station: Station) -> Option<Station> {
        match self.index.get(&station.id) {
            Some(&position) => Some(std::mem::replace(&mut self.stations[position], station)),
            None => {
                self.index.insert(station.id, self.stations.len());
                self.stations.push(station);
                None
            }
        }
    }

    /// Get a station by id (O(1) lookup)
    pub fn get_station(&self, id: i32) -> Option<&Station> {
        self.index.get(&id).map(|&position| &self.stations[position])
    }

    pub(crate) fn get_station_mut(&mut self, id: i32) -> Option<&mut Station> {
        let position = *self.index.get(&id)?;
        Some(&mut self.stations[position])
    }

    /// Check if a station exists in the registry
    pub fn contains_station(&self, id: i32) -> bool {
        self.index.contains_key(&id)
    }

    /// Get the total number of stations in the registry
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Path the registry was loaded from, if it came from a file
    pub fn source_path(&self) -> Option<&PathBuf> {
        self.source_path.as_ref()
    }
}
