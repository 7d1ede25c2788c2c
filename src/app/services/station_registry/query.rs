//! Station lookup and observation attachment

use super::StationRegistry;
use crate::app::models::{Observation, RowError, Station};

impl StationRegistry {
    /// Get all station IDs in registration order
    pub fn station_ids(&self) -> Vec<i32> {
        self.stations.iter().map(|station| station.id).collect()
    }

    /// Iterate over stations in registration order
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Total number of observations attached across all stations
    pub fn total_observations(&self) -> usize {
        self.stations.iter().map(Station::observation_count).sum()
    }

    /// Attach an observation to the station it references
    ///
    /// An unregistered station id is reported as [`RowError::UnknownStation`]
    /// and leaves every station untouched.
    pub fn attach_observation(&mut self, observation: Observation) -> Result<(), RowError> {
        let station = self
            .get_station_mut(observation.station_id)
            .ok_or(RowError::UnknownStation {
                station_id: observation.station_id,
            })?;

        station.add_observation(observation)
    }
}
