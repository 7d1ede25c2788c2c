//! Data models for rainfall monitoring
//!
//! This module contains the station and observation entities and the
//! windowed statistics queries that run over a station's readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Absolute timestamp in milliseconds since the Unix epoch
pub type EpochMillis = i64;

// =============================================================================
// Observation Record Structure
// =============================================================================

/// A single rainfall reading for a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Station identifier (maps to `Station.id`)
    pub station_id: i32,

    /// Reading time in epoch milliseconds
    pub timestamp: EpochMillis,

    /// Rainfall amount in millimetres
    pub rainfall_mm: u32,
}

impl Observation {
    pub fn new(station_id: i32, timestamp: EpochMillis, rainfall_mm: u32) -> Self {
        Self {
            station_id,
            timestamp,
            rainfall_mm,
        }
    }

    /// Reading time as a UTC datetime, if representable
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

// =============================================================================
// Station Structure
// =============================================================================

/// A rainfall-monitoring station and the readings attached to it
///
/// Observations are kept in insertion order. The windowed queries only
/// consider readings strictly newer than the supplied cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Unique station identifier
    pub id: i32,

    /// Human-readable station name
    pub name: String,

    /// Free-text location label
    pub location: String,

    observations: Vec<Observation>,
}

impl Station {
    /// Create a station with no observations
    pub fn new(id: i32, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
            observations: Vec::new(),
        }
    }

    /// Attach a reading to this station
    pub fn add_observation(&mut self, observation: Observation) -> Result<(), RowError> {
        if observation.station_id != self.id {
            return Err(RowError::StationMismatch {
                expected: self.id,
                found: observation.station_id,
            });
        }

        self.observations.push(observation);
        Ok(())
    }

    /// All readings in insertion order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Reading with the greatest timestamp (the last inserted on ties)
    pub fn latest_observation(&self) -> Option<&Observation> {
        self.observations.iter().max_by_key(|o| o.timestamp)
    }

    fn observations_since(&self, cutoff: EpochMillis) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(move |o| o.timestamp > cutoff)
    }

    /// Mean rainfall of readings newer than `cutoff`
    ///
    /// Returns `None` when no reading qualifies.
    pub fn average_rainfall_since(&self, cutoff: EpochMillis) -> Option<f64> {
        let (total, count) = self
            .observations_since(cutoff)
            .fold((0u64, 0u64), |(total, count), o| {
                (total + u64::from(o.rainfall_mm), count + 1)
            });

        if count == 0 {
            None
        } else {
            Some(total as f64 / count as f64)
        }
    }

    /// Rainfall of the latest reading minus that of the earliest reading newer than `cutoff`
    ///
    /// The latest reading is taken over all observations, not just the window.
    /// Ordering is by timestamp with ties resolved by insertion order, as a
    /// stable ascending sort would give. Returns 0 when nothing qualifies.
    pub fn change_in_rainfall_since(&self, cutoff: EpochMillis) -> i64 {
        // min_by_key keeps the first of equal keys, max_by_key the last
        let Some(first) = self.observations_since(cutoff).min_by_key(|o| o.timestamp) else {
            return 0;
        };
        let Some(last) = self.latest_observation() else {
            return 0;
        };

        i64::from(last.rainfall_mm) - i64::from(first.rainfall_mm)
    }

    /// Whether any reading newer than `cutoff` has rainfall strictly above `threshold_mm`
    pub fn is_exceeding_threshold_since(&self, threshold_mm: u32, cutoff: EpochMillis) -> bool {
        self.observations_since(cutoff)
            .any(|o| o.rainfall_mm > threshold_mm)
    }
}

// =============================================================================
// Row-Level Errors
// =============================================================================

/// Reasons a source row is rejected
///
/// These are recoverable: the offending row is skipped and counted, and
/// loading or ingestion carries on with the next row.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("invalid station id '{raw}'")]
    InvalidStationId { raw: String },

    #[error("unknown station id {station_id}")]
    UnknownStation { station_id: i32 },

    #[error("invalid timestamp '{raw}' (expected format '{format}')")]
    InvalidTimestamp { raw: String, format: String },

    #[error("invalid rainfall '{raw}' (expected a non-negative integer)")]
    InvalidRainfall { raw: String },

    #[error("missing value for column '{column}'")]
    MissingField { column: String },

    #[error("malformed record: {message}")]
    MalformedRecord { message: String },

    #[error("observation for station {found} cannot be attached to station {expected}")]
    StationMismatch { expected: i32, found: i32 },
}
