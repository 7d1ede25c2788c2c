//! Station registry loading statistics

use crate::app::models::RowError;
use crate::constants::MAX_RECORDED_ERRORS;
use std::time::Duration;

/// Statistics about the station registry loading process
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Total number of data rows encountered
    pub total_records: usize,

    /// Number of rows that produced a station
    pub stations_loaded: usize,

    /// Number of rows rejected
    pub records_rejected: usize,

    /// Number of rows whose id replaced an earlier station
    pub duplicates_replaced: usize,

    /// Time taken to load the registry
    pub load_duration: Duration,

    /// First row errors encountered, for diagnostics
    pub errors: Vec<String>,
}

impl LoadStats {
    /// Create new empty load statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a rejected row, keeping its message if there is room
    pub fn record_rejection(&mut self, row_number: usize, error: &RowError) {
        self.records_rejected += 1;
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(format!("row {}: {}", row_number, error));
        }
    }

    /// Calculate the acceptance rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.stations_loaded as f64 / self.total_records as f64) * 100.0
        }
    }

    /// Check if any rows were rejected
    pub fn has_errors(&self) -> bool {
        self.records_rejected > 0
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "{} out of {} rows processed successfully ({} rejected, {} replaced) in {:.2}s",
            self.stations_loaded,
            self.total_records,
            self.records_rejected,
            self.duplicates_replaced,
            self.load_duration.as_secs_f64()
        )
    }
}
