//! Ingestion statistics and outcome structures

use crate::app::models::{EpochMillis, RowError};
use crate::constants::MAX_RECORDED_ERRORS;
use serde::{Deserialize, Serialize};

/// Result of ingesting one or more observation sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutcome {
    /// Latest accepted observation time; `None` if nothing was accepted
    pub max_timestamp: Option<EpochMillis>,

    /// Row statistics
    pub stats: IngestStats,
}

impl IngestOutcome {
    /// Fold another outcome into this one, keeping the later current time
    pub fn merge(&mut self, other: IngestOutcome) {
        self.max_timestamp = self.max_timestamp.max(other.max_timestamp);
        self.stats.merge(&other.stats);
    }
}

/// Row statistics for observation ingestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of sources read
    pub sources_processed: usize,

    /// Total number of data rows encountered
    pub total_records: usize,

    /// Number of observations attached to stations
    pub observations_ingested: usize,

    /// Number of rows rejected for any reason
    pub records_rejected: usize,

    /// Rejections by cause
    pub invalid_station_ids: usize,
    pub unknown_stations: usize,
    pub invalid_timestamps: usize,
    pub invalid_rainfall: usize,
    pub malformed_records: usize,

    /// First row errors encountered, for diagnostics
    pub errors: Vec<String>,
}

impl IngestStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a rejected row under its cause
    pub fn record_rejection(&mut self, source_name: &str, row_number: usize, error: &RowError) {
        self.records_rejected += 1;

        match error {
            RowError::InvalidStationId { .. } => self.invalid_station_ids += 1,
            RowError::UnknownStation { .. } | RowError::StationMismatch { .. } => {
                self.unknown_stations += 1
            }
            RowError::InvalidTimestamp { .. } => self.invalid_timestamps += 1,
            RowError::InvalidRainfall { .. } => self.invalid_rainfall += 1,
            RowError::MissingField { .. } | RowError::MalformedRecord { .. } => {
                self.malformed_records += 1
            }
        }

        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors
                .push(format!("{} row {}: {}", source_name, row_number, error));
        }
    }

    /// Add another set of statistics to this one
    pub fn merge(&mut self, other: &IngestStats) {
        self.sources_processed += other.sources_processed;
        self.total_records += other.total_records;
        self.observations_ingested += other.observations_ingested;
        self.records_rejected += other.records_rejected;
        self.invalid_station_ids += other.invalid_station_ids;
        self.unknown_stations += other.unknown_stations;
        self.invalid_timestamps += other.invalid_timestamps;
        self.invalid_rainfall += other.invalid_rainfall;
        self.malformed_records += other.malformed_records;

        let room = MAX_RECORDED_ERRORS.saturating_sub(self.errors.len());
        self.errors
            .extend(other.errors.iter().take(room).cloned());
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.observations_ingested as f64 / self.total_records as f64) * 100.0
        }
    }

    /// Get a summary string of the ingestion
    pub fn summary(&self) -> String {
        format!(
            "{} out of {} rows processed successfully across {} source(s)",
            self.observations_ingested, self.total_records, self.sources_processed
        )
    }
}
