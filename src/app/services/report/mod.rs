//! Report assembly for windowed rainfall statistics
//!
//! The trailing window ends at the run's current time (the latest ingested
//! reading) rather than the wall clock, so a report is reproducible from
//! the same exports. Each station produces one classified row; rendering
//! the rows is left to the CLI.

use crate::app::models::{EpochMillis, Station};
use crate::app::services::station_registry::StationRegistry;
use crate::config::MonitorConfig;
use crate::constants::bands;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
pub mod tests;

// =============================================================================
// Classification
// =============================================================================

/// Classification of a station's windowed average rainfall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallBand {
    /// No reading inside the window
    NoData,
    /// Average below 10 mm
    Low,
    /// Average below 15 mm
    Medium,
    /// Average of 15 mm or more
    High,
    /// At least one reading in the window exceeded the threshold
    Flagged,
}

impl RainfallBand {
    /// Classify an average, with threshold exceedance overriding the band
    pub fn classify(average_mm: Option<f64>, exceeds_threshold: bool) -> Self {
        match average_mm {
            None => RainfallBand::NoData,
            Some(_) if exceeds_threshold => RainfallBand::Flagged,
            Some(avg) if avg < bands::LOW_UPPER_MM => RainfallBand::Low,
            Some(avg) if avg < bands::MEDIUM_UPPER_MM => RainfallBand::Medium,
            Some(_) => RainfallBand::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RainfallBand::NoData => "No data",
            RainfallBand::Low => "Low",
            RainfallBand::Medium => "Medium",
            RainfallBand::High => "High",
            RainfallBand::Flagged => "Flagged",
        }
    }
}

impl fmt::Display for RainfallBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Report Structures
// =============================================================================

/// Trailing window the report was computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Latest observation time across all sources
    pub current_time: EpochMillis,

    /// Readings must be strictly newer than this to count
    pub cutoff: EpochMillis,
}

impl ReportWindow {
    pub fn new(current_time: EpochMillis, lookback: Duration) -> Self {
        Self {
            current_time,
            cutoff: current_time.saturating_sub(lookback.num_milliseconds()),
        }
    }
}

/// One station's windowed statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReportRow {
    pub station_id: i32,
    pub station_name: String,
    pub location: String,

    /// Readings attached to the station over the whole run
    pub observation_count: usize,

    /// Mean rainfall inside the window; `None` when no reading qualifies
    pub average_rainfall_mm: Option<f64>,

    /// Latest reading minus the earliest reading inside the window
    pub change_in_rainfall_mm: i64,

    pub exceeds_threshold: bool,
    pub band: RainfallBand,
}

impl StationReportRow {
    /// Compute a station's row; without a window every statistic is empty
    pub fn for_station(station: &Station, window: Option<&ReportWindow>, threshold_mm: u32) -> Self {
        let (average_rainfall_mm, change_in_rainfall_mm, exceeds_threshold) = match window {
            Some(window) => (
                station.average_rainfall_since(window.cutoff),
                station.change_in_rainfall_since(window.cutoff),
                station.is_exceeding_threshold_since(threshold_mm, window.cutoff),
            ),
            None => (None, 0, false),
        };

        Self {
            station_id: station.id,
            station_name: station.name.clone(),
            location: station.location.clone(),
            observation_count: station.observation_count(),
            average_rainfall_mm,
            change_in_rainfall_mm,
            exceeds_threshold,
            band: RainfallBand::classify(average_rainfall_mm, exceeds_threshold),
        }
    }
}

/// Classified per-station statistics in registration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallReport {
    /// `None` when no observation was ingested
    pub window: Option<ReportWindow>,

    /// Window length in milliseconds
    pub lookback_ms: i64,

    pub threshold_mm: u32,
    pub rows: Vec<StationReportRow>,
}

impl RainfallReport {
    /// Rows whose window contained a reading above the threshold
    pub fn flagged_rows(&self) -> impl Iterator<Item = &StationReportRow> {
        self.rows.iter().filter(|row| row.exceeds_threshold)
    }

    /// Number of rows in the given band
    pub fn count_in_band(&self, band: RainfallBand) -> usize {
        self.rows.iter().filter(|row| row.band == band).count()
    }
}

// =============================================================================
// Report Assembly
// =============================================================================

/// Build the report for every registered station
///
/// `current_time` is the latest ingested observation time; when it is
/// `None` every row reports no data.
pub fn build_report(
    registry: &StationRegistry,
    current_time: Option<EpochMillis>,
    lookback: Duration,
    threshold_mm: u32,
) -> RainfallReport {
    let window = current_time.map(|now| ReportWindow::new(now, lookback));

    let rows = registry
        .stations()
        .map(|station| StationReportRow::for_station(station, window.as_ref(), threshold_mm))
        .collect();

    RainfallReport {
        window,
        lookback_ms: lookback.num_milliseconds(),
        threshold_mm,
        rows,
    }
}

/// Build the report with the configured lookback and threshold
pub fn build_report_with_config(
    registry: &StationRegistry,
    current_time: Option<EpochMillis>,
    config: &MonitorConfig,
) -> RainfallReport {
    build_report(registry, current_time, config.lookback(), config.threshold_mm)
}
