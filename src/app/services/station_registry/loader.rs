//! Station registry loading
//!
//! Reads registry rows (station id, name, location) from a header-bearing
//! CSV source. Rows whose id does not parse are skipped and counted;
//! only an unreadable source is an error.

use super::StationRegistry;
use super::metadata::LoadStats;
use crate::app::models::{RowError, Station};
use crate::app::services::csv_source::{
    self, ColumnMapping,
    field_parsers::{get_required_field, parse_station_id},
};
use crate::config::{ColumnNames, MonitorConfig};
use crate::Result;
use csv::StringRecord;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

impl StationRegistry {
    /// Load the station registry from a CSV file
    ///
    /// # Errors
    /// * Returns `Error::SourceNotFound` if the file doesn't exist
    /// * Returns `Error::CsvParsing` if the file cannot be opened or read
    /// * Returns `Error::MissingColumn` if a configured registry column is absent
    pub fn load_from_path(path: &Path, config: &MonitorConfig) -> Result<(Self, LoadStats)> {
        info!("Loading station registry from {}", path.display());

        let reader = csv_source::open_path(path)?;
        let (mut registry, stats) =
            Self::load_from_csv(reader, &path.display().to_string(), config)?;
        registry.source_path = Some(path.to_path_buf());

        Ok((registry, stats))
    }

    /// Load the station registry from any reader producing CSV text
    pub fn load_from_reader<R: Read>(
        reader: R,
        source_name: &str,
        config: &MonitorConfig,
    ) -> Result<(Self, LoadStats)> {
        Self::load_from_csv(csv_source::from_reader(reader), source_name, config)
    }

    fn load_from_csv<R: Read>(
        mut reader: csv::Reader<R>,
        source_name: &str,
        config: &MonitorConfig,
    ) -> Result<(Self, LoadStats)> {
        let start_time = Instant::now();
        let columns = &config.columns;
        let mapping = csv_source::read_column_mapping(
            &mut reader,
            source_name,
            &[
                columns.station_id.as_str(),
                columns.station_name.as_str(),
                columns.location.as_str(),
            ],
        )?;

        let mut registry = Self::new();
        let mut stats = LoadStats::new();

        for (row_index, result) in reader.records().enumerate() {
            // Header is line 1
            let row_number = row_index + 2;
            stats.total_records += 1;

            let parsed = match result {
                Ok(record) => parse_station_record(&record, &mapping, columns),
                Err(e) => Err(csv_source::classify_read_error(e, source_name)?),
            };

            let station = match parsed {
                Ok(station) => station,
                Err(e) => {
                    warn!("Skipping registry row {} in {}: {}", row_number, source_name, e);
                    stats.record_rejection(row_number, &e);
                    continue;
                }
            };

            debug!(
                station_id = station.id,
                name = %station.name,
                location = %station.location,
                "Registered station"
            );

            if let Some(replaced) = registry.register(station) {
                warn!(
                    "Duplicate station id {} at row {}: replacing '{}'",
                    replaced.id, row_number, replaced.name
                );
                stats.duplicates_replaced += 1;
            }
            stats.stations_loaded += 1;
        }

        stats.load_duration = start_time.elapsed();

        info!(
            "Station registry loaded from {}: {} stations, {}",
            source_name,
            registry.station_count(),
            stats.summary()
        );

        Ok((registry, stats))
    }
}

/// Parse one registry row into a station
pub fn parse_station_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
    columns: &ColumnNames,
) -> std::result::Result<Station, RowError> {
    let id = parse_station_id(get_required_field(record, mapping, &columns.station_id)?)?;
    let name = get_required_field(record, mapping, &columns.station_name)?;
    let location = get_required_field(record, mapping, &columns.location)?;

    Ok(Station::new(id, name, location))
}
