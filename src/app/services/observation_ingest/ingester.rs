//! Observation source ingestion
//!
//! Each valid row becomes an [`Observation`] appended to its station.
//! Rows with an unparseable field or an unregistered station id are
//! skipped and counted; only an unreadable source ends ingestion.

use super::stats::{IngestOutcome, IngestStats};
use crate::app::models::{Observation, RowError};
use crate::app::services::csv_source::{
    self, ColumnMapping,
    field_parsers::{get_required_field, parse_rainfall, parse_station_id, parse_timestamp},
};
use crate::app::services::station_registry::StationRegistry;
use crate::config::{ColumnNames, MonitorConfig};
use crate::Result;
use csv::StringRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reads observation sources into a station registry
#[derive(Debug, Clone)]
pub struct ObservationIngester {
    timestamp_format: String,
    columns: ColumnNames,
    show_progress: bool,
}

impl ObservationIngester {
    /// Create an ingester using the configured timestamp format and columns
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            timestamp_format: config.timestamp_format.clone(),
            columns: config.columns.clone(),
            show_progress: false,
        }
    }

    /// Display a progress bar while ingesting multiple sources
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Ingest several sources one after another
    ///
    /// The outcome's `max_timestamp` is the latest reading across every
    /// source. The first source that cannot be read aborts ingestion.
    pub fn ingest_sources(
        &self,
        registry: &mut StationRegistry,
        paths: &[PathBuf],
    ) -> Result<IngestOutcome> {
        let progress_bar = (self.show_progress && paths.len() > 1).then(|| {
            let pb = ProgressBar::new(paths.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map(|style| style.progress_chars("#>-"))
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        });

        let mut outcome = IngestOutcome::default();

        for path in paths {
            if let Some(pb) = &progress_bar {
                pb.set_message(format!(
                    "Ingesting {}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                ));
            }

            outcome.merge(self.ingest_path(registry, path)?);

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_with_message("Observation ingestion complete");
        }

        Ok(outcome)
    }

    /// Ingest a single observation CSV file
    ///
    /// # Errors
    /// * Returns `Error::SourceNotFound` if the file doesn't exist
    /// * Returns `Error::CsvParsing` if the file cannot be opened or read
    /// * Returns `Error::MissingColumn` if a configured observation column is absent
    pub fn ingest_path(&self, registry: &mut StationRegistry, path: &Path) -> Result<IngestOutcome> {
        info!("Loading observations from {}", path.display());

        let reader = csv_source::open_path(path)?;
        self.ingest_csv(registry, reader, &path.display().to_string())
    }

    /// Ingest observations from any reader producing CSV text
    pub fn ingest_reader<R: Read>(
        &self,
        registry: &mut StationRegistry,
        reader: R,
        source_name: &str,
    ) -> Result<IngestOutcome> {
        self.ingest_csv(registry, csv_source::from_reader(reader), source_name)
    }

    fn ingest_csv<R: Read>(
        &self,
        registry: &mut StationRegistry,
        mut reader: csv::Reader<R>,
        source_name: &str,
    ) -> Result<IngestOutcome> {
        let mapping = csv_source::read_column_mapping(
            &mut reader,
            source_name,
            &[
                self.columns.station_id.as_str(),
                self.columns.time.as_str(),
                self.columns.rainfall.as_str(),
            ],
        )?;

        let mut stats = IngestStats::new();
        let mut max_timestamp = None;

        for (row_index, result) in reader.records().enumerate() {
            // Header is line 1
            let row_number = row_index + 2;
            stats.total_records += 1;

            let attached = match result {
                Ok(record) => self
                    .parse_observation_record(&record, &mapping)
                    .and_then(|observation| {
                        registry.attach_observation(observation)?;
                        Ok(observation)
                    }),
                Err(e) => Err(csv_source::classify_read_error(e, source_name)?),
            };

            match attached {
                Ok(observation) => {
                    debug!(
                        station_id = observation.station_id,
                        timestamp = observation.timestamp,
                        rainfall_mm = observation.rainfall_mm,
                        "Ingested observation"
                    );
                    stats.observations_ingested += 1;
                    max_timestamp = max_timestamp.max(Some(observation.timestamp));
                }
                Err(e) => {
                    warn!("Skipping observation row {} in {}: {}", row_number, source_name, e);
                    stats.record_rejection(source_name, row_number, &e);
                }
            }
        }

        stats.sources_processed = 1;

        info!("Observations loaded from {}: {}", source_name, stats.summary());

        Ok(IngestOutcome {
            max_timestamp,
            stats,
        })
    }

    /// Parse one observation row without touching the registry
    pub fn parse_observation_record(
        &self,
        record: &StringRecord,
        mapping: &ColumnMapping,
    ) -> std::result::Result<Observation, RowError> {
        let station_id = parse_station_id(get_required_field(record, mapping, &self.columns.station_id)?)?;
        let timestamp = parse_timestamp(
            get_required_field(record, mapping, &self.columns.time)?,
            &self.timestamp_format,
        )?;
        let rainfall_mm = parse_rainfall(get_required_field(record, mapping, &self.columns.rainfall)?)?;

        Ok(Observation::new(station_id, timestamp, rainfall_mm))
    }
}
