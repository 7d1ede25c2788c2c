//! Configuration management and validation.
//!
//! A single immutable [`MonitorConfig`] value is built once per run
//! (defaults, then an optional TOML file, then CLI overrides) and passed
//! by reference into registry loading, observation ingestion and report
//! building.

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_LOOKBACK_HOURS, DEFAULT_REGISTRY_FILE_NAME,
    DEFAULT_THRESHOLD_MM, DEFAULT_TIMESTAMP_FORMAT, OBSERVATION_FILE_PATTERN, columns,
};
use crate::{Error, Result};
use chrono::Duration;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header names expected in the registry and observation sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Station identifier column, shared by both sources
    pub station_id: String,

    /// Station display name (registry)
    pub station_name: String,

    /// Station location label (registry)
    pub location: String,

    /// Observation timestamp
    pub time: String,

    /// Observation rainfall in millimetres
    pub rainfall: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            station_id: columns::STATION_ID.to_string(),
            station_name: columns::STATION_NAME.to_string(),
            location: columns::LOCATION.to_string(),
            time: columns::TIME.to_string(),
            rainfall: columns::RAINFALL.to_string(),
        }
    }
}

impl ColumnNames {
    fn all(&self) -> [(&'static str, &str); 5] {
        [
            ("station_id", self.station_id.as_str()),
            ("station_name", self.station_name.as_str()),
            ("location", self.location.as_str()),
            ("time", self.time.as_str()),
            ("rainfall", self.rainfall.as_str()),
        ]
    }
}

/// Run configuration for rainfall monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Directory holding the registry and observation exports
    pub data_dir: PathBuf,

    /// Registry file name within `data_dir`
    pub registry_file_name: String,

    /// Glob pattern selecting observation files within `data_dir`
    pub observation_pattern: String,

    /// Rainfall amount (mm) above which a reading flags its station
    pub threshold_mm: u32,

    /// Length of the trailing window, in hours
    pub lookback_hours: u32,

    /// chrono format string for observation timestamps, interpreted as UTC
    pub timestamp_format: String,

    /// Source header names
    pub columns: ColumnNames,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            registry_file_name: DEFAULT_REGISTRY_FILE_NAME.to_string(),
            observation_pattern: OBSERVATION_FILE_PATTERN.to_string(),
            threshold_mm: DEFAULT_THRESHOLD_MM,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            columns: ColumnNames::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        debug!("Parsing config file: {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid config file: {}", e)))
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    /// Set the registry file name
    pub fn with_registry_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.registry_file_name = file_name.into();
        self
    }

    /// Set the observation file glob pattern
    pub fn with_observation_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.observation_pattern = pattern.into();
        self
    }

    /// Set the exceedance threshold in millimetres
    pub fn with_threshold(mut self, threshold_mm: u32) -> Self {
        self.threshold_mm = threshold_mm;
        self
    }

    /// Set the trailing window length in hours
    pub fn with_lookback_hours(mut self, hours: u32) -> Self {
        self.lookback_hours = hours;
        self
    }

    /// Set the observation timestamp format
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Set the source header names
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Full path of the registry file
    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(&self.registry_file_name)
    }

    /// Trailing window as a duration
    pub fn lookback(&self) -> Duration {
        Duration::hours(i64::from(self.lookback_hours))
    }

    /// Validate configuration values for consistency
    pub fn validate(&self) -> Result<()> {
        if self.lookback_hours == 0 {
            return Err(Error::configuration(
                "Lookback window must be at least 1 hour".to_string(),
            ));
        }

        if self.registry_file_name.trim().is_empty() {
            return Err(Error::configuration(
                "Registry file name cannot be empty".to_string(),
            ));
        }

        if let Err(e) = glob::Pattern::new(&self.observation_pattern) {
            return Err(Error::configuration(format!(
                "Invalid observation file pattern '{}': {}",
                self.observation_pattern, e
            )));
        }

        if self.timestamp_format.trim().is_empty()
            || StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error))
        {
            return Err(Error::configuration(format!(
                "Invalid timestamp format '{}'",
                self.timestamp_format
            )));
        }

        for (key, name) in self.columns.all() {
            if name.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "Column name '{}' cannot be empty",
                    key
                )));
            }
        }

        Ok(())
    }
}
