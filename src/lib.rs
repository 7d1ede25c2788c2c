//! Rainfall Monitor Library
//!
//! Ingests a station registry and one or more rainfall observation exports
//! (CSV), attaches each reading to its station, and produces per-station
//! trailing-window statistics for reporting.
//!
//! This library provides tools for:
//! - Loading the station registry with row-level error recovery
//! - Ingesting observation files into the registry, tracking the run's current time
//! - Windowed rainfall queries (average, change, threshold exceedance)
//! - Assembling a classified report relative to the latest observation
//!
//! ```no_run
//! use rainfall_monitor::app::services::observation_ingest::ObservationIngester;
//! use rainfall_monitor::app::services::report::build_report_with_config;
//! use rainfall_monitor::app::services::station_registry::StationRegistry;
//! use rainfall_monitor::MonitorConfig;
//!
//! # fn example() -> rainfall_monitor::Result<()> {
//! let config = MonitorConfig::default();
//! let (mut registry, _load_stats) =
//!     StationRegistry::load_from_path(&config.registry_path(), &config)?;
//!
//! let ingester = ObservationIngester::new(&config);
//! let outcome = ingester.ingest_path(&mut registry, std::path::Path::new("data/Data1.csv"))?;
//!
//! let report = build_report_with_config(&registry, outcome.max_timestamp, &config);
//! for row in &report.rows {
//!     println!("{} {:?} {}", row.station_name, row.average_rainfall_mm, row.band);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_source;
        pub mod discovery;
        pub mod observation_ingest;
        pub mod report;
        pub mod station_registry;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod table;
}

// Re-export commonly used types
pub use app::models::{EpochMillis, Observation, Station};
pub use config::MonitorConfig;

/// Result type alias for the rainfall monitor
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for rainfall monitoring runs
///
/// Row-level problems never surface here; they are counted by the loader and
/// ingester (see [`app::models::RowError`]).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV source could not be opened or read
    #[error("CSV error in '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// A required header column is absent from a source
    #[error("Missing column '{column}' in '{file}'")]
    MissingColumn { file: String, column: String },

    /// Input file or directory does not exist
    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing column error
    pub fn missing_column(file: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            file: file.into(),
            column: column.into(),
        }
    }

    /// Create a source not found error
    pub fn source_not_found(path: impl Into<String>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
