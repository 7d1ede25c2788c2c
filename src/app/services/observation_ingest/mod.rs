//! Observation ingestion into the station registry
//!
//! - [`ingester`] - Reads observation sources and attaches readings to stations
//! - [`stats`] - Row statistics and the ingestion outcome
//!
//! ## Usage
//!
//! ```rust
//! use rainfall_monitor::app::services::observation_ingest::ObservationIngester;
//! use rainfall_monitor::app::services::station_registry::StationRegistry;
//! use rainfall_monitor::MonitorConfig;
//!
//! # fn example() -> rainfall_monitor::Result<()> {
//! let config = MonitorConfig::default();
//! let (mut registry, _) = StationRegistry::load_from_reader(
//!     "Device ID,Device Name,Location\n1,Gauge North,Ridge Road\n".as_bytes(),
//!     "registry",
//!     &config,
//! )?;
//!
//! let ingester = ObservationIngester::new(&config);
//! let outcome = ingester.ingest_reader(
//!     &mut registry,
//!     "Device ID,Time,Rainfall\n1,1/06/2020 9:05,4\n9,1/06/2020 9:10,2\n".as_bytes(),
//!     "observations",
//! )?;
//!
//! assert_eq!(outcome.stats.observations_ingested, 1);
//! assert_eq!(outcome.stats.unknown_stations, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod ingester;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use ingester::ObservationIngester;
pub use stats::{IngestOutcome, IngestStats};
