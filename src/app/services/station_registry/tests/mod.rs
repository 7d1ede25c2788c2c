//! Shared test utilities and fixtures for station registry tests

use crate::config::MonitorConfig;
use crate::app::services::station_registry::{LoadStats, StationRegistry};


/// Registry export with one row of each kind the loader must handle
pub const MIXED_REGISTRY_CSV: &str = "\
Device ID,Device Name,Location
1,Gauge North,Ridge Road
2,Gauge South,River Flats
X3,Broken Gauge,Nowhere
,Unnamed,Unknown
4,Gauge East,\"Creek, Upper\"
";

/// Load a registry from CSV text with the default configuration
pub fn load_registry(csv_text: &str) -> (StationRegistry, LoadStats) {
    StationRegistry::load_from_reader(csv_text.as_bytes(), "test-registry", &MonitorConfig::default())
        .unwrap()
}
