//! Test utilities for observation ingestion tests

use crate::app::services::station_registry::StationRegistry;
use crate::config::MonitorConfig;
use chrono::NaiveDate;

mod ingester_tests;

/// Registry with stations 1 and 2
pub fn test_registry() -> StationRegistry {
    StationRegistry::load_from_reader(
        "Device ID,Device Name,Location\n1,Gauge North,Ridge Road\n2,Gauge South,River Flats\n"
            .as_bytes(),
        "test-registry",
        &MonitorConfig::default(),
    )
    .unwrap()
    .0
}

/// Epoch milliseconds for a UTC date and time
pub fn millis(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}
