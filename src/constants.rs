//! Application constants for the rainfall monitor
//!
//! Default values, column names and classification bounds used throughout
//! the loader, ingester and report assembler.

// =============================================================================
// Input Locations and File Patterns
// =============================================================================

/// Default directory holding the registry and observation exports
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default registry file name within the data directory
pub const DEFAULT_REGISTRY_FILE_NAME: &str = "Devices.csv";

/// Observation data file pattern
pub const OBSERVATION_FILE_PATTERN: &str = "*.csv";

// =============================================================================
// Column Names
// =============================================================================

/// Header names used by the sensor network exports
pub mod columns {
    /// Station identifier column (registry and observations)
    pub const STATION_ID: &str = "Device ID";

    /// Station display name column (registry)
    pub const STATION_NAME: &str = "Device Name";

    /// Station location label column (registry)
    pub const LOCATION: &str = "Location";

    /// Observation timestamp column
    pub const TIME: &str = "Time";

    /// Observation rainfall column, integer millimetres
    pub const RAINFALL: &str = "Rainfall";
}

// =============================================================================
// Parsing
// =============================================================================

/// Default observation timestamp format (day/month/year, 24-hour clock)
///
/// Single-digit days and hours are accepted by the parser.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Maximum number of row error messages kept for diagnostics per stats value
pub const MAX_RECORDED_ERRORS: usize = 100;

// =============================================================================
// Reporting
// =============================================================================

/// Default trailing window, in hours
pub const DEFAULT_LOOKBACK_HOURS: u32 = 4;

/// Default exceedance threshold, in millimetres
pub const DEFAULT_THRESHOLD_MM: u32 = 30;

/// Rainfall band upper bounds (exclusive) for average classification
pub mod bands {
    /// Averages below this are low
    pub const LOW_UPPER_MM: f64 = 10.0;

    /// Averages below this (and not low) are medium; anything else is high
    pub const MEDIUM_UPPER_MM: f64 = 15.0;
}
