//! Field parsing utilities for registry and observation records
//!
//! Every parser returns a [`RowError`] on failure; none of them abort the
//! source being read.

use super::column_mapping::ColumnMapping;
use crate::app::models::{EpochMillis, RowError};
use chrono::NaiveDateTime;
use csv::StringRecord;

/// Get a field value from a record, trimmed
///
/// An empty value is returned as-is so the typed parsers can report it;
/// only a field absent from a short row is a [`RowError::MissingField`].
pub fn get_required_field<'a>(
    record: &'a StringRecord,
    mapping: &ColumnMapping,
    column: &str,
) -> Result<&'a str, RowError> {
    mapping
        .get_index(column)
        .and_then(|index| record.get(index))
        .map(str::trim)
        .ok_or_else(|| RowError::MissingField {
            column: column.to_string(),
        })
}

/// Parse a station identifier
pub fn parse_station_id(raw: &str) -> Result<i32, RowError> {
    raw.parse::<i32>().map_err(|_| RowError::InvalidStationId {
        raw: raw.to_string(),
    })
}

/// Parse a rainfall amount in whole millimetres
pub fn parse_rainfall(raw: &str) -> Result<u32, RowError> {
    raw.parse::<u32>().map_err(|_| RowError::InvalidRainfall {
        raw: raw.to_string(),
    })
}

/// Parse a timestamp with the configured format, read as UTC
pub fn parse_timestamp(raw: &str, format: &str) -> Result<EpochMillis, RowError> {
    NaiveDateTime::parse_from_str(raw, format)
        .map(|naive| naive.and_utc().timestamp_millis())
        .map_err(|_| RowError::InvalidTimestamp {
            raw: raw.to_string(),
            format: format.to_string(),
        })
}
