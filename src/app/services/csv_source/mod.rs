//! Header-bearing CSV record source shared by the registry loader and the
//! observation ingester
//!
//! - [`column_mapping`] - Resolves configured column names to field indexes
//! - [`field_parsers`] - Typed field extraction returning row-level errors
//!
//! Opening failures and unreadable bytes are fatal ([`crate::Error`]); a
//! single malformed record is reported as a [`RowError`] so callers can skip
//! it and continue.

pub mod column_mapping;
pub mod field_parsers;

#[cfg(test)]
pub mod tests;

pub use column_mapping::ColumnMapping;

use crate::app::models::RowError;
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Short rows are rejected per record rather than failing the whole source
    builder.has_headers(true).flexible(true);
    builder
}

/// Open a CSV file with a header row
pub fn open_path(path: &Path) -> Result<csv::Reader<File>> {
    if !path.exists() {
        return Err(Error::source_not_found(path.display().to_string()));
    }

    reader_builder().from_path(path).map_err(|e| {
        Error::csv_parsing(
            path.display().to_string(),
            "Failed to open CSV file".to_string(),
            Some(e),
        )
    })
}

/// Wrap an arbitrary reader as a CSV source with a header row
pub fn from_reader<R: Read>(reader: R) -> csv::Reader<R> {
    reader_builder().from_reader(reader)
}

/// Read the header row and resolve the required columns
pub fn read_column_mapping<R: Read>(
    reader: &mut csv::Reader<R>,
    source_name: &str,
    required: &[&str],
) -> Result<ColumnMapping> {
    let headers = reader.headers().map_err(|e| {
        Error::csv_parsing(
            source_name.to_string(),
            "Failed to read header row".to_string(),
            Some(e),
        )
    })?;

    ColumnMapping::resolve(headers, source_name, required)
}

/// Decide whether a record read failure ends the source or only the row
///
/// I/O failures mean the source itself cannot be read; anything else
/// (invalid UTF-8, for example) only affects the current record.
pub fn classify_read_error(error: csv::Error, source_name: &str) -> Result<RowError> {
    if error.is_io_error() {
        return Err(Error::csv_parsing(
            source_name.to_string(),
            "Failed to read record".to_string(),
            Some(error),
        ));
    }

    Ok(RowError::MalformedRecord {
        message: error.to_string(),
    })
}
