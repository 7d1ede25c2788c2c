//! Column name resolution for header-bearing CSV sources

use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;

const UTF8_BOM: char = '\u{feff}';

/// Column name to field index mapping for one source
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Column name to index mapping
    pub name_to_index: HashMap<String, usize>,
}

impl ColumnMapping {
    /// Build a mapping from a header row, trimming names and any byte order mark
    pub fn from_headers(headers: &StringRecord) -> Self {
        let name_to_index = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let name = header.trim_start_matches(UTF8_BOM).trim().to_string();
                (name, index)
            })
            .collect();

        Self { name_to_index }
    }

    /// Build a mapping and fail if any required column is absent
    pub fn resolve(headers: &StringRecord, source_name: &str, required: &[&str]) -> Result<Self> {
        let mapping = Self::from_headers(headers);

        if let Some(missing) = required.iter().find(|name| !mapping.has_column(name)) {
            return Err(Error::missing_column(source_name, *missing));
        }

        Ok(mapping)
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name).copied()
    }

    /// Check if a column exists in the mapping
    pub fn has_column(&self, column_name: &str) -> bool {
        self.name_to_index.contains_key(column_name)
    }
}
