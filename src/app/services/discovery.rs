//! Observation file discovery
//!
//! Observation exports sit next to the registry file in a single data
//! directory. Discovery is non-recursive and skips the registry itself.

use crate::config::MonitorConfig;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// List observation files directly inside `data_dir`
///
/// Files whose name matches `pattern` are returned sorted by file name,
/// excluding `registry_file_name`. An empty result is not an error.
pub fn discover_observation_files(
    data_dir: &Path,
    registry_file_name: &str,
    pattern: &str,
) -> Result<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        return Err(Error::source_not_found(data_dir.display().to_string()));
    }

    let pattern = glob::Pattern::new(pattern).map_err(|e| {
        Error::configuration(format!("Invalid observation file pattern '{}': {}", pattern, e))
    })?;

    debug!("Scanning for observation files in: {}", data_dir.display());

    let mut files = Vec::new();

    for entry in WalkDir::new(data_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to read {}", data_dir.display()), e)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };

        if file_name == registry_file_name || !pattern.matches(file_name) {
            continue;
        }

        files.push(entry.into_path());
    }

    // Sort files for consistent processing order
    files.sort();

    debug!("Found {} observation files", files.len());
    Ok(files)
}

/// Discover observation files using the configured directory, registry name and pattern
pub fn discover_with_config(config: &MonitorConfig) -> Result<Vec<PathBuf>> {
    discover_observation_files(
        &config.data_dir,
        &config.registry_file_name,
        &config.observation_pattern,
    )
}
