//! Command-line argument definitions for the rainfall monitor
//!
//! Every flag that overlaps a [`MonitorConfig`] field is optional so that
//! an unset flag leaves the value from the config file (or the default)
//! in place.

use crate::config::MonitorConfig;
use crate::{Error, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the rainfall monitor
///
/// Loads a station registry and the rainfall exports found next to it,
/// then reports each station's rainfall over a trailing window ending at
/// the latest reading.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rainfall-monitor",
    version,
    about = "Report trailing-window rainfall statistics for a network of monitoring stations",
    long_about = "Reads a station registry (Devices.csv) and every rainfall observation export \
                  in the same directory, then reports each station's average rainfall and \
                  change in rainfall over the trailing window that ends at the latest reading. \
                  Stations with a reading above the threshold are flagged."
)]
pub struct Args {
    /// Directory holding the registry and observation exports
    ///
    /// Defaults to ./data
    #[arg(
        short = 'o',
        long = "observations",
        value_name = "DIR",
        help = "Directory holding the registry and observation CSV files"
    )]
    pub data_dir: Option<PathBuf>,

    /// Registry file name inside the data directory
    #[arg(
        short = 'd',
        long = "devices",
        value_name = "FILE",
        help = "Station registry file name inside the data directory [default: Devices.csv]"
    )]
    pub registry_file_name: Option<String>,

    /// Glob pattern selecting observation files
    #[arg(
        long = "pattern",
        value_name = "GLOB",
        help = "Glob pattern selecting observation files [default: *.csv]"
    )]
    pub observation_pattern: Option<String>,

    /// Rainfall amount above which a station is flagged
    #[arg(
        short = 't',
        long = "threshold",
        value_name = "MM",
        help = "Flag stations with a reading above this many millimetres [default: 30]"
    )]
    pub threshold_mm: Option<u32>,

    /// Length of the trailing window
    #[arg(
        long = "lookback-hours",
        value_name = "HOURS",
        help = "Length of the trailing window in hours [default: 4]"
    )]
    pub lookback_hours: Option<u32>,

    /// chrono format string for observation timestamps
    #[arg(
        long = "time-format",
        value_name = "FORMAT",
        help = "Observation timestamp format [default: %d/%m/%Y %H:%M]"
    )]
    pub timestamp_format: Option<String>,

    /// TOML configuration file
    ///
    /// Values in the file replace the defaults; command-line flags replace
    /// values from the file.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Load settings from a TOML configuration file"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Report output format"
    )]
    pub output_format: OutputFormat,

    /// Disable coloured table output
    #[arg(long = "no-color", help = "Disable coloured output")]
    pub no_color: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity"
    )]
    pub verbose: u8,

    /// Only log errors
    #[arg(
        short = 'q',
        long = "quiet",
        conflicts_with = "verbose",
        help = "Suppress everything but errors and the report"
    )]
    pub quiet: bool,
}

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured fixed-width table
    Human,
    /// One CSV row per station
    Csv,
    /// Serialized report for scripting
    Json,
}

impl Args {
    /// Build the run configuration: defaults, then the config file, then flags
    pub fn load_config(&self) -> Result<MonitorConfig> {
        let base = match &self.config_file {
            Some(path) => MonitorConfig::from_file(path)?,
            None => MonitorConfig::default(),
        };

        let config = self.apply_overrides(base);
        config.validate()?;
        Ok(config)
    }

    /// Replace config values with any flags given on the command line
    pub fn apply_overrides(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(data_dir) = &self.data_dir {
            config = config.with_data_dir(data_dir.clone());
        }
        if let Some(file_name) = &self.registry_file_name {
            config = config.with_registry_file_name(file_name.as_str());
        }
        if let Some(pattern) = &self.observation_pattern {
            config = config.with_observation_pattern(pattern.as_str());
        }
        if let Some(threshold) = self.threshold_mm {
            config = config.with_threshold(threshold);
        }
        if let Some(hours) = self.lookback_hours {
            config = config.with_lookback_hours(hours);
        }
        if let Some(format) = &self.timestamp_format {
            config = config.with_timestamp_format(format.as_str());
        }
        config
    }

    /// Validate argument combinations that clap cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(file_name) = &self.registry_file_name {
            if file_name.contains(std::path::MAIN_SEPARATOR) {
                return Err(Error::configuration(format!(
                    "Registry file name must not contain a path separator: {} (use --observations for the directory)",
                    file_name
                )));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars only draw when no log lines would interleave with them
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.verbose == 0
    }
}
