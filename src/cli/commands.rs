//! Command implementation for the rainfall monitor
//!
//! A run loads the registry, ingests every observation export found beside
//! it, builds the report relative to the latest reading and writes it to
//! stdout in the requested format.

use crate::app::services::discovery::discover_with_config;
use crate::app::services::observation_ingest::{IngestStats, ObservationIngester};
use crate::app::services::report::{RainfallReport, build_report_with_config};
use crate::app::services::station_registry::{LoadStats, StationRegistry};
use crate::cli::args::{Args, OutputFormat};
use crate::cli::table::render_table;
use anyhow::{Context, Result};
use indicatif::HumanDuration;
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Statistics and report produced by a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub load_stats: LoadStats,
    pub ingest_stats: IngestStats,
    pub report: RainfallReport,
}

/// Main entry point: set up logging, then execute against stdout
pub fn run(args: Args) -> Result<RunSummary> {
    setup_logging(&args)?;

    if args.no_color {
        colored::control::set_override(false);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&args, &mut out)
}

/// Execute a run, writing the rendered report to `out`
pub fn execute<W: Write>(args: &Args, out: &mut W) -> Result<RunSummary> {
    let start_time = Instant::now();

    info!("Starting rainfall monitor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.load_config().context("Failed to load configuration")?;
    debug!("Loaded configuration: {:?}", config);

    let registry_path = config.registry_path();
    let (mut registry, load_stats) = StationRegistry::load_from_path(&registry_path, &config)
        .with_context(|| {
            format!("Failed to load station registry from {}", registry_path.display())
        })?;

    if registry.is_empty() {
        warn!("Station registry {} contains no stations", registry_path.display());
    }

    let sources = discover_with_config(&config).with_context(|| {
        format!("Failed to scan {} for observation files", config.data_dir.display())
    })?;

    if sources.is_empty() {
        warn!(
            "No observation files matching '{}' found in {}",
            config.observation_pattern,
            config.data_dir.display()
        );
    }

    let ingester = ObservationIngester::new(&config).with_progress(args.show_progress());
    let outcome = ingester
        .ingest_sources(&mut registry, &sources)
        .context("Failed to ingest observations")?;

    log_statistics(&load_stats, &outcome.stats);
    info!(
        "{} observations attached across {} stations",
        registry.total_observations(),
        registry.station_count()
    );

    match outcome.max_timestamp {
        Some(current_time) => info!("Current time (latest observation): {}", current_time),
        None => warn!("No valid observations ingested; every station reports no data"),
    }

    let report = build_report_with_config(&registry, outcome.max_timestamp, &config);

    for row in report.flagged_rows() {
        warn!(
            "Station {} ({}) exceeded {} mm within the last {} hours",
            row.station_id, row.station_name, config.threshold_mm, config.lookback_hours
        );
    }

    write_report(&report, args.output_format, out)?;

    info!("Run completed in {}", HumanDuration(start_time.elapsed()));

    Ok(RunSummary {
        load_stats,
        ingest_stats: outcome.stats,
        report,
    })
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rainfall_monitor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn log_statistics(load_stats: &LoadStats, ingest_stats: &IngestStats) {
    info!("Registry: {}", load_stats.summary());
    info!("Observations: {}", ingest_stats.summary());

    if load_stats.records_rejected > 0 {
        warn!(
            "{} registry rows rejected (see log for details)",
            load_stats.records_rejected
        );
    }

    if ingest_stats.records_rejected > 0 {
        warn!(
            "{} observation rows rejected: {} invalid ids, {} unknown stations, {} invalid times, {} invalid rainfall, {} malformed",
            ingest_stats.records_rejected,
            ingest_stats.invalid_station_ids,
            ingest_stats.unknown_stations,
            ingest_stats.invalid_timestamps,
            ingest_stats.invalid_rainfall,
            ingest_stats.malformed_records
        );
    }
}

/// Render the report in the requested format
pub fn write_report<W: Write>(
    report: &RainfallReport,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            writeln!(out, "{}", render_table(report)).context("Failed to write report")?;
        }
        OutputFormat::Csv => write_csv_report(report, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)
                .context("Failed to serialize report")?;
            writeln!(out).context("Failed to write report")?;
        }
    }
    Ok(())
}

fn write_csv_report<W: Write>(report: &RainfallReport, out: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    for row in &report.rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row for station {}", row.station_id))?;
    }

    writer.flush().context("Failed to write report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::report::{RainfallBand, StationReportRow};

    fn sample_report() -> RainfallReport {
        RainfallReport {
            window: None,
            lookback_ms: 4 * 3_600_000,
            threshold_mm: 30,
            rows: vec![
                StationReportRow {
                    station_id: 1,
                    station_name: "Gauge, North".to_string(),
                    location: "Hill".to_string(),
                    observation_count: 2,
                    average_rainfall_mm: Some(12.5),
                    change_in_rainfall_mm: 5,
                    exceeds_threshold: false,
                    band: RainfallBand::Medium,
                },
                StationReportRow {
                    station_id: 2,
                    station_name: "Gauge South".to_string(),
                    location: "Valley".to_string(),
                    observation_count: 0,
                    average_rainfall_mm: None,
                    change_in_rainfall_mm: 0,
                    exceeds_threshold: false,
                    band: RainfallBand::NoData,
                },
            ],
        }
    }

    #[test]
    fn test_csv_report() {
        let mut out = Vec::new();
        write_report(&sample_report(), OutputFormat::Csv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "station_id,station_name,location,observation_count,average_rainfall_mm,change_in_rainfall_mm,exceeds_threshold,band"
        );
        assert_eq!(lines[1], "1,\"Gauge, North\",Hill,2,12.5,5,false,medium");
        assert_eq!(lines[2], "2,Gauge South,Valley,0,,0,false,no_data");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        write_report(&sample_report(), OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["threshold_mm"], 30);
        assert!(value["window"].is_null());
        assert_eq!(value["rows"][0]["average_rainfall_mm"], 12.5);
        assert!(value["rows"][1]["average_rainfall_mm"].is_null());
        assert_eq!(value["rows"][1]["band"], "no_data");

        let parsed: RainfallReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, sample_report());
    }

    #[test]
    fn test_human_report() {
        colored::control::set_override(false);

        let mut out = Vec::new();
        write_report(&sample_report(), OutputFormat::Human, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Gauge, North"));
        assert!(text.contains("12.5 mm"));
        assert!(text.contains("No data"));
    }
}
