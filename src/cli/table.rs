//! Fixed-width console table for rainfall reports
//!
//! Cell padding is computed from the uncoloured text and the colour codes
//! are wrapped around it afterwards, so coloured and plain cells line up.

use crate::app::services::report::{RainfallBand, RainfallReport, StationReportRow};
use crate::constants::bands;
use chrono::DateTime;
use colored::*;

const COLUMN_WIDTHS: [usize; 5] = [20, 20, 20, 25, 28];
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Format a value with at most two decimals, dropping trailing zeros
///
/// `12.50` renders as `12.5`, `20.00` as `20`.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// A table cell: the text used for width calculations and its rendering
struct Cell {
    plain: String,
    styled: String,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            styled: text.clone(),
            plain: text,
        }
    }

    fn padded(&self, width: usize) -> String {
        let padding = width.saturating_sub(self.plain.chars().count());
        format!("{}{}", self.styled, " ".repeat(padding))
    }
}

fn average_cell(row: &StationReportRow) -> Cell {
    let Some(average) = row.average_rainfall_mm else {
        return Cell {
            plain: "No data".to_string(),
            styled: "No data".red().to_string(),
        };
    };

    let value = format_decimal(average);

    match row.band {
        RainfallBand::Flagged => Cell {
            plain: format!("{} mm !!!", value),
            styled: format!("{} mm {}", value.as_str().red(), "!!!".red()),
        },
        RainfallBand::Low => Cell {
            plain: format!("{} mm", value),
            styled: format!("{} mm", value.as_str().green()),
        },
        RainfallBand::Medium => Cell {
            plain: format!("{} mm", value),
            styled: format!("{} mm", value.as_str().yellow()),
        },
        RainfallBand::High | RainfallBand::NoData => Cell {
            plain: format!("{} mm", value),
            styled: format!("{} mm", value.as_str().red()),
        },
    }
}

fn change_cell(row: &StationReportRow) -> Cell {
    Cell::plain(format!("{} mm", row.change_in_rainfall_mm))
}

fn table_width() -> usize {
    // "| " + cells joined by " | " + " |"
    COLUMN_WIDTHS.iter().sum::<usize>() + 3 * (COLUMN_WIDTHS.len() - 1) + 4
}

fn render_line(cells: &[Cell]) -> String {
    let inner: Vec<String> = cells
        .iter()
        .zip(COLUMN_WIDTHS)
        .map(|(cell, width)| cell.padded(width))
        .collect();
    format!("| {} |", inner.join(" | "))
}

fn legend_cell(threshold_mm: u32) -> Cell {
    let plain = format!(
        "Legend: Green = Low (< {} mm), Amber = Medium (< {} mm), Red = High (>= {} mm), !!! = {} mm Threshold Exceeded",
        format_decimal(bands::LOW_UPPER_MM),
        format_decimal(bands::MEDIUM_UPPER_MM),
        format_decimal(bands::MEDIUM_UPPER_MM),
        threshold_mm
    );
    let styled = format!(
        "Legend: {} = Low (< {} mm), {} = Medium (< {} mm), {} = High (>= {} mm), {} = {} mm Threshold Exceeded",
        "Green".green(),
        format_decimal(bands::LOW_UPPER_MM),
        "Amber".yellow(),
        format_decimal(bands::MEDIUM_UPPER_MM),
        "Red".red(),
        format_decimal(bands::MEDIUM_UPPER_MM),
        "!!!".red(),
        threshold_mm
    );
    Cell { plain, styled }
}

fn window_description(report: &RainfallReport) -> String {
    match report.window {
        Some(window) => {
            let format_time = |millis| {
                DateTime::from_timestamp_millis(millis)
                    .map(|t| t.format("%d/%m/%Y %H:%M UTC").to_string())
                    .unwrap_or_else(|| millis.to_string())
            };
            format!(
                "Window: {} to {}",
                format_time(window.cutoff),
                format_time(window.current_time)
            )
        }
        None => "Window: no observations ingested".to_string(),
    }
}

/// Render the report as a bordered table with a legend
pub fn render_table(report: &RainfallReport) -> String {
    let hours = report.lookback_ms / MILLIS_PER_HOUR;
    let separator = "-".repeat(table_width());
    let mut lines = Vec::with_capacity(report.rows.len() + 7);

    lines.push(window_description(report));
    lines.push(separator.clone());
    lines.push(render_line(&[
        Cell::plain("Device Name"),
        Cell::plain("Device ID"),
        Cell::plain("Location"),
        Cell::plain(format!("Average Rainfall ({} hrs)", hours)),
        Cell::plain(format!("Change in Rainfall ({} hrs)", hours)),
    ]));
    lines.push(separator.clone());

    for row in &report.rows {
        lines.push(render_line(&[
            Cell::plain(row.station_name.as_str()),
            Cell::plain(row.station_id.to_string()),
            Cell::plain(row.location.as_str()),
            average_cell(row),
            change_cell(row),
        ]));
    }

    lines.push(separator.clone());
    let legend = legend_cell(report.threshold_mm);
    lines.push(format!("| {} |", legend.padded(table_width() - 4)));
    lines.push(separator);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::report::ReportWindow;

    fn row(id: i32, average: Option<f64>, change: i64, flagged: bool) -> StationReportRow {
        StationReportRow {
            station_id: id,
            station_name: format!("Gauge {}", id),
            location: "Riverside".to_string(),
            observation_count: 3,
            average_rainfall_mm: average,
            change_in_rainfall_mm: change,
            exceeds_threshold: flagged,
            band: RainfallBand::classify(average, flagged),
        }
    }

    fn report(rows: Vec<StationReportRow>) -> RainfallReport {
        RainfallReport {
            window: Some(ReportWindow {
                current_time: 1_577_880_000_000,
                cutoff: 1_577_865_600_000,
            }),
            lookback_ms: 4 * MILLIS_PER_HOUR,
            threshold_mm: 30,
            rows,
        }
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(20.0), "20");
        assert_eq!(format_decimal(12.5), "12.5");
        assert_eq!(format_decimal(7.1234), "7.12");
        assert_eq!(format_decimal(2.0 / 3.0), "0.67");
        assert_eq!(format_decimal(0.0), "0");
        assert_eq!(format_decimal(-0.001), "0");
        assert_eq!(format_decimal(-4.5), "-4.5");
    }

    #[test]
    fn test_table_lines_align() {
        colored::control::set_override(false);

        let table = render_table(&report(vec![
            row(1, Some(20.0), 20, false),
            row(2, Some(4.25), -3, false),
            row(3, None, 0, false),
            row(4, Some(31.0), 0, true),
        ]));

        for line in table.lines().skip(1) {
            assert_eq!(line.chars().count(), table_width(), "misaligned: {}", line);
        }
    }

    #[test]
    fn test_table_content() {
        colored::control::set_override(false);

        let table = render_table(&report(vec![
            row(1, Some(20.0), 20, false),
            row(2, None, 0, false),
            row(3, Some(31.0), 0, true),
        ]));

        assert!(table.contains("Average Rainfall (4 hrs)"));
        assert!(table.contains("Change in Rainfall (4 hrs)"));
        assert!(table.contains("20 mm"));
        assert!(table.contains("No data"));
        assert!(table.contains("31 mm !!!"));
        assert!(table.contains("30 mm Threshold Exceeded"));
        assert!(table.starts_with("Window: 01/01/2020 08:00 UTC to 01/01/2020 12:00 UTC"));
    }

    #[test]
    fn test_table_without_window() {
        colored::control::set_override(false);

        let mut empty = report(vec![row(7, None, 0, false)]);
        empty.window = None;

        let table = render_table(&empty);
        assert!(table.starts_with("Window: no observations ingested"));
        assert!(table.contains("Gauge 7"));
    }
}
