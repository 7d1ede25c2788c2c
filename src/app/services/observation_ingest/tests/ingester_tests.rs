//! Tests for observation ingestion

use super::*;
use crate::Error;
use crate::app::services::observation_ingest::ObservationIngester;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const MIXED_OBSERVATIONS_CSV: &str = "\
Device ID,Time,Rainfall
1,1/06/2020 9:00,5
1,1/06/2020 10:30,12
2,1/06/2020 8:15,0
3,1/06/2020 11:00,8
X,1/06/2020 11:00,8
2,June 1st,4
2,1/06/2020 9:45,-1
2,1/06/2020 9:50,2.5
";

fn ingester() -> ObservationIngester {
    ObservationIngester::new(&MonitorConfig::default())
}

#[test]
fn test_ingest_attaches_valid_rows() {
    let mut registry = test_registry();
    let outcome = ingester()
        .ingest_reader(&mut registry, MIXED_OBSERVATIONS_CSV.as_bytes(), "obs.csv")
        .unwrap();

    assert_eq!(outcome.stats.total_records, 8);
    assert_eq!(outcome.stats.observations_ingested, 3);
    assert_eq!(registry.get_station(1).unwrap().observation_count(), 2);
    assert_eq!(registry.get_station(2).unwrap().observation_count(), 1);
    assert_eq!(outcome.max_timestamp, Some(millis(2020, 6, 1, 10, 30)));
}

#[test]
fn test_ingest_counts_rejections_by_cause() {
    let mut registry = test_registry();
    let outcome = ingester()
        .ingest_reader(&mut registry, MIXED_OBSERVATIONS_CSV.as_bytes(), "obs.csv")
        .unwrap();
    let stats = &outcome.stats;

    assert_eq!(stats.records_rejected, 5);
    assert_eq!(stats.unknown_stations, 1);
    assert_eq!(stats.invalid_station_ids, 1);
    assert_eq!(stats.invalid_timestamps, 1);
    assert_eq!(stats.invalid_rainfall, 2);
    assert_eq!(stats.malformed_records, 0);
    assert_eq!(stats.errors.len(), 5);
    assert!(stats.errors[0].starts_with("obs.csv row 5: unknown station id 3"));
    assert_eq!(stats.sources_processed, 1);
}

#[test]
fn test_unknown_station_leaves_registry_untouched() {
    let mut registry = test_registry();
    let before = registry.clone();

    let outcome = ingester()
        .ingest_reader(
            &mut registry,
            "Device ID,Time,Rainfall\n42,1/06/2020 9:00,5\n".as_bytes(),
            "obs.csv",
        )
        .unwrap();

    assert_eq!(outcome.stats.unknown_stations, 1);
    assert_eq!(outcome.max_timestamp, None);
    assert_eq!(registry.total_observations(), 0);
    for (after, before) in registry.stations().zip(before.stations()) {
        assert_eq!(after, before);
    }
}

#[test]
fn test_short_row_is_malformed() {
    let mut registry = test_registry();
    let outcome = ingester()
        .ingest_reader(
            &mut registry,
            "Device ID,Time,Rainfall\n1,1/06/2020 9:00\n1,1/06/2020 9:10,3\n".as_bytes(),
            "obs.csv",
        )
        .unwrap();

    assert_eq!(outcome.stats.malformed_records, 1);
    assert_eq!(outcome.stats.observations_ingested, 1);
}

#[test]
fn test_ingest_keeps_insertion_order() {
    let mut registry = test_registry();
    ingester()
        .ingest_reader(
            &mut registry,
            "Device ID,Time,Rainfall\n1,1/06/2020 10:00,3\n1,1/06/2020 9:00,7\n1,1/06/2020 10:00,3\n"
                .as_bytes(),
            "obs.csv",
        )
        .unwrap();

    let rainfall: Vec<u32> = registry
        .get_station(1)
        .unwrap()
        .observations()
        .iter()
        .map(|o| o.rainfall_mm)
        .collect();
    assert_eq!(rainfall, vec![3, 7, 3]);
}

#[test]
fn test_custom_timestamp_format() {
    let config = MonitorConfig::default().with_timestamp_format("%Y-%m-%d %H:%M");
    let mut registry = test_registry();

    let outcome = ObservationIngester::new(&config)
        .ingest_reader(
            &mut registry,
            "Device ID,Time,Rainfall\n1,2020-06-01 09:00,5\n1,1/06/2020 9:00,5\n".as_bytes(),
            "obs.csv",
        )
        .unwrap();

    assert_eq!(outcome.stats.observations_ingested, 1);
    assert_eq!(outcome.stats.invalid_timestamps, 1);
    assert_eq!(outcome.max_timestamp, Some(millis(2020, 6, 1, 9, 0)));
}

#[test]
fn test_missing_observation_column_is_fatal() {
    let mut registry = test_registry();
    let result = ingester().ingest_reader(
        &mut registry,
        "Device ID,Rainfall\n1,5\n".as_bytes(),
        "obs.csv",
    );

    assert!(matches!(result, Err(Error::MissingColumn { ref column, .. }) if column == "Time"));
}

#[test]
fn test_ingest_sources_uses_max_across_sources() {
    let temp_dir = TempDir::new().unwrap();
    let later = temp_dir.path().join("a.csv");
    let earlier = temp_dir.path().join("b.csv");
    fs::write(&later, "Device ID,Time,Rainfall\n1,2/06/2020 6:00,4\nbad,x,y\n").unwrap();
    fs::write(&earlier, "Device ID,Time,Rainfall\n2,1/06/2020 6:00,9\n").unwrap();

    let mut registry = test_registry();
    let outcome = ingester()
        .ingest_sources(&mut registry, &[later, earlier])
        .unwrap();

    assert_eq!(outcome.max_timestamp, Some(millis(2020, 6, 2, 6, 0)));
    assert_eq!(outcome.stats.sources_processed, 2);
    assert_eq!(outcome.stats.total_records, 3);
    assert_eq!(outcome.stats.observations_ingested, 2);
    assert_eq!(outcome.stats.records_rejected, 1);
    assert_eq!(registry.total_observations(), 2);
}

#[test]
fn test_ingest_sources_empty_set() {
    let mut registry = test_registry();
    let outcome = ingester().ingest_sources(&mut registry, &[]).unwrap();

    assert_eq!(outcome.max_timestamp, None);
    assert_eq!(outcome.stats.sources_processed, 0);
}

#[test]
fn test_ingest_missing_file_is_fatal() {
    let mut registry = test_registry();
    let result = ingester().ingest_sources(
        &mut registry,
        &[PathBuf::from("/nonexistent/Data1.csv")],
    );
    assert!(matches!(result, Err(Error::SourceNotFound { .. })));

    let result = ingester().ingest_path(&mut registry, Path::new("/nonexistent/Data2.csv"));
    assert!(result.is_err());
}
