//! Benchmarks for windowed rainfall queries and report assembly

use chrono::Duration;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rainfall_monitor::app::services::report::build_report;
use rainfall_monitor::app::services::station_registry::StationRegistry;
use rainfall_monitor::{Observation, Station};

const FIVE_MINUTES_MS: i64 = 5 * 60 * 1000;

/// A station with one reading every five minutes, stored newest-first
fn create_station(id: i32, readings: usize) -> Station {
    let mut station = Station::new(id, format!("Gauge {}", id), "Bench Site");
    for i in (0..readings).rev() {
        let rainfall = ((i * 7 + id as usize) % 40) as u32;
        station
            .add_observation(Observation::new(id, i as i64 * FIVE_MINUTES_MS, rainfall))
            .unwrap();
    }
    station
}

fn benchmark_station_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("station_queries");

    for readings in [100usize, 1_000, 10_000] {
        let station = create_station(1, readings);
        let now = (readings as i64 - 1) * FIVE_MINUTES_MS;
        let cutoff = now - Duration::hours(4).num_milliseconds();

        group.bench_with_input(BenchmarkId::new("average", readings), &station, |b, s| {
            b.iter(|| black_box(s.average_rainfall_since(black_box(cutoff))))
        });
        group.bench_with_input(BenchmarkId::new("change", readings), &station, |b, s| {
            b.iter(|| black_box(s.change_in_rainfall_since(black_box(cutoff))))
        });
        group.bench_with_input(BenchmarkId::new("exceedance", readings), &station, |b, s| {
            b.iter(|| black_box(s.is_exceeding_threshold_since(30, black_box(cutoff))))
        });
    }

    group.finish();
}

fn benchmark_report(c: &mut Criterion) {
    let mut registry = StationRegistry::new();
    for id in 0..200 {
        registry.register(create_station(id, 500));
    }
    let now = 499 * FIVE_MINUTES_MS;

    c.bench_function("build_report_200_stations", |b| {
        b.iter(|| black_box(build_report(&registry, Some(now), Duration::hours(4), 30)))
    });
}

criterion_group!(benches, benchmark_station_queries, benchmark_report);
criterion_main!(benches);
