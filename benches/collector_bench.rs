//! Collector 벤치마크
//!
//! Status decoding and exposition rendering

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kafka_connect_exporter::collector::parse_status;
use kafka_connect_exporter::exposition::PrometheusFormatter;
use kafka_connect_exporter::metrics::{Descriptors, Sample};

fn status_json(tasks: usize) -> String {
    let tasks: Vec<String> = (0..tasks)
        .map(|id| {
            format!(
                r#"{{"id": {}, "state": "RUNNING", "worker_id": "10.0.0.{}:8083"}}"#,
                id,
                id % 8
            )
        })
        .collect();

    format!(
        r#"{{
        "name": "orders-sink",
        "connector": {{"state": "RUNNING", "worker_id": "10.0.0.1:8083"}},
        "tasks": [{}],
        "type": "sink"
    }}"#,
        tasks.join(",")
    )
}

fn benchmark_parse_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_status");

    for tasks in [1usize, 16, 128] {
        let body = status_json(tasks);
        group.bench_with_input(BenchmarkId::new("tasks", tasks), &body, |b, json| {
            b.iter(|| parse_status(json.as_bytes()))
        });
    }

    group.finish();
}

fn benchmark_format(c: &mut Criterion) {
    let descs = Descriptors::default();
    let samples: Vec<Sample> = (0..1000)
        .map(|i| {
            Sample::new(
                &descs.task_state,
                1.0,
                vec![
                    format!("connector-{}", i / 10),
                    "running".to_string(),
                    "10.0.0.1:8083".to_string(),
                    (i % 10).to_string(),
                ],
            )
        })
        .chain(std::iter::once(Sample::new(&descs.up, 1.0, vec![])))
        .collect();

    let formatter = PrometheusFormatter::new();
    c.bench_function("format_1000_task_samples", |b| {
        b.iter(|| formatter.format(&samples))
    });
}

criterion_group!(benches, benchmark_parse_status, benchmark_format);
criterion_main!(benches);
