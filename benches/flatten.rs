//! Benchmarks for flattening and address extraction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use envcheck::address::extract_addresses;
use envcheck::flatten::{flatten_str, Format};
use std::hint::black_box;

/// Generate a YAML document with `count` services, each with a nested
/// connection block and a replica list
fn generate_yaml(count: usize) -> String {
    let mut out = String::from("services:\n");
    for i in 0..count {
        let a = (i / 256) % 256;
        let b = i % 256;
        out.push_str(&format!(
            "  svc{i}:\n    host: 10.{a}.{b}.1\n    port: {port}\n    replicas:\n      - 10.{a}.{b}.2\n      - 10.{a}.{b}.3\n",
            i = i,
            a = a,
            b = b,
            port = 8000 + (i % 1000)
        ));
    }
    out
}

/// Generate JSON with the same shape as [`generate_yaml`]
fn generate_json(count: usize) -> String {
    let services: Vec<String> = (0..count)
        .map(|i| {
            let a = (i / 256) % 256;
            let b = i % 256;
            format!(
                r#""svc{i}": {{"host": "10.{a}.{b}.1", "port": {port}, "replicas": ["10.{a}.{b}.2", "10.{a}.{b}.3"]}}"#,
                i = i,
                a = a,
                b = b,
                port = 8000 + (i % 1000)
            )
        })
        .collect();
    format!(r#"{{"services": {{{}}}}}"#, services.join(", "))
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for size in [10, 100, 1000] {
        let yaml = generate_yaml(size);
        group.bench_with_input(BenchmarkId::new("yaml", size), &yaml, |b, text| {
            b.iter(|| black_box(flatten_str(Format::Yaml, text).unwrap()))
        });

        let json = generate_json(size);
        group.bench_with_input(BenchmarkId::new("json", size), &json, |b, text| {
            b.iter(|| black_box(flatten_str(Format::Json, text).unwrap()))
        });
    }

    group.finish();
}

fn bench_addresses(c: &mut Criterion) {
    let mut group = c.benchmark_group("addresses");

    for size in [10, 100, 1000] {
        let flat = flatten_str(Format::Yaml, &generate_yaml(size)).unwrap();
        group.bench_with_input(BenchmarkId::new("flat_config", size), &flat, |b, flat| {
            b.iter(|| black_box(flat.addresses()))
        });

        let line = (0..size)
            .map(|i| format!("10.0.{}.{}", (i / 256) % 256, i % 256))
            .collect::<Vec<_>>()
            .join(",");
        group.bench_with_input(BenchmarkId::new("single_value", size), &line, |b, line| {
            b.iter(|| black_box(extract_addresses(line)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_addresses);
criterion_main!(benches);
